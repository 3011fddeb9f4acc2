//! # Survey API
//!
//! One route per survey step. Writes are POSTs with a small JSON object,
//! reads are GETs with no body.
//!
//! ## Writes
//!
//! | Path | Payload |
//! |---|---|
//! | `/api/goals` | `{ selectedGoals: [string] }` |
//! | `/api/primary-goal` | `{ primaryGoal: string }` |
//! | `/api/save-drinks` | `{ Monday: number, ..., Sunday: number }` |
//! | `/api/save-ideal-outcome` | `{ idealOutcomeId: 1 \| 2 \| 3 }` |
//! | `/api/save-spend` | `{ spendPerDrink: number }` |
//! | `/api/save-alcohol-frequency` | `{ alcoholEffectFrequency: string }` |
//! | `/api/save-alcohol-concern` | `{ alcoholConcernLevel: any }` |
//! | `/api/save-alcohol-improvement-areas` | `{ selectedAreas: [any] }` |
//!
//! ## Reads
//!
//! - `/api/drinks-per-day`: stored week, 404 before one is saved
//! - `/api/user-selections`: whole record, never fails
//! - `/api/get-ideal-outcome`: `{ idealOutcomeId }`, 404 before one is saved
//! - `/api/total-drinks`: `{ totalDrinks, dryDays }`, recomputed and stored
//! - `/api/weekly-spend`: `{ totalPerWeek }`, recomputed and stored
//!
//! Failures answer 400 for bad input and 404 for data that was never saved.
//! The goal and drinks pages get `{ success: false, message }`, every other
//! route gets `{ error }`.
use std::sync::Arc;

use axum::{
    Json,
    body::Bytes,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use tracing::{info, warn};

use crate::{
    error::AppError,
    record::SurveyRecord,
    state::AppState,
    utils::{
        get_alcohol_concern_level, get_alcohol_effect_frequency, get_drinks_per_day,
        get_ideal_outcome, get_improvement_areas, get_payload, get_primary_goal,
        get_selected_goals, get_spend_per_drink,
    },
};

type Shared = State<Arc<AppState>>;

fn rejected(route: &str, error: AppError) -> AppError {
    warn!("Rejected {route}: {error}");

    error
}

#[cfg(feature = "verbose")]
fn dump(record: &SurveyRecord) {
    tracing::debug!("Record now: {record:?}");
}

#[cfg(not(feature = "verbose"))]
fn dump(_record: &SurveyRecord) {}

pub async fn goals_handler(State(state): Shared, body: Bytes) -> Result<Response, AppError> {
    let goals = get_payload(body)
        .and_then(|payload| get_selected_goals(&payload))
        .map_err(|e| rejected("goals", e))?;

    let mut record = state.record.write().await;
    let selected_goals = record
        .set_selected_goals(goals)
        .map_err(|e| rejected("goals", e))?
        .to_vec();

    info!("Received selected goals: {selected_goals:?}");
    dump(&record);

    Ok((
        StatusCode::OK,
        Json(json!({
            "success": true,
            "message": "Goals saved successfully.",
            "selectedGoals": selected_goals,
        })),
    )
        .into_response())
}

pub async fn primary_goal_handler(State(state): Shared, body: Bytes) -> Result<Response, AppError> {
    let goal = get_payload(body)
        .and_then(|payload| get_primary_goal(&payload))
        .map_err(|e| rejected("primary goal", e))?;

    let mut record = state.record.write().await;
    let primary_goal = record
        .set_primary_goal(goal)
        .map_err(|e| rejected("primary goal", e))?
        .to_string();

    info!("Received primary goal: {primary_goal}");
    dump(&record);

    Ok((
        StatusCode::OK,
        Json(json!({
            "success": true,
            "message": "Primary goal saved successfully.",
            "primaryGoal": primary_goal,
        })),
    )
        .into_response())
}

pub async fn save_drinks_handler(State(state): Shared, body: Bytes) -> Result<Response, AppError> {
    let drinks = get_payload(body)
        .and_then(get_drinks_per_day)
        .map_err(|e| rejected("drinks per day", e))?;

    let mut record = state.record.write().await;
    let drinks_per_day = record
        .set_drinks_per_day(drinks)
        .map_err(|e| rejected("drinks per day", e))?
        .clone();

    info!("Received drinks per day: {drinks_per_day:?}");
    dump(&record);

    Ok((
        StatusCode::OK,
        Json(json!({
            "success": true,
            "message": "Drinks per day saved successfully.",
            "drinksPerDay": drinks_per_day,
        })),
    )
        .into_response())
}

pub async fn drinks_per_day_handler(State(state): Shared) -> Result<Response, AppError> {
    let record = state.record.read().await;

    Ok(Json(record.drinks_per_day()?).into_response())
}

pub async fn user_selections_handler(State(state): Shared) -> Response {
    let record = state.record.read().await;

    (StatusCode::OK, Json(&*record)).into_response()
}

pub async fn save_ideal_outcome_handler(
    State(state): Shared,
    body: Bytes,
) -> Result<Response, AppError> {
    let outcome = get_payload(body)
        .and_then(|payload| get_ideal_outcome(&payload))
        .map_err(|e| rejected("ideal outcome", e))?;

    let mut record = state.record.write().await;
    record.set_ideal_outcome(outcome);

    info!("Saved ideal outcome: {}", outcome.id());
    dump(&record);

    Ok(Json(json!({ "success": true })).into_response())
}

pub async fn ideal_outcome_handler(State(state): Shared) -> Result<Response, AppError> {
    let outcome = state.record.read().await.ideal_outcome()?;

    Ok(Json(json!({ "idealOutcomeId": outcome })).into_response())
}

pub async fn total_drinks_handler(State(state): Shared) -> Result<Response, AppError> {
    let totals = state
        .record
        .write()
        .await
        .compute_totals()
        .map_err(|e| rejected("total drinks", e))?;

    Ok(Json(totals).into_response())
}

pub async fn save_spend_handler(State(state): Shared, body: Bytes) -> Result<Response, AppError> {
    let spend = get_payload(body)
        .and_then(|payload| get_spend_per_drink(&payload))
        .map_err(|e| rejected("spend per drink", e))?;

    let mut record = state.record.write().await;
    let spend_per_drink = record
        .set_spend_per_drink(spend)
        .map_err(|e| rejected("spend per drink", e))?
        .clone();

    info!("Received spendPerDrink: {spend_per_drink}");
    dump(&record);

    Ok((StatusCode::OK, Json(json!({ "success": true }))).into_response())
}

pub async fn weekly_spend_handler(State(state): Shared) -> Result<Response, AppError> {
    let total_per_week = state
        .record
        .write()
        .await
        .compute_weekly_spend()
        .map_err(|e| rejected("weekly spend", e))?;

    Ok(Json(json!({ "totalPerWeek": total_per_week })).into_response())
}

pub async fn alcohol_frequency_handler(
    State(state): Shared,
    body: Bytes,
) -> Result<Response, AppError> {
    let frequency = get_payload(body)
        .and_then(|payload| get_alcohol_effect_frequency(&payload))
        .map_err(|e| rejected("alcohol frequency", e))?;

    let mut record = state.record.write().await;
    let frequency = record
        .set_alcohol_effect_frequency(frequency)
        .map_err(|e| rejected("alcohol frequency", e))?
        .to_string();

    info!("Alcohol effect frequency: {frequency}");
    dump(&record);

    Ok((
        StatusCode::OK,
        Json(json!({ "message": "Selection saved successfully" })),
    )
        .into_response())
}

pub async fn alcohol_concern_handler(
    State(state): Shared,
    body: Bytes,
) -> Result<Response, AppError> {
    let mut payload = get_payload(body).map_err(|e| rejected("alcohol concern", e))?;
    let level = get_alcohol_concern_level(&mut payload);

    let mut record = state.record.write().await;
    let level = record
        .set_alcohol_concern_level(level)
        .map_err(|e| rejected("alcohol concern", e))?
        .clone();

    info!("Alcohol concern level: {level}");
    dump(&record);

    Ok((
        StatusCode::OK,
        Json(json!({ "message": "Concern saved successfully" })),
    )
        .into_response())
}

pub async fn improvement_areas_handler(
    State(state): Shared,
    body: Bytes,
) -> Result<Response, AppError> {
    let areas = get_payload(body)
        .and_then(|mut payload| get_improvement_areas(&mut payload))
        .map_err(|e| rejected("improvement areas", e))?;

    let mut record = state.record.write().await;
    let areas = record.set_improvement_areas(areas).to_vec();

    info!("Selected improvement areas: {areas:?}");
    dump(&record);

    Ok((StatusCode::OK, Json(json!({ "message": "Saved successfully" }))).into_response())
}
