use axum::body::Bytes;
use serde::de::DeserializeOwned;
use serde_json::{Map, Number, Value};
use tracing::warn;

use crate::{
    error::AppError::{self, MalformedPayload, Rejected, Validation},
    record::{
        AREAS_INVALID, DRINKS_INVALID, DrinksPerDay, FREQUENCY_MISSING, GOALS_INVALID,
        IDEAL_OUTCOME_INVALID, IdealOutcome, PRIMARY_GOAL_INVALID, SPEND_INVALID, Weekday,
    },
};

pub type Payload = Map<String, Value>;

pub fn get_payload(body: Bytes) -> Result<Payload, AppError> {
    match serde_json::from_slice::<Value>(&body) {
        Ok(Value::Object(payload)) => Ok(payload),
        Ok(_) => Err(MalformedPayload),
        Err(e) => {
            warn!("Failed to parse payload: {e}");

            Err(MalformedPayload)
        }
    }
}

fn field<T: DeserializeOwned>(
    payload: &Payload,
    key: &str,
    error: AppError,
) -> Result<T, AppError> {
    let Some(value) = payload.get(key) else {
        return Err(error);
    };

    T::deserialize(value).map_err(|_| error)
}

pub fn get_selected_goals(payload: &Payload) -> Result<Vec<String>, AppError> {
    field(payload, "selectedGoals", Rejected(GOALS_INVALID))
}

pub fn get_primary_goal(payload: &Payload) -> Result<String, AppError> {
    field(payload, "primaryGoal", Rejected(PRIMARY_GOAL_INVALID))
}

pub fn get_drinks_per_day(payload: Payload) -> Result<DrinksPerDay, AppError> {
    if let Some(day) = Weekday::ALL
        .into_iter()
        .find(|day| !payload.get(day.name()).is_some_and(Value::is_number))
    {
        warn!("Drinks payload has no number for {}", day.name());

        return Err(Rejected(DRINKS_INVALID));
    }

    serde_json::from_value(Value::Object(payload)).map_err(|_| Rejected(DRINKS_INVALID))
}

/// Whole numbers only, so `2` and `2.0` both name outcome 2.
pub fn get_ideal_outcome(payload: &Payload) -> Result<IdealOutcome, AppError> {
    let id = payload
        .get("idealOutcomeId")
        .and_then(Value::as_f64)
        .filter(|id| id.fract() == 0.0 && *id >= 0.0)
        .ok_or(Validation(IDEAL_OUTCOME_INVALID))?;

    IdealOutcome::try_from(id as u64)
}

pub fn get_spend_per_drink(payload: &Payload) -> Result<Number, AppError> {
    match payload.get("spendPerDrink") {
        Some(Value::Number(spend)) => Ok(spend.clone()),
        _ => Err(Validation(SPEND_INVALID)),
    }
}

pub fn get_alcohol_effect_frequency(payload: &Payload) -> Result<String, AppError> {
    field(payload, "alcoholEffectFrequency", Validation(FREQUENCY_MISSING))
}

/// Absent stays `None`. An explicit `null` is a provided value.
pub fn get_alcohol_concern_level(payload: &mut Payload) -> Option<Value> {
    payload.remove("alcoholConcernLevel")
}

/// Any array is taken as is, elements are not checked.
pub fn get_improvement_areas(payload: &mut Payload) -> Result<Vec<Value>, AppError> {
    match payload.remove("selectedAreas") {
        Some(Value::Array(areas)) => Ok(areas),
        _ => Err(Validation(AREAS_INVALID)),
    }
}
