//! Survey API integration tests, driven through the router in process.

use std::sync::Arc;

use axum::{
    Router,
    body::Body,
    http::{Method, Request, StatusCode, header::CONTENT_TYPE},
};
use http_body_util::BodyExt;
use serde_json::{Value, json};
use server::{config::Config, router, state::AppState};
use tower::ServiceExt;

fn app(seed_defaults: bool) -> Router {
    let config = Config {
        seed_defaults,
        ..Config::default()
    };

    router(AppState::new(config))
}

async fn send_raw(
    app: &Router,
    method: Method,
    path: &str,
    body: Option<&str>,
) -> (StatusCode, String) {
    let request = Request::builder().method(method).uri(path);
    let request = match body {
        Some(body) => request
            .header(CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string())),
        None => request.body(Body::empty()),
    }
    .unwrap();

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();

    (status, String::from_utf8(bytes.to_vec()).unwrap())
}

async fn send(app: &Router, method: Method, path: &str, body: Option<&str>) -> (StatusCode, Value) {
    let (status, text) = send_raw(app, method, path, body).await;

    (status, serde_json::from_str(&text).unwrap())
}

async fn post(app: &Router, path: &str, body: Value) -> (StatusCode, Value) {
    send(app, Method::POST, path, Some(&body.to_string())).await
}

async fn get(app: &Router, path: &str) -> (StatusCode, Value) {
    send(app, Method::GET, path, None).await
}

fn week(counts: [u32; 7]) -> Value {
    json!({
        "Monday": counts[0],
        "Tuesday": counts[1],
        "Wednesday": counts[2],
        "Thursday": counts[3],
        "Friday": counts[4],
        "Saturday": counts[5],
        "Sunday": counts[6],
    })
}

#[tokio::test]
async fn test_goals_last_write_wins() {
    let app = app(true);

    let (status, body) = post(&app, "/api/goals", json!({ "selectedGoals": ["A"] })).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], json!(true));
    assert_eq!(body["message"], json!("Goals saved successfully."));
    assert_eq!(body["selectedGoals"], json!(["A"]));

    post(&app, "/api/goals", json!({ "selectedGoals": ["B"] })).await;

    let (_, record) = get(&app, "/api/user-selections").await;
    assert_eq!(record["selectedGoals"], json!(["B"]));
}

#[tokio::test]
async fn test_empty_goals_rejected() {
    let app = app(true);

    let (status, body) = post(&app, "/api/goals", json!({ "selectedGoals": [] })).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(
        body,
        json!({ "success": false, "message": "selectedGoals must be a non-empty array." })
    );
}

#[tokio::test]
async fn test_goal_pages_read_message_on_failure() {
    let app = app(true);

    let (status, body) = post(&app, "/api/goals", json!({ "selectedGoals": "Sleep" })).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(
        body,
        json!({ "success": false, "message": "selectedGoals must be a non-empty array." })
    );

    let (status, body) = post(&app, "/api/primary-goal", json!({})).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(
        body,
        json!({ "success": false, "message": "primaryGoal must be a non-empty string." })
    );
}

#[tokio::test]
async fn test_primary_goal() {
    let app = app(true);

    let (status, body) = post(&app, "/api/primary-goal", json!({ "primaryGoal": "" })).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(
        body,
        json!({ "success": false, "message": "primaryGoal must be a non-empty string." })
    );

    let (status, body) = post(
        &app,
        "/api/primary-goal",
        json!({ "primaryGoal": "Save money" }),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["primaryGoal"], json!("Save money"));

    let (_, record) = get(&app, "/api/user-selections").await;
    assert_eq!(record["primaryGoal"], json!("Save money"));
}

#[tokio::test]
async fn test_drinks_missing_sunday_leaves_record_unchanged() {
    let app = app(true);
    let (_, before) = get(&app, "/api/user-selections").await;

    let mut drinks = week([1, 2, 3, 4, 5, 6, 7]);
    drinks.as_object_mut().unwrap().remove("Sunday");
    let (status, body) = post(&app, "/api/save-drinks", drinks).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["success"], json!(false));
    assert_eq!(
        body["message"],
        json!("Drinks per day must be an object with all days as keys and number values.")
    );
    assert!(body.get("error").is_none());

    let (_, after) = get(&app, "/api/user-selections").await;
    assert_eq!(before, after);
}

#[tokio::test]
async fn test_drinks_round_trip() {
    let app = app(false);

    let (status, body) = get(&app, "/api/drinks-per-day").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], json!("No drinks per day data found"));

    let (status, body) = post(&app, "/api/save-drinks", week([1, 0, 2, 0, 3, 4, 0])).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["drinksPerDay"]["Friday"], json!(3));

    let (status, drinks) = get(&app, "/api/drinks-per-day").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(drinks["Monday"], json!(1));
    assert_eq!(drinks["Sunday"], json!(0));
    assert_eq!(drinks.as_object().unwrap().len(), 7);
}

#[tokio::test]
async fn test_drinks_echo_posted_numbers() {
    let app = app(false);
    let posted = r#"{"Monday":1,"Tuesday":2,"Wednesday":0,"Thursday":0,"Friday":0,"Saturday":0,"Sunday":0}"#;

    let (status, _) = send(&app, Method::POST, "/api/save-drinks", Some(posted)).await;
    assert_eq!(status, StatusCode::OK);

    let (status, text) = send_raw(&app, Method::GET, "/api/drinks-per-day", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(text, posted);

    let (status, text) = send_raw(&app, Method::GET, "/api/total-drinks", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(text, r#"{"totalDrinks":3,"dryDays":5}"#);
}

#[tokio::test]
async fn test_drinks_with_overflowing_total_rejected() {
    let app = app(true);
    let drinks = r#"{"Monday":1e308,"Tuesday":1e308,"Wednesday":0,"Thursday":0,"Friday":0,"Saturday":0,"Sunday":0}"#;

    let (status, body) = send(&app, Method::POST, "/api/save-drinks", Some(drinks)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["success"], json!(false));

    let (status, body) = get(&app, "/api/weekly-spend").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "totalPerWeek": 0 }));
}

#[tokio::test]
async fn test_ideal_outcome_not_found_then_saved() {
    let app = app(true);

    let (status, _) = get(&app, "/api/get-ideal-outcome").await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = post(&app, "/api/save-ideal-outcome", json!({ "idealOutcomeId": 4 })).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, body) = post(
        &app,
        "/api/save-ideal-outcome",
        json!({ "idealOutcomeId": 2 }),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "success": true }));

    let (status, body) = get(&app, "/api/get-ideal-outcome").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "idealOutcomeId": 2 }));
}

#[tokio::test]
async fn test_ideal_outcome_accepts_whole_float() {
    let app = app(true);

    let (status, body) = send(
        &app,
        Method::POST,
        "/api/save-ideal-outcome",
        Some(r#"{"idealOutcomeId":2.0}"#),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "success": true }));

    let (_, body) = get(&app, "/api/get-ideal-outcome").await;
    assert_eq!(body, json!({ "idealOutcomeId": 2 }));

    let (status, _) = post(
        &app,
        "/api/save-ideal-outcome",
        json!({ "idealOutcomeId": 2.5 }),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_total_drinks_and_dry_days() {
    let app = app(false);

    let (status, body) = get(&app, "/api/total-drinks").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], json!("No data"));

    post(&app, "/api/save-drinks", week([2, 0, 1, 0, 3, 6, 0])).await;

    let (status, body) = get(&app, "/api/total-drinks").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["totalDrinks"], json!(12));
    assert_eq!(body["dryDays"], json!(3));

    let (_, record) = get(&app, "/api/user-selections").await;
    assert_eq!(record["totalDrinks"], json!(12));
    assert_eq!(record["dryDays"], json!(3));
}

#[tokio::test]
async fn test_spend_validation_and_weekly_spend() {
    let app = app(true);
    post(&app, "/api/save-drinks", week([1, 1, 1, 1, 1, 2, 3])).await;

    let (status, body) = post(&app, "/api/save-spend", json!({ "spendPerDrink": "abc" })).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], json!("Invalid spendPerDrink value"));

    let (status, _) = post(&app, "/api/save-spend", json!({ "spendPerDrink": 8 })).await;
    assert_eq!(status, StatusCode::OK);

    let (status, first) = get(&app, "/api/weekly-spend").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(first, json!({ "totalPerWeek": 80 }));

    let (_, second) = get(&app, "/api/weekly-spend").await;
    assert_eq!(first, second);

    let (_, record) = get(&app, "/api/user-selections").await;
    assert_eq!(record["totalPerWeek"], json!(80));
    assert_eq!(record["spendPerDrink"], json!(8));
}

#[tokio::test]
async fn test_weekly_spend_without_data() {
    let app = app(false);

    let (status, body) = get(&app, "/api/weekly-spend").await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], json!("Missing or invalid data for calculation"));
}

#[tokio::test]
async fn test_seeded_weekly_spend_is_zero() {
    let app = app(true);

    let (status, body) = get(&app, "/api/weekly-spend").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "totalPerWeek": 0 }));
}

#[tokio::test]
async fn test_alcohol_frequency() {
    let app = app(true);

    let (status, body) = post(
        &app,
        "/api/save-alcohol-frequency",
        json!({ "alcoholEffectFrequency": "" }),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], json!("No selection provided"));

    let (status, body) = post(
        &app,
        "/api/save-alcohol-frequency",
        json!({ "alcoholEffectFrequency": "Often" }),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "message": "Selection saved successfully" }));
}

#[tokio::test]
async fn test_alcohol_concern_accepts_zero_but_not_absence() {
    let app = app(true);

    let (status, body) = post(&app, "/api/save-alcohol-concern", json!({})).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], json!("Missing concern level"));

    let (status, body) = post(
        &app,
        "/api/save-alcohol-concern",
        json!({ "alcoholConcernLevel": 0 }),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "message": "Concern saved successfully" }));

    let (_, record) = get(&app, "/api/user-selections").await;
    assert_eq!(record["alcoholConcernLevel"], json!(0));
}

#[tokio::test]
async fn test_improvement_areas() {
    let app = app(true);

    let (status, body) = post(
        &app,
        "/api/save-alcohol-improvement-areas",
        json!({ "selectedAreas": "Sleep" }),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], json!("Invalid selection"));

    let (status, _) = post(
        &app,
        "/api/save-alcohol-improvement-areas",
        json!({ "selectedAreas": [] }),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    post(
        &app,
        "/api/save-alcohol-improvement-areas",
        json!({ "selectedAreas": ["Sleep", "Mood"] }),
    )
    .await;

    let (_, record) = get(&app, "/api/user-selections").await;
    assert_eq!(record["improvementAreas"], json!(["Sleep", "Mood"]));
}

#[tokio::test]
async fn test_improvement_areas_accept_non_strings() {
    let app = app(true);

    let (status, body) = post(
        &app,
        "/api/save-alcohol-improvement-areas",
        json!({ "selectedAreas": [1, 2] }),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "message": "Saved successfully" }));

    let (_, record) = get(&app, "/api/user-selections").await;
    assert_eq!(record["improvementAreas"], json!([1, 2]));
}

#[tokio::test]
async fn test_malformed_body_rejected() {
    let app = app(true);

    let (status, body) = send(&app, Method::POST, "/api/goals", Some("not json")).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], json!("Malformed payload"));
}

#[tokio::test]
async fn test_full_record_defaults() {
    let (status, seeded) = get(&app(true), "/api/user-selections").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(seeded["dryDays"], json!(7));
    assert_eq!(seeded["spendPerDrink"], json!(8));
    assert_eq!(seeded["selectedGoals"], json!([]));
    assert_eq!(seeded["savedIdealOutcome"], Value::Null);

    let (status, empty) = get(&app(false), "/api/user-selections").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(empty["drinksPerDay"], Value::Null);
    assert_eq!(empty["spendPerDrink"], Value::Null);
    assert_eq!(empty["alcoholConcernLevel"], Value::Null);
}

#[tokio::test]
async fn test_shared_state_is_one_record() {
    let state = AppState::new(Config::default());
    let first = router(Arc::clone(&state));
    let second = router(Arc::clone(&state));

    post(&first, "/api/primary-goal", json!({ "primaryGoal": "Feel healthier" })).await;

    let (_, record) = get(&second, "/api/user-selections").await;
    assert_eq!(record["primaryGoal"], json!("Feel healthier"));
    assert_eq!(
        state.record.read().await.primary_goal.as_deref(),
        Some("Feel healthier")
    );
}
