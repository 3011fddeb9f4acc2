//! Backend for a multi-step drinking habits survey.
//!
//! The frontend walks a user through a handful of questions and posts each
//! answer as soon as it is given. Every answer lands in one shared record
//! which later pages read back, either whole or as derived numbers.
//!
//!
//!
//! # Layout
//! - [`record`]: the record, its field rules and the two derived metrics
//! - [`utils`]: request body decoding, one extractor per survey field
//! - [`routes`]: one handler per survey step
//! - [`state`]: the record behind an async lock plus the loaded config
//! - [`config`]: environment driven settings
//!
//!
//!
//! # Notes
//!
//! ## Single record
//! There is no notion of a user. Two people filling the survey at once
//! overwrite each other's answers field by field. Restarting the process
//! forgets everything.
//!
//! ## Derived values
//! Reading `/api/total-drinks` or `/api/weekly-spend` recomputes from the
//! stored week and writes the result back, so the full record only shows
//! fresh totals after one of those reads.
//!
//!
//!
//! # Setup
//!
//! Run with defaults (port 3001, seeded record).
//! ```sh
//! cargo run
//! ```
//!
//! Start from an empty record on another port with debug logs.
//! ```sh
//! PORT=8080 SEED_DEFAULTS=false RUST_LOG=debug cargo run --features verbose
//! ```
//!
//! Walk a running server through a sample survey.
//! ```sh
//! cargo run -p tester -- http://localhost:3001
//! ```
use std::{io, sync::Arc, time::Duration};

use axum::{
    Router,
    http::{Method, header::CONTENT_TYPE},
    routing::{get, post},
};

#[cfg(unix)]
use tokio::signal::unix::{SignalKind, signal};
use tokio::{net::TcpListener, signal::ctrl_c};
use tower_http::cors::{Any, CorsLayer};
use tracing::info;
use tracing_subscriber::{EnvFilter, fmt};

pub mod config;
pub mod error;
pub mod record;
pub mod routes;
pub mod state;
pub mod utils;

use config::Config;
use routes::{
    alcohol_concern_handler, alcohol_frequency_handler, drinks_per_day_handler, goals_handler,
    ideal_outcome_handler, improvement_areas_handler, primary_goal_handler, save_drinks_handler,
    save_ideal_outcome_handler, save_spend_handler, total_drinks_handler,
    user_selections_handler, weekly_spend_handler,
};
use state::AppState;

pub fn router(state: Arc<AppState>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([CONTENT_TYPE])
        .max_age(Duration::from_secs(60 * 60));

    Router::new()
        .route("/api/goals", post(goals_handler))
        .route("/api/primary-goal", post(primary_goal_handler))
        .route("/api/save-drinks", post(save_drinks_handler))
        .route("/api/drinks-per-day", get(drinks_per_day_handler))
        .route("/api/user-selections", get(user_selections_handler))
        .route("/api/save-ideal-outcome", post(save_ideal_outcome_handler))
        .route("/api/get-ideal-outcome", get(ideal_outcome_handler))
        .route("/api/total-drinks", get(total_drinks_handler))
        .route("/api/save-spend", post(save_spend_handler))
        .route("/api/weekly-spend", get(weekly_spend_handler))
        .route("/api/save-alcohol-frequency", post(alcohol_frequency_handler))
        .route("/api/save-alcohol-concern", post(alcohol_concern_handler))
        .route(
            "/api/save-alcohol-improvement-areas",
            post(improvement_areas_handler),
        )
        .layer(cors)
        .with_state(state)
}

pub async fn start_server() -> io::Result<()> {
    fmt().with_env_filter(EnvFilter::from_default_env()).init();

    info!("Loading config...");
    let config = Config::load();

    info!("Initializing state...");
    let state = AppState::new(config);

    info!("Starting server...");
    let address = format!("0.0.0.0:{}", state.config.port);
    let app = router(state);

    info!("Binding to {address}");
    let listener = TcpListener::bind(&address).await?;
    info!("Server running on {address}");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server shut down");

    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        ctrl_c().await.expect("Failed to install Ctrl+C handler");

        info!("Received Ctrl+C, shutting down");
    };

    #[cfg(unix)]
    let terminate = async {
        signal(SignalKind::terminate())
            .expect("Failed to install signal handler")
            .recv()
            .await;

        info!("Received terminate signal, shutting down");
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
