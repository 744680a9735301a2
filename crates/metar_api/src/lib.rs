//! METAR map API Library
//!
//! Read-only view of the light map plus a software mode button.

mod app_state;
mod mode;
mod status;

pub use crate::app_state::{AppState, SharedToggle};

use axum::{
    Router,
    routing::{get, post},
};
use tower_http::trace::TraceLayer;

/// Health check endpoint
pub async fn health_check() -> &'static str {
    "OK"
}

/// Create the application router with all endpoints
pub fn create_app(app_state: AppState) -> Router {
    Router::new()
        .route("/health", get(health_check))
        .route("/status", get(status::get_status))
        .route("/stations", get(status::get_stations))
        .route("/stations/{station_id}", get(status::get_station))
        .route("/mode", get(mode::get_mode))
        .route("/mode/toggle", post(mode::toggle_mode))
        .layer(TraceLayer::new_for_http())
        .with_state(app_state)
}
