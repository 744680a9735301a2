use axum::{Json, extract::State, http::StatusCode};
use serde::{Deserialize, Serialize};
use std::sync::{Arc, PoisonError};

use crate::app_state::AppState;
use crate::status::ErrorResponse;

#[derive(Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ModeResponse {
    pub mode: String,
    /// False when the new mode is live but could not be saved
    pub persisted: bool,
}

/// Get the current display mode
pub async fn get_mode(State(app_state): State<AppState>) -> Json<ModeResponse> {
    let toggle = app_state.toggle.lock().unwrap_or_else(PoisonError::into_inner);
    Json(ModeResponse {
        mode: toggle.current().as_str().to_string(),
        persisted: toggle.persisted(),
    })
}

/// Press the mode button. Saving the mode touches the filesystem, so the
/// press runs on the blocking pool.
pub async fn toggle_mode(
    State(app_state): State<AppState>,
) -> Result<Json<ModeResponse>, (StatusCode, Json<ErrorResponse>)> {
    let toggle = Arc::clone(&app_state.toggle);
    let pressed = tokio::task::spawn_blocking(move || {
        let mut toggle = toggle.lock().unwrap_or_else(PoisonError::into_inner);
        match toggle.toggle() {
            Ok(mode) => (mode, true),
            Err(error) => {
                tracing::error!("Could not persist display mode: {error}");
                (toggle.current(), false)
            }
        }
    })
    .await;

    match pressed {
        Ok((mode, persisted)) => Ok(Json(ModeResponse {
            mode: mode.as_str().to_string(),
            persisted,
        })),
        Err(error) => {
            tracing::error!("Mode button task failed: {error}");
            Err((
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse {
                    error: "Mode button task failed".to_string(),
                }),
            ))
        }
    }
}
