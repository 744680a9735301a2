use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
};
use metar_core::brightness::DayPhase;
use metar_core::{AnimationPhase, EnrichedStation};
use serde::{Deserialize, Serialize};
use std::sync::PoisonError;

use crate::app_state::AppState;

#[derive(Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusResponse {
    pub tick: u64,
    pub mode: String,
    pub phase: AnimationPhase,
    pub day_phase: DayPhase,
    pub brightness: f32,
    /// Last frame as `#c0c1c2` in the strip's channel order
    pub frame: Vec<String>,
}

#[derive(Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ErrorResponse {
    pub error: String,
}

/// Get the display state and the last frame shown
pub async fn get_status(State(app_state): State<AppState>) -> Json<StatusResponse> {
    tracing::debug!("Getting display status");
    let snapshot = app_state.snapshots.borrow().clone();
    Json(StatusResponse {
        tick: snapshot.tick,
        mode: snapshot.state.mode.as_str().to_string(),
        phase: snapshot.state.phase,
        day_phase: snapshot.state.day_phase,
        brightness: snapshot.state.brightness,
        frame: snapshot.frame.iter().map(|color| color.to_hex()).collect(),
    })
}

/// Get every enriched station, sorted by identifier
pub async fn get_stations(State(app_state): State<AppState>) -> Json<Vec<EnrichedStation>> {
    tracing::debug!("Getting enriched stations");
    let table = app_state.stations.read().unwrap_or_else(PoisonError::into_inner);
    let mut stations: Vec<EnrichedStation> = table.stations().cloned().collect();
    stations.sort_by(|a, b| a.station_id.cmp(&b.station_id));
    Json(stations)
}

/// Get one enriched station
pub async fn get_station(
    State(app_state): State<AppState>,
    Path(station_id): Path<String>,
) -> impl IntoResponse {
    let table = app_state.stations.read().unwrap_or_else(PoisonError::into_inner);
    match table.get(&station_id) {
        Some(station) => (StatusCode::OK, Json(station.clone())).into_response(),
        None => (
            StatusCode::NOT_FOUND,
            Json(ErrorResponse {
                error: format!("No report for station {}", station_id),
            }),
        )
            .into_response(),
    }
}
