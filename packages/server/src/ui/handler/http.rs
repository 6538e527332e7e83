//! HTTP API endpoint handlers.

use std::sync::Arc;

use axum::{Json, extract::State, http::StatusCode};

use crate::{
    domain::Timestamp,
    infrastructure::dto::http::{HealthDto, StatusDto},
    ui::state::AppState,
};

/// Health check endpoint
pub async fn health_check() -> Json<HealthDto> {
    Json(HealthDto {
        status: "ok".to_string(),
    })
}

/// Server status with a snapshot of the lobby
pub async fn status(State(state): State<Arc<AppState>>) -> Result<Json<StatusDto>, StatusCode> {
    let stats = state.lobby.stats().await.map_err(|e| {
        tracing::error!("Failed to read lobby stats: {}", e);
        StatusCode::SERVICE_UNAVAILABLE
    })?;

    Ok(Json(StatusDto::online(
        stats,
        Timestamp::new(state.clock.now_millis()),
    )))
}
