//! HTTP API endpoint handlers.

use std::sync::Arc;

use axum::{Json, extract::State, http::StatusCode};

use crate::{
    infrastructure::dto::http::{HealthDto, HubStatsDto},
    ui::state::AppState,
};

/// Health check endpoint
pub async fn health_check() -> Json<HealthDto> {
    Json(HealthDto {
        status: "ok".to_string(),
    })
}

/// Live connection counts from the Hub
pub async fn hub_stats(
    State(state): State<Arc<AppState>>,
) -> Result<Json<HubStatsDto>, StatusCode> {
    match state.hub.stats().await {
        Ok(stats) => Ok(Json(HubStatsDto {
            connections: stats.connections,
            users: stats.users,
        })),
        Err(e) => {
            tracing::warn!(error = %e, "Hub stats unavailable");
            Err(StatusCode::SERVICE_UNAVAILABLE)
        }
    }
}
