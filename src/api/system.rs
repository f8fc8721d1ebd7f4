use axum::{Json, extract::State, response::IntoResponse};
use serde::Serialize;
use std::sync::Arc;

use super::types::SystemStatusDto;
use super::{ApiError, ApiResponse, AppState};

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
}

/// GET /health
/// Lightweight liveness probe to indicate the API process is running
pub async fn health(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let status = if state.store().ping().await.is_ok() {
        "ok"
    } else {
        "degraded"
    };

    Json(ApiResponse::success(HealthResponse { status }))
}

/// GET /api/system/status
pub async fn get_status(
    State(state): State<Arc<AppState>>,
) -> Result<Json<ApiResponse<SystemStatusDto>>, ApiError> {
    let store = state.store();

    let database = if store.ping().await.is_ok() {
        "ok"
    } else {
        "error"
    };

    let status = SystemStatusDto {
        version: env!("CARGO_PKG_VERSION").to_string(),
        uptime_seconds: state.start_time.elapsed().as_secs(),
        users: store.count_users().await?,
        forms: store.count_forms().await?,
        submissions: store.count_submissions().await?,
        database: database.to_string(),
    };

    Ok(Json(ApiResponse::success(status)))
}
