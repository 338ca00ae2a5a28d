use axum::{Json, extract::State, http::StatusCode};
use tracing::{info, instrument};

use crate::controllayer::health::{HealthResponse, health_report};
use crate::state::AppState;

/// GET /health
#[instrument(skip(state), fields(service = "health_check"))]
pub async fn health_check(State(state): State<AppState>) -> (StatusCode, Json<HealthResponse>) {
    let (status, report) = health_report(state.db.as_ref()).await;
    info!(status = %status, "Health check");
    (status, Json(report))
}
