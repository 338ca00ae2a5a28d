use axum::http::StatusCode;
use serde::{Deserialize, Serialize};
use tracing::error;

use crate::datalayer::DbOps;

/// Health check response
#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub timestamp: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub database: Option<DatabaseStatus>,
}

/// Database health status
#[derive(Debug, Serialize, Deserialize)]
pub struct DatabaseStatus {
    pub status: String,
    pub latency_ms: Option<u64>,
}

impl HealthResponse {
    pub fn is_healthy(&self) -> bool {
        self.status == "healthy"
    }
}

/// Builds the health report.
///
/// Returns 200 when the service is healthy and 503 when the database does not answer.
/// A service running without a database (in-memory store) reports no database section.
pub async fn health_report(db: Option<&DbOps>) -> (StatusCode, HealthResponse) {
    let database = match db {
        None => None,
        Some(db) => Some(match db.health().await {
            Ok(health) => DatabaseStatus {
                status: "healthy".to_string(),
                latency_ms: Some(health.latency_ms),
            },
            Err(e) => {
                error!(error = %e, "Database health check failed");
                DatabaseStatus {
                    status: "unhealthy".to_string(),
                    latency_ms: None,
                }
            }
        }),
    };

    let healthy = database.as_ref().map_or(true, |d| d.status == "healthy");
    let response = HealthResponse {
        status: if healthy { "healthy" } else { "unhealthy" }.to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        timestamp: chrono::Utc::now().timestamp(),
        database,
    };

    let status = if healthy {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };
    (status, response)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_health_without_database() {
        let (status, response) = health_report(None).await;
        assert_eq!(status, StatusCode::OK);
        assert!(response.is_healthy());
        assert!(response.database.is_none());
        assert_eq!(response.version, env!("CARGO_PKG_VERSION"));
    }
}
