//! Probe and metrics endpoints
//!
//! - /health - process is up
//! - /health/live - liveness, never touches dependencies
//! - /health/ready - readiness, 503 when the local database is unusable
//! - /metrics - Prometheus text exposition

use crate::{db, state::AppState};
use axum::{
    extract::State,
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

const VERSION: &str = env!("CARGO_PKG_VERSION");

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub version: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub checks: Option<HealthChecks>,
}

impl HealthResponse {
    fn plain(status: &'static str) -> Self {
        Self {
            status,
            version: VERSION,
            checks: None,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct HealthChecks {
    pub database: CheckStatus,
}

#[derive(Debug, Serialize)]
pub struct CheckStatus {
    pub healthy: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl<E: std::fmt::Display> From<Result<(), E>> for CheckStatus {
    fn from(result: Result<(), E>) -> Self {
        match result {
            Ok(()) => Self {
                healthy: true,
                message: None,
            },
            Err(e) => Self {
                healthy: false,
                message: Some(e.to_string()),
            },
        }
    }
}

pub async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse::plain("healthy"))
}

pub async fn liveness_check() -> Json<HealthResponse> {
    Json(HealthResponse::plain("alive"))
}

/// Readiness probe: runs a trivial query against the store
pub async fn readiness_check(
    State(state): State<AppState>,
) -> (StatusCode, Json<HealthResponse>) {
    let database = CheckStatus::from(db::health_check(state.db()).await);
    let ready = database.healthy;

    let response = HealthResponse {
        status: if ready { "ready" } else { "not_ready" },
        version: VERSION,
        checks: Some(HealthChecks { database }),
    };

    let status = if ready {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };
    (status, Json(response))
}

/// Prometheus scrape endpoint; 404 when no recorder was installed
pub async fn metrics(State(state): State<AppState>) -> Response {
    match &state.metrics {
        Some(handle) => (
            [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
            handle.render(),
        )
            .into_response(),
        None => StatusCode::NOT_FOUND.into_response(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::AppConfig;
    use crate::db::create_in_memory_pool;

    #[tokio::test]
    async fn test_probes() {
        assert_eq!(health_check().await.status, "healthy");
        assert_eq!(liveness_check().await.status, "alive");
    }

    #[tokio::test]
    async fn test_readiness_against_in_memory_db() {
        let pool = create_in_memory_pool().await.unwrap();
        let state = AppState::new(pool, AppConfig::default());

        let (status, Json(body)) = readiness_check(State(state)).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body.status, "ready");
        assert!(body.checks.unwrap().database.healthy);
    }

    #[test]
    fn test_check_status_from_error() {
        let check = CheckStatus::from(Err::<(), _>("connection refused"));
        assert!(!check.healthy);
        assert_eq!(check.message.as_deref(), Some("connection refused"));
    }
}
