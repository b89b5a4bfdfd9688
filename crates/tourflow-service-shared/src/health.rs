//! Health check handlers for Kubernetes probes.
//!
//! `/health/live` reports the process is up; `/health/ready` additionally
//! opens a store connection and counts the catalog, so a missing or
//! corrupt database flips readiness to 503.

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};

use crate::AppState;

/// Health status response for liveness and readiness probes.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthStatus {
    /// Status indicator: "ok" or "not_ready: {reason}".
    pub status: String,

    /// Service name for identification.
    pub service: String,

    /// Service version from build-time.
    pub version: String,

    /// Number of tours currently stored (readiness only).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tours_stored: Option<i64>,
}

impl HealthStatus {
    /// Healthy liveness status.
    pub fn alive(service: &str, version: &str) -> Self {
        Self {
            status: "ok".to_string(),
            service: service.to_string(),
            version: version.to_string(),
            tours_stored: None,
        }
    }

    /// Ready status with catalog size.
    pub fn ready(service: &str, version: &str, tours: i64) -> Self {
        Self {
            status: "ok".to_string(),
            service: service.to_string(),
            version: version.to_string(),
            tours_stored: Some(tours),
        }
    }

    /// Not-ready status with a reason.
    pub fn not_ready(service: &str, version: &str, reason: &str) -> Self {
        Self {
            status: format!("not_ready: {reason}"),
            service: service.to_string(),
            version: version.to_string(),
            tours_stored: None,
        }
    }
}

/// Liveness probe handler; does not touch the store.
pub async fn health_live() -> impl IntoResponse {
    let status = HealthStatus::alive(env!("CARGO_PKG_NAME"), env!("CARGO_PKG_VERSION"));
    (StatusCode::OK, Json(status))
}

/// Readiness probe handler; verifies the store is reachable.
pub async fn health_ready(State(state): State<AppState>) -> Response {
    let service = env!("CARGO_PKG_NAME");
    let version = env!("CARGO_PKG_VERSION");

    let tours = state
        .open_store()
        .and_then(|store| store.count_tours());

    match tours {
        Ok(count) => {
            let status = HealthStatus::ready(service, version, count);
            (StatusCode::OK, Json(status)).into_response()
        }
        Err(e) => {
            let status = HealthStatus::not_ready(service, version, &e.to_string());
            (StatusCode::SERVICE_UNAVAILABLE, Json(status)).into_response()
        }
    }
}
