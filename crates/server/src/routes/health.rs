//! Health check endpoint.
//!
//! Probes the store with a bounded `SELECT 1` (or the in-memory equivalent)
//! and never lets caches keep a stale answer.

use axum::{
    Json,
    extract::State,
    http::{StatusCode, header},
    response::IntoResponse,
};
use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::state::AppState;

const NO_CACHE: [(header::HeaderName, &str); 3] = [
    (header::CACHE_CONTROL, "no-cache, no-store, must-revalidate"),
    (header::PRAGMA, "no-cache"),
    (header::EXPIRES, "0"),
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum HealthStatus {
    Healthy,
    Unhealthy,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum DatabaseStatus {
    Connected,
    Disconnected,
}

#[derive(Debug, Serialize)]
pub struct Services {
    pub database: DatabaseStatus,
    pub application: &'static str,
}

/// Body of `GET /api/health`.
#[derive(Debug, Serialize)]
pub struct HealthReport {
    pub status: HealthStatus,
    pub timestamp: DateTime<Utc>,
    pub environment: &'static str,
    pub version: &'static str,
    pub services: Services,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Health check with a database probe.
///
/// Returns 200 when the store answers within the health timeout, 503 with
/// the failure message otherwise.
pub async fn health(State(state): State<AppState>) -> impl IntoResponse {
    let timeout = state.config().health_check_timeout;

    let error = match tokio::time::timeout(timeout, state.store().ping()).await {
        Ok(Ok(())) => None,
        Ok(Err(e)) => Some(e.to_string()),
        Err(_) => Some(format!(
            "database health check timed out after {}ms",
            timeout.as_millis()
        )),
    };

    if let Some(error) = &error {
        tracing::warn!(error = %error, "Health check failed");
    }

    let (status, health, database) = if error.is_none() {
        (StatusCode::OK, HealthStatus::Healthy, DatabaseStatus::Connected)
    } else {
        (
            StatusCode::SERVICE_UNAVAILABLE,
            HealthStatus::Unhealthy,
            DatabaseStatus::Disconnected,
        )
    };

    let report = HealthReport {
        status: health,
        timestamp: Utc::now(),
        environment: state.config().environment.as_str(),
        version: env!("CARGO_PKG_VERSION"),
        services: Services {
            database,
            application: "running",
        },
        error,
    };

    (status, NO_CACHE, Json(report))
}
