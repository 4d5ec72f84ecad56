//! Health Routes
//!
//! Health check endpoints for monitoring and Kubernetes.
//!
//! - GET /health/live - Liveness check (process is alive)
//! - GET /health/ready - Readiness check (device list fetched at least once)
//! - GET /health - Full health status

use axum::{extract::State, http::StatusCode, Json};
use std::sync::Arc;

use crate::api::dto::HealthResponse;
use crate::api::state::AppState;
use crate::dashboard::Resolved;

/// GET /health/live
///
/// Kubernetes liveness check.
/// Returns 200 if the process is alive, no dependency checks.
pub async fn liveness() -> StatusCode {
    StatusCode::OK
}

/// GET /health/ready
///
/// Kubernetes readiness check.
/// Returns 200 once a device list is available to render.
pub async fn readiness(State(state): State<Arc<AppState>>) -> StatusCode {
    if state.dashboard.is_ready().await {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    }
}

/// GET /health
///
/// Full health status with per-endpoint details.
pub async fn full_health(State(state): State<Arc<AppState>>) -> Json<HealthResponse> {
    let snapshot = state.dashboard.snapshot().await;

    let devices = slot_health(&snapshot.devices);
    let readings = slot_health(&snapshot.readings);

    let overall_status = match (devices, readings) {
        ("ok", "ok") => "healthy",
        ("error", _) => "unhealthy",
        _ => "degraded",
    };

    Json(HealthResponse {
        status: overall_status.to_string(),
        devices: devices.to_string(),
        readings: readings.to_string(),
        uptime_seconds: state.uptime_seconds(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

fn slot_health<T>(slot: &Resolved<T>) -> &'static str {
    match (&slot.value, &slot.error) {
        (Some(_), None) => "ok",
        (Some(_), Some(_)) => "stale",
        (None, _) => "error",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_liveness() {
        let status = liveness().await;
        assert_eq!(status, StatusCode::OK);
    }

    #[test]
    fn test_slot_health() {
        let mut slot: Resolved<Vec<u8>> = Resolved::default();
        assert_eq!(slot_health(&slot), "error");

        slot.value = Some(vec![]);
        assert_eq!(slot_health(&slot), "ok");

        slot.error = Some("Error fetching data. Status code: 500".into());
        assert_eq!(slot_health(&slot), "stale");
    }
}
