//! Status Routes
//!
//! - GET /api/v1/status - Cache and poller status
//! - POST /api/v1/refresh - Refresh from the sensor API now

use axum::{extract::State, Json};
use std::sync::Arc;

use crate::api::dto::{SlotStatus, StatusResponse};
use crate::api::state::AppState;
use crate::dashboard::{RefreshReport, Resolved};

/// GET /api/v1/status
pub async fn get_status(State(state): State<Arc<AppState>>) -> Json<StatusResponse> {
    let snapshot = state.dashboard.snapshot().await;

    let poller = match &state.poller {
        Some(poller) => Some(poller.status().await),
        None => None,
    };

    Json(StatusResponse {
        devices: slot_status(&snapshot.devices),
        readings: slot_status(&snapshot.readings),
        poller,
    })
}

/// POST /api/v1/refresh
///
/// Runs a refresh immediately. Failures are reported in the body; the cache
/// keeps serving the last good values.
pub async fn trigger_refresh(State(state): State<Arc<AppState>>) -> Json<RefreshReport> {
    let report = match &state.poller {
        Some(poller) => poller.run_once().await,
        None => state.dashboard.refresh().await,
    };

    tracing::info!(success = report.is_success(), "Manual refresh triggered");

    Json(report)
}

fn slot_status<T>(slot: &Resolved<Vec<T>>) -> SlotStatus {
    SlotStatus {
        cached: slot.value.is_some(),
        items: slot.value.as_ref().map(Vec::len).unwrap_or(0),
        fetched_at: slot.fetched_at,
        stale: slot.is_stale(),
        error: slot.error.clone(),
    }
}
