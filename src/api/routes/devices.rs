//! Device Routes
//!
//! JSON access to the cached device list and per-device views.
//!
//! - GET /api/v1/devices - List devices
//! - GET /api/v1/devices/:id - Page view for a device (banners, latest reading, chart options)

use axum::{
    extract::{Path, State},
    Json,
};
use std::sync::Arc;

use crate::api::dto::DeviceListResponse;
use crate::api::error::{ApiError, ApiResult};
use crate::api::state::AppState;
use crate::dashboard::PageView;

/// GET /api/v1/devices
///
/// List the cached devices. Fails only if no list was ever fetched.
pub async fn list_devices(
    State(state): State<Arc<AppState>>,
) -> ApiResult<Json<DeviceListResponse>> {
    let snapshot = state.dashboard.snapshot().await;
    let resolved = snapshot.devices;

    let devices = resolved.value.ok_or_else(|| {
        ApiError::ServiceUnavailable(
            resolved
                .error
                .clone()
                .unwrap_or_else(|| "Device list has not been fetched yet".to_string()),
        )
    })?;

    Ok(Json(DeviceListResponse {
        total: devices.len(),
        devices,
        fetched_at: resolved.fetched_at,
        error: resolved.error,
    }))
}

/// GET /api/v1/devices/:id
///
/// The same view the HTML page renders, as JSON.
pub async fn get_device(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> ApiResult<Json<PageView>> {
    let snapshot = state.dashboard.snapshot().await;
    let page = snapshot.page(Some(id.as_str()));

    if page.unknown_device {
        return Err(ApiError::NotFound(format!("Device {} not found", id)));
    }

    Ok(Json(page))
}
