//! Page Routes
//!
//! Server-rendered dashboard pages.
//!
//! - GET / - Dashboard for the first listed device
//! - GET /devices/:id - Dashboard for a specific device

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::Html,
};
use std::sync::Arc;

use crate::api::state::AppState;
use crate::dashboard::{render_page, RenderOptions};

/// GET /
pub async fn index(State(state): State<Arc<AppState>>) -> (StatusCode, Html<String>) {
    render(&state, None).await
}

/// GET /devices/:id
pub async fn device_page(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> (StatusCode, Html<String>) {
    render(&state, Some(id.as_str())).await
}

async fn render(state: &AppState, device_id: Option<&str>) -> (StatusCode, Html<String>) {
    let snapshot = state.dashboard.snapshot().await;
    let page = snapshot.page(device_id);

    let footer = snapshot
        .readings
        .fetched_at
        .map(|at| format!("Data last updated {}", at.format("%Y-%m-%d %H:%M:%S UTC")));

    let options = RenderOptions {
        refresh_secs: state.config.refresh_interval_secs,
        footer,
    };

    let status = if page.unknown_device {
        StatusCode::NOT_FOUND
    } else {
        StatusCode::OK
    };

    (status, Html(render_page(&page, &options)))
}
