//! Airwatch HTTP API
//!
//! Dashboard pages and JSON endpoints, built with Axum.
//!
//! # Endpoints
//!
//! ## Pages
//! - `GET /` - Dashboard for the first listed device
//! - `GET /devices/:id` - Dashboard for a specific device
//!
//! ## Devices
//! - `GET /api/v1/devices` - Cached device list
//! - `GET /api/v1/devices/:id` - Device view with chart options
//!
//! ## Status
//! - `GET /api/v1/status` - Cache and poller status
//! - `POST /api/v1/refresh` - Refresh from the sensor API now
//!
//! ## Health
//! - `GET /health/live` - Liveness check
//! - `GET /health/ready` - Readiness check
//! - `GET /health` - Full health status
//!
//! # Example
//!
//! ```rust,ignore
//! use airwatch::api::{serve, ApiConfig, AppState};
//! use airwatch::dashboard::Dashboard;
//! use airwatch::sensor::{HttpSensorSource, SensorClientConfig};
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let source = HttpSensorSource::new(SensorClientConfig::default())?;
//!     let dashboard = Arc::new(Dashboard::new(Arc::new(source)));
//!     let config = ApiConfig::default();
//!
//!     let state = AppState::new(dashboard, config.clone());
//!     serve(state, &config).await?;
//!
//!     Ok(())
//! }
//! ```

pub mod dto;
pub mod error;
pub mod routes;
pub mod state;

pub use error::{ApiError, ApiResult};
pub use state::{ApiConfig, AppState};

use axum::{
    http::HeaderValue,
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tower_http::{
    cors::{AllowOrigin, CorsLayer},
    trace::TraceLayer,
};

/// Build the router with all routes and middleware
pub fn build_router(state: AppState) -> Router {
    let api_routes = Router::new()
        .route("/devices", get(routes::devices::list_devices))
        .route("/devices/:id", get(routes::devices::get_device))
        .route("/status", get(routes::status::get_status))
        .route("/refresh", post(routes::status::trigger_refresh));

    let health_routes = Router::new()
        .route("/live", get(routes::health::liveness))
        .route("/ready", get(routes::health::readiness))
        .route("/", get(routes::health::full_health));

    let cors = cors_layer(&state.config.cors_origins);
    let shared_state = Arc::new(state);

    Router::new()
        .route("/", get(routes::pages::index))
        .route("/devices/:id", get(routes::pages::device_page))
        .nest("/api/v1", api_routes)
        .nest("/health", health_routes)
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(shared_state)
}

fn cors_layer(origins: &[String]) -> CorsLayer {
    let allowed: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|origin| match origin.parse::<HeaderValue>() {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!(%origin, "Ignoring invalid CORS origin");
                None
            }
        })
        .collect();

    if allowed.is_empty() {
        CorsLayer::permissive()
    } else {
        CorsLayer::new().allow_origin(AllowOrigin::list(allowed))
    }
}

/// Start the dashboard server
pub async fn serve(state: AppState, config: &ApiConfig) -> Result<(), ApiError> {
    let router = build_router(state);

    let addr = config.addr();
    let listener = tokio::net::TcpListener::bind(&addr).await?;

    tracing::info!("Airwatch dashboard listening on {}", addr);

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|e| ApiError::Internal(format!("Server error: {}", e)))?;

    tracing::info!("Airwatch dashboard shut down gracefully");
    Ok(())
}

/// Wait for shutdown signal
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("Failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("Shutdown signal received, starting graceful shutdown");
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dashboard::service::tests::{sample_source, StubSource};
    use crate::dashboard::Dashboard;
    use axum::{
        body::Body,
        http::{Request, StatusCode},
        response::Response,
    };
    use tower::util::ServiceExt;

    async fn create_test_app() -> (Router, Arc<StubSource>) {
        let source = Arc::new(sample_source());
        let dashboard = Arc::new(Dashboard::new(source.clone()));
        dashboard.refresh().await;

        let state = AppState::new(dashboard, ApiConfig::default());
        (build_router(state), source)
    }

    async fn send_get(app: Router, uri: &str) -> Response {
        app.oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
            .unwrap()
    }

    async fn body_string(response: Response) -> String {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        String::from_utf8(bytes.to_vec()).unwrap()
    }

    async fn body_json(response: Response) -> serde_json::Value {
        serde_json::from_str(&body_string(response).await).unwrap()
    }

    #[tokio::test]
    async fn test_health_live() {
        let (app, _source) = create_test_app().await;
        let response = send_get(app, "/health/live").await;
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_health_ready_before_first_fetch() {
        let dashboard = Arc::new(Dashboard::new(Arc::new(sample_source())));
        let app = build_router(AppState::new(dashboard, ApiConfig::default()));

        let response = send_get(app, "/health/ready").await;
        assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
    }

    #[tokio::test]
    async fn test_health_full() {
        let (app, _source) = create_test_app().await;
        let response = send_get(app, "/health").await;

        assert_eq!(response.status(), StatusCode::OK);
        let json = body_json(response).await;
        assert_eq!(json["status"], "healthy");
    }

    #[tokio::test]
    async fn test_index_renders_first_device() {
        let (app, _source) = create_test_app().await;
        let response = send_get(app, "/").await;

        assert_eq!(response.status(), StatusCode::OK);
        let html = body_string(response).await;
        assert!(html.contains("Air Quality Monitoring System"));
        assert!(html.contains("<h3>Device ID: device1</h3>"));
        assert!(html.contains("Air Quality Index (AQI): 60</li>"));
    }

    #[tokio::test]
    async fn test_unknown_device_page_is_not_found() {
        let (app, _source) = create_test_app().await;
        let response = send_get(app, "/devices/device42").await;

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        let html = body_string(response).await;
        assert!(html.contains("Unknown device ID: device42"));
    }

    #[tokio::test]
    async fn test_page_falls_back_to_cache_with_banner() {
        let (app, source) = create_test_app().await;
        source.set_failing(true);

        let response = app
            .clone()
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/api/v1/refresh")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let report = body_json(response).await;
        assert_eq!(report["errors"].as_array().unwrap().len(), 2);

        let html = body_string(send_get(app, "/devices/device2").await).await;
        assert!(html.contains("banner error"));
        assert!(html.contains("Error fetching data. Status code: 503"));
        assert!(html.contains("Air Quality Index (AQI): 80</li>"));
    }

    #[tokio::test]
    async fn test_zero_refresh_interval_reloads_after_one_second() {
        let config = crate::config::Config::parse("[dashboard]\nrefresh_interval_secs = 0").unwrap();
        let dashboard = Arc::new(Dashboard::new(Arc::new(sample_source())));
        dashboard.refresh().await;
        let app = build_router(AppState::new(dashboard, config.api_config()));

        let html = body_string(send_get(app, "/").await).await;
        assert!(html.contains("<meta http-equiv=\"refresh\" content=\"1\">"));
    }

    #[tokio::test]
    async fn test_list_devices() {
        let (app, _source) = create_test_app().await;
        let response = send_get(app, "/api/v1/devices").await;

        assert_eq!(response.status(), StatusCode::OK);
        let json = body_json(response).await;
        assert_eq!(json["total"], 2);
        assert_eq!(json["devices"][0]["device_id"], "device1");
    }

    #[tokio::test]
    async fn test_list_devices_unavailable() {
        let source = Arc::new(sample_source());
        source.set_failing(true);
        let dashboard = Arc::new(Dashboard::new(source));
        dashboard.refresh().await;
        let app = build_router(AppState::new(dashboard, ApiConfig::default()));

        let response = send_get(app, "/api/v1/devices").await;
        assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
        let json = body_json(response).await;
        assert_eq!(json["error"]["code"], "SERVICE_UNAVAILABLE");
    }

    #[tokio::test]
    async fn test_get_device_view() {
        let (app, _source) = create_test_app().await;
        let response = send_get(app, "/api/v1/devices/device1").await;

        assert_eq!(response.status(), StatusCode::OK);
        let json = body_json(response).await;
        assert_eq!(json["selected"], "device1");
        assert_eq!(json["device"]["history_len"], 2);
        assert_eq!(json["device"]["aqi_gauge"]["series"][0]["data"][0]["value"], 60.0);
    }

    #[tokio::test]
    async fn test_get_unknown_device_view() {
        let (app, _source) = create_test_app().await;
        let response = send_get(app, "/api/v1/devices/nope").await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_status() {
        let (app, _source) = create_test_app().await;
        let response = send_get(app, "/api/v1/status").await;

        assert_eq!(response.status(), StatusCode::OK);
        let json = body_json(response).await;
        assert_eq!(json["devices"]["items"], 2);
        assert_eq!(json["readings"]["items"], 3);
        assert_eq!(json["readings"]["stale"], false);
    }
}
