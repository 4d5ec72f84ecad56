//! # Airwatch
//!
//! Air quality dashboard. Polls a sensor API for device readings and renders
//! them as gauges and time-series charts.
//!
//! ## Modules
//!
//! - [`sensor`]: Sensor API types and HTTP client
//! - [`dashboard`]: Last-good-value cache, page views, chart options, HTML
//! - [`poller`]: Background refresh task
//! - [`api`]: Dashboard server with Axum
//! - [`config`]: TOML + environment configuration
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use airwatch::dashboard::Dashboard;
//! use airwatch::sensor::{HttpSensorSource, SensorClientConfig};
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let source = HttpSensorSource::new(SensorClientConfig::new("http://127.0.0.1:5000"))?;
//!     let dashboard = Dashboard::new(Arc::new(source));
//!
//!     // Fetch both endpoints; failures keep the previous values
//!     let report = dashboard.refresh().await;
//!     println!("Refresh errors: {:?}", report.errors);
//!
//!     // Build the page for the first device
//!     let page = dashboard.snapshot().await.page(None);
//!     if let Some(device) = page.device {
//!         println!("{} AQI: {:?}", device.device_id, device.latest.aqi());
//!     }
//!
//!     Ok(())
//! }
//! ```

pub mod api;
pub mod config;
pub mod dashboard;
pub mod poller;
pub mod sensor;

// Re-export top-level types for convenience
pub use sensor::{
    Device, FetchError, HttpSensorSource, Reading, Resource, SensorClientConfig, SensorSource,
};

pub use dashboard::{
    Banner, BannerLevel, CacheSlot, Dashboard, DashboardSnapshot, DeviceView, Element, PageView,
    RefreshReport, RenderOptions, Resolved,
};

pub use poller::{Poller, PollerStatus};

pub use api::{build_router, serve, ApiConfig, ApiError, AppState};

pub use config::{
    Config, ConfigError, DashboardConfig, LoggingConfig, ServerConfig, SourceConfig,
};
