//! Application State
//!
//! Shared state accessible by all API handlers.
//! Wrapped in Arc for thread-safe sharing across async tasks.

use std::sync::Arc;
use std::time::Instant;

use crate::dashboard::Dashboard;
use crate::poller::Poller;

/// Shared application state for all handlers
#[derive(Clone)]
pub struct AppState {
    /// Dashboard holding the cached sensor data
    pub dashboard: Arc<Dashboard>,
    /// API configuration
    pub config: Arc<ApiConfig>,
    /// Server start time for uptime tracking
    pub start_time: Instant,
    /// Background refresh poller (optional)
    pub poller: Option<Arc<Poller>>,
}

impl AppState {
    /// Create a new AppState without a background poller
    pub fn new(dashboard: Arc<Dashboard>, config: ApiConfig) -> Self {
        Self {
            dashboard,
            config: Arc::new(config),
            start_time: Instant::now(),
            poller: None,
        }
    }

    /// Create AppState whose status endpoint reports on the given poller
    pub fn with_poller(dashboard: Arc<Dashboard>, config: ApiConfig, poller: Arc<Poller>) -> Self {
        Self {
            poller: Some(poller),
            ..Self::new(dashboard, config)
        }
    }

    /// Get server uptime in seconds
    pub fn uptime_seconds(&self) -> u64 {
        self.start_time.elapsed().as_secs()
    }
}

/// API server configuration
#[derive(Debug, Clone)]
pub struct ApiConfig {
    /// Host to bind to
    pub host: String,
    /// Port to listen on
    pub port: u16,
    /// Allowed CORS origins; empty means permissive
    pub cors_origins: Vec<String>,
    /// Seconds between automatic page reloads
    pub refresh_interval_secs: u64,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8501,
            cors_origins: Vec::new(),
            refresh_interval_secs: 600,
        }
    }
}

impl ApiConfig {
    /// Get the socket address string
    pub fn addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}
