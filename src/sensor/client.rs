//! Sensor API HTTP Client
//!
//! Plain GET requests against the devices and data endpoints. No retries:
//! a failed fetch is reported once and the dashboard falls back to its cache.

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::de::DeserializeOwned;
use std::fmt;
use std::time::Duration;
use thiserror::Error;

use super::types::{Device, Reading};
use super::SensorSource;

/// Configuration for the sensor API client
#[derive(Debug, Clone)]
pub struct SensorClientConfig {
    /// Base URL of the sensor API (e.g., "http://127.0.0.1:5000")
    pub base_url: String,
    /// Path of the readings endpoint
    pub data_path: String,
    /// Path of the device list endpoint
    pub devices_path: String,
    /// Request timeout in milliseconds
    pub request_timeout_ms: u64,
}

impl Default for SensorClientConfig {
    fn default() -> Self {
        Self {
            base_url: "http://127.0.0.1:5000".to_string(),
            data_path: "/data".to_string(),
            devices_path: "/devices".to_string(),
            request_timeout_ms: 10_000,
        }
    }
}

impl SensorClientConfig {
    /// Config pointing at a different base URL with default paths
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            ..Default::default()
        }
    }

    pub fn data_url(&self) -> String {
        join_url(&self.base_url, &self.data_path)
    }

    pub fn devices_url(&self) -> String {
        join_url(&self.base_url, &self.devices_path)
    }
}

fn join_url(base: &str, path: &str) -> String {
    format!(
        "{}/{}",
        base.trim_end_matches('/'),
        path.trim_start_matches('/')
    )
}

/// Which endpoint a fetch targeted
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resource {
    Devices,
    Data,
}

impl fmt::Display for Resource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Resource::Devices => write!(f, "devices"),
            Resource::Data => write!(f, "data"),
        }
    }
}

/// Errors that can occur when fetching from the sensor API
#[derive(Error, Debug)]
pub enum FetchError {
    #[error("Error fetching {resource}. Status code: {status}")]
    Status { resource: Resource, status: u16 },

    #[error("Error fetching {resource}: {source}")]
    Request {
        resource: Resource,
        #[source]
        source: reqwest::Error,
    },

    #[error("Error fetching {resource}: malformed response: {message}")]
    Decode { resource: Resource, message: String },
}

impl FetchError {
    pub fn resource(&self) -> Resource {
        match self {
            FetchError::Status { resource, .. }
            | FetchError::Request { resource, .. }
            | FetchError::Decode { resource, .. } => *resource,
        }
    }
}

/// reqwest-backed sensor source
pub struct HttpSensorSource {
    client: Client,
    config: SensorClientConfig,
}

impl HttpSensorSource {
    /// Create a new client with the given configuration
    pub fn new(config: SensorClientConfig) -> Result<Self, FetchError> {
        let client = Client::builder()
            .timeout(Duration::from_millis(config.request_timeout_ms))
            .build()
            .map_err(|e| FetchError::Request {
                resource: Resource::Data,
                source: e,
            })?;

        Ok(Self { client, config })
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        url: &str,
        resource: Resource,
    ) -> Result<T, FetchError> {
        tracing::debug!(%url, %resource, "Fetching from sensor API");

        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| FetchError::Request {
                resource,
                source: e,
            })?;

        let status = response.status();
        if status != StatusCode::OK {
            return Err(FetchError::Status {
                resource,
                status: status.as_u16(),
            });
        }

        let body = response.bytes().await.map_err(|e| FetchError::Request {
            resource,
            source: e,
        })?;

        serde_json::from_slice(&body).map_err(|e| FetchError::Decode {
            resource,
            message: e.to_string(),
        })
    }
}

#[async_trait]
impl SensorSource for HttpSensorSource {
    async fn fetch_devices(&self) -> Result<Vec<Device>, FetchError> {
        self.get_json(&self.config.devices_url(), Resource::Devices)
            .await
    }

    async fn fetch_readings(&self) -> Result<Vec<Reading>, FetchError> {
        self.get_json(&self.config.data_url(), Resource::Data).await
    }
}
