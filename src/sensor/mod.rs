//! Sensor API
//!
//! Access to the remote air-quality sensor API.
//!
//! - **types**: `Device` and `Reading` as the API sends them
//! - **client**: reqwest implementation of [`SensorSource`]

mod client;
mod types;

pub use client::{FetchError, HttpSensorSource, Resource, SensorClientConfig};
pub use types::{
    compare_device_ids, device_number, parse_timestamp, sort_by_device, Device, Reading,
};

use async_trait::async_trait;

/// Source of device lists and sensor readings
#[async_trait]
pub trait SensorSource: Send + Sync {
    /// Fetch the list of known devices
    async fn fetch_devices(&self) -> Result<Vec<Device>, FetchError>;

    /// Fetch all current readings, across devices
    async fn fetch_readings(&self) -> Result<Vec<Reading>, FetchError>;
}
