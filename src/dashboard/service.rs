//! Dashboard Service
//!
//! Polls both sensor endpoints and keeps the last good response of each.

use chrono::{DateTime, Utc};
use serde::Serialize;
use std::sync::Arc;
use std::time::Instant;

use super::cache::{CacheSlot, Resolved};
use crate::sensor::{Device, Reading, SensorSource};

/// Outcome of one refresh of both endpoints
#[derive(Debug, Clone, Serialize)]
pub struct RefreshReport {
    pub refreshed_at: DateTime<Utc>,
    pub duration_ms: u64,
    /// Number of devices fetched, or None if the fetch failed
    pub devices: Option<usize>,
    /// Number of readings fetched, or None if the fetch failed
    pub readings: Option<usize>,
    pub errors: Vec<String>,
}

impl RefreshReport {
    pub fn is_success(&self) -> bool {
        self.errors.is_empty()
    }
}

/// Point-in-time view of both cache slots
#[derive(Debug, Clone, Serialize)]
pub struct DashboardSnapshot {
    pub devices: Resolved<Vec<Device>>,
    pub readings: Resolved<Vec<Reading>>,
}

/// Owns the sensor source and the cached responses
pub struct Dashboard {
    source: Arc<dyn SensorSource>,
    devices: CacheSlot<Vec<Device>>,
    readings: CacheSlot<Vec<Reading>>,
}

impl Dashboard {
    pub fn new(source: Arc<dyn SensorSource>) -> Self {
        Self {
            source,
            devices: CacheSlot::new(),
            readings: CacheSlot::new(),
        }
    }

    /// Fetch devices then readings, falling back to cache on failure
    pub async fn refresh(&self) -> RefreshReport {
        let start = Instant::now();
        let mut errors = Vec::new();

        let devices_result = self.source.fetch_devices().await;
        let devices = devices_result.as_ref().ok().map(Vec::len);
        if let Err(e) = &devices_result {
            tracing::warn!(error = %e, "Device fetch failed, serving cached list");
            errors.push(e.to_string());
        }
        self.devices.apply(devices_result).await;

        let readings_result = self.source.fetch_readings().await;
        let readings = readings_result.as_ref().ok().map(Vec::len);
        if let Err(e) = &readings_result {
            tracing::warn!(error = %e, "Reading fetch failed, serving cached data");
            errors.push(e.to_string());
        }
        self.readings.apply(readings_result).await;

        let report = RefreshReport {
            refreshed_at: Utc::now(),
            duration_ms: start.elapsed().as_millis() as u64,
            devices,
            readings,
            errors,
        };

        tracing::debug!(
            devices = ?report.devices,
            readings = ?report.readings,
            duration_ms = report.duration_ms,
            "Dashboard refreshed"
        );

        report
    }

    /// Current cached state of both endpoints
    pub async fn snapshot(&self) -> DashboardSnapshot {
        DashboardSnapshot {
            devices: self.devices.resolved().await,
            readings: self.readings.resolved().await,
        }
    }

    /// True once a device list has been fetched successfully
    pub async fn is_ready(&self) -> bool {
        self.devices.has_value().await
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::sensor::{FetchError, Resource};
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

    /// In-memory sensor source that can be switched to failing
    pub struct StubSource {
        pub devices: Vec<Device>,
        pub readings: Vec<Reading>,
        pub failing: AtomicBool,
        /// Device list fetches, one per refresh
        pub calls: AtomicUsize,
    }

    impl StubSource {
        pub fn new(devices: Vec<Device>, readings: Vec<Reading>) -> Self {
            Self {
                devices,
                readings,
                failing: AtomicBool::new(false),
                calls: AtomicUsize::new(0),
            }
        }

        pub fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }

        pub fn set_failing(&self, failing: bool) {
            self.failing.store(failing, Ordering::SeqCst);
        }

        fn check(&self, resource: Resource) -> Result<(), FetchError> {
            if self.failing.load(Ordering::SeqCst) {
                Err(FetchError::Status {
                    resource,
                    status: 503,
                })
            } else {
                Ok(())
            }
        }
    }

    #[async_trait]
    impl SensorSource for StubSource {
        async fn fetch_devices(&self) -> Result<Vec<Device>, FetchError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.check(Resource::Devices)?;
            Ok(self.devices.clone())
        }

        async fn fetch_readings(&self) -> Result<Vec<Reading>, FetchError> {
            self.check(Resource::Data)?;
            Ok(self.readings.clone())
        }
    }

    pub fn sample_reading(device_id: &str, timestamp: &str, aqi: f64) -> Reading {
        Reading {
            device_id: device_id.to_string(),
            corrected_gas: Some(aqi),
            dust: Some(18.0),
            gas: Some(350.0),
            humidity: Some(45.0),
            temperature: Some(22.0),
            timestamp: timestamp.to_string(),
            location: Some("Office".to_string()),
        }
    }

    pub fn sample_source() -> StubSource {
        StubSource::new(
            vec![Device::new("device1"), Device::new("device2")],
            vec![
                sample_reading("device2", "2024-10-15 10:00:00", 80.0),
                sample_reading("device1", "2024-10-15 10:00:00", 40.0),
                sample_reading("device1", "2024-10-15 11:00:00", 60.0),
            ],
        )
    }

    #[tokio::test]
    async fn test_refresh_populates_cache() {
        let source = Arc::new(sample_source());
        let dashboard = Dashboard::new(source.clone());
        assert!(!dashboard.is_ready().await);

        let report = dashboard.refresh().await;
        assert!(report.is_success());
        assert_eq!(source.calls(), 1);
        assert_eq!(report.devices, Some(2));
        assert_eq!(report.readings, Some(3));

        let snapshot = dashboard.snapshot().await;
        assert_eq!(snapshot.devices.value.map(|d| d.len()), Some(2));
        assert!(dashboard.is_ready().await);
    }

    #[tokio::test]
    async fn test_failed_refresh_falls_back_to_cache() {
        let source = Arc::new(sample_source());
        let dashboard = Dashboard::new(source.clone());
        dashboard.refresh().await;

        source.set_failing(true);
        let report = dashboard.refresh().await;
        assert!(!report.is_success());
        assert_eq!(report.errors.len(), 2);
        assert_eq!(report.readings, None);

        let snapshot = dashboard.snapshot().await;
        assert_eq!(snapshot.readings.value.as_ref().map(|r| r.len()), Some(3));
        assert_eq!(
            snapshot.readings.error.as_deref(),
            Some("Error fetching data. Status code: 503")
        );
        assert!(snapshot.devices.is_stale());
    }

    #[tokio::test]
    async fn test_failed_first_refresh_has_no_data() {
        let source = Arc::new(sample_source());
        source.set_failing(true);
        let dashboard = Dashboard::new(source);

        dashboard.refresh().await;
        let snapshot = dashboard.snapshot().await;
        assert!(snapshot.devices.value.is_none());
        assert!(snapshot.readings.value.is_none());
        assert!(!dashboard.is_ready().await);
    }
}
