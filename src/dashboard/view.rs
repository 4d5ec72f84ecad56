//! Page view model
//!
//! Turns a cached snapshot into what one page shows for one selected device:
//! banners, the device list, and the device's card and charts.

use serde::Serialize;
use serde_json::Value;

use super::charts::{aqi_gauge, dust_gauge, line_chart};
use super::service::DashboardSnapshot;
use crate::sensor::{sort_by_device, Reading};

/// Severity of a page banner
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum BannerLevel {
    Error,
    Warning,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Banner {
    pub level: BannerLevel,
    pub message: String,
}

impl Banner {
    pub fn error(message: impl Into<String>) -> Self {
        Self {
            level: BannerLevel::Error,
            message: message.into(),
        }
    }

    pub fn warning(message: impl Into<String>) -> Self {
        Self {
            level: BannerLevel::Warning,
            message: message.into(),
        }
    }
}

/// Everything shown for the selected device
#[derive(Debug, Clone, Serialize)]
pub struct DeviceView {
    pub device_id: String,
    /// Most recent reading, shown on the card and the gauges
    pub latest: Reading,
    /// Number of readings behind the line chart
    pub history_len: usize,
    pub aqi_gauge: Value,
    pub dust_gauge: Value,
    pub line_chart: Value,
}

/// One rendered dashboard page
#[derive(Debug, Clone, Serialize)]
pub struct PageView {
    pub banners: Vec<Banner>,
    /// Device ids for the sidebar, in API order
    pub device_ids: Vec<String>,
    pub selected: Option<String>,
    pub device: Option<DeviceView>,
    /// True when the requested device is not in the device list
    pub unknown_device: bool,
}

impl PageView {
    fn empty() -> Self {
        Self {
            banners: Vec::new(),
            device_ids: Vec::new(),
            selected: None,
            device: None,
            unknown_device: false,
        }
    }

    pub fn has_warning(&self) -> bool {
        self.banners.iter().any(|b| b.level == BannerLevel::Warning)
    }
}

impl DeviceView {
    /// Build the view from a device's readings, oldest first.
    ///
    /// Returns None when there are no readings.
    pub fn from_readings(device_id: &str, readings: &[Reading]) -> Option<Self> {
        let latest = readings.last()?.clone();

        Some(Self {
            device_id: device_id.to_string(),
            aqi_gauge: aqi_gauge(latest.aqi()),
            dust_gauge: dust_gauge(latest.dust),
            line_chart: line_chart(readings),
            history_len: readings.len(),
            latest,
        })
    }
}

impl DashboardSnapshot {
    /// Build the page for the requested device, or the first listed device
    pub fn page(&self, requested: Option<&str>) -> PageView {
        let mut page = PageView::empty();

        let devices = match &self.devices.value {
            Some(devices) => devices,
            None => {
                let message = self
                    .devices
                    .error
                    .clone()
                    .unwrap_or_else(|| "Device list has not been fetched yet.".to_string());
                page.banners.push(Banner::error(message));
                return page;
            }
        };

        if let Some(error) = &self.devices.error {
            page.banners.push(Banner::error(error.clone()));
        }

        if devices.is_empty() {
            page.banners.push(Banner::warning("No devices found."));
            return page;
        }

        page.device_ids = devices.iter().map(|d| d.device_id.clone()).collect();

        let selected = match requested {
            Some(id) if page.device_ids.iter().any(|d| d == id) => id.to_string(),
            Some(id) => {
                page.banners
                    .push(Banner::warning(format!("Unknown device ID: {}", id)));
                page.unknown_device = true;
                return page;
            }
            None => page.device_ids[0].clone(),
        };
        page.selected = Some(selected.clone());

        if let Some(error) = &self.readings.error {
            page.banners.push(Banner::error(error.clone()));
        }

        let readings = match &self.readings.value {
            Some(readings) if !readings.is_empty() => readings,
            _ => return page,
        };

        let mut sorted = readings.clone();
        sort_by_device(&mut sorted);
        let device_readings: Vec<Reading> = sorted
            .into_iter()
            .filter(|r| r.device_id == selected)
            .collect();

        match DeviceView::from_readings(&selected, &device_readings) {
            Some(view) => page.device = Some(view),
            None => page.banners.push(Banner::warning(format!(
                "No data found for device ID: {}",
                selected
            ))),
        }

        page
    }
}
