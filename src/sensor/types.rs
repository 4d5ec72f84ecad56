//! Sensor wire types
//!
//! Shapes returned by the sensor API. Both are owned by the remote service;
//! unknown fields are ignored and nothing beyond the field types is enforced.
//! Measured values may be `null` or absent; such a reading is still kept.

use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

/// A device descriptor from the devices endpoint
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Device {
    pub device_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
}

impl Device {
    pub fn new(device_id: impl Into<String>) -> Self {
        Self {
            device_id: device_id.into(),
            location: None,
        }
    }

    /// Builder method to set the location
    pub fn location(mut self, location: impl Into<String>) -> Self {
        self.location = Some(location.into());
        self
    }
}

/// A single sensor reading from the data endpoint
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Reading {
    pub device_id: String,
    /// Corrected gas value, shown as the air quality index
    #[serde(default)]
    pub corrected_gas: Option<f64>,
    /// Dust concentration in µg/m³
    #[serde(default)]
    pub dust: Option<f64>,
    /// Raw gas value in ppm
    #[serde(default)]
    pub gas: Option<f64>,
    /// Relative humidity in %
    #[serde(default)]
    pub humidity: Option<f64>,
    /// Temperature in °C
    #[serde(default)]
    pub temperature: Option<f64>,
    /// Timestamp as sent by the API
    pub timestamp: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
}

impl Reading {
    /// Air quality index for this reading
    pub fn aqi(&self) -> Option<f64> {
        self.corrected_gas
    }

    /// Parse the timestamp into UTC, if it is in a recognized format
    pub fn parsed_timestamp(&self) -> Option<DateTime<Utc>> {
        parse_timestamp(&self.timestamp)
    }
}

/// Naive formats tried after RFC 3339 and RFC 2822, interpreted as UTC
const NAIVE_FORMATS: [&str; 3] = [
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%d %H:%M:%S%.f",
];

/// Parse a timestamp string in any of the formats the sensor API is known to emit
pub fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();

    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(&Utc));
    }
    if let Ok(dt) = DateTime::parse_from_rfc2822(raw) {
        return Some(dt.with_timezone(&Utc));
    }

    NAIVE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(raw, fmt).ok())
        .map(|naive| naive.and_utc())
}

/// Ordering key for a device id: the first run of digits as an integer.
///
/// Ids without digits (or with a run too long for u64) have no key.
pub fn device_number(device_id: &str) -> Option<u64> {
    let start = device_id.find(|c: char| c.is_ascii_digit())?;
    let rest = &device_id[start..];
    let end = rest
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(rest.len());

    rest[..end].parse().ok()
}

/// Compare device ids by their numeric key; unnumbered ids sort last, by string
pub fn compare_device_ids(a: &str, b: &str) -> Ordering {
    match (device_number(a), device_number(b)) {
        (Some(x), Some(y)) => x.cmp(&y),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => a.cmp(b),
    }
}

/// Stable-sort readings by device ordering key
pub fn sort_by_device(readings: &mut [Reading]) {
    readings.sort_by(|a, b| compare_device_ids(&a.device_id, &b.device_id));
}
