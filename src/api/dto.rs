//! Data Transfer Objects
//!
//! Response types for the JSON endpoints.

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::poller::PollerStatus;
use crate::sensor::Device;

// ============================================
// DEVICE DTOs
// ============================================

/// Device list response
#[derive(Debug, Serialize)]
pub struct DeviceListResponse {
    pub devices: Vec<Device>,
    pub total: usize,
    /// When the list was last fetched successfully
    pub fetched_at: Option<DateTime<Utc>>,
    /// Error from the most recent fetch, if it failed
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

// ============================================
// STATUS DTOs
// ============================================

/// Cache state of one endpoint
#[derive(Debug, Serialize)]
pub struct SlotStatus {
    pub cached: bool,
    pub items: usize,
    pub fetched_at: Option<DateTime<Utc>>,
    pub stale: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Status response
#[derive(Debug, Serialize)]
pub struct StatusResponse {
    pub devices: SlotStatus,
    pub readings: SlotStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub poller: Option<PollerStatus>,
}

// ============================================
// HEALTH DTOs
// ============================================

/// Health check response
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    /// Overall status: healthy, degraded, unhealthy
    pub status: String,
    /// Device list status: ok, stale, error
    pub devices: String,
    /// Readings status: ok, stale, error
    pub readings: String,
    /// Uptime in seconds
    pub uptime_seconds: u64,
    /// Version string
    pub version: String,
}
