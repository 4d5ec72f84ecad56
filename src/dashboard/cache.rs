//! Last-good-value cache
//!
//! One slot per endpoint. A successful fetch replaces the value; a failed one
//! keeps whatever was there and records the error for the banner.

use chrono::{DateTime, Utc};
use serde::Serialize;
use tokio::sync::RwLock;

use crate::sensor::FetchError;

/// Cached value together with the outcome of the most recent fetch
#[derive(Debug, Clone, Serialize)]
pub struct Resolved<T> {
    /// Last successfully fetched value, if any
    pub value: Option<T>,
    /// When `value` was fetched
    pub fetched_at: Option<DateTime<Utc>>,
    /// Error from the most recent fetch, cleared on success
    pub error: Option<String>,
}

impl<T> Default for Resolved<T> {
    fn default() -> Self {
        Self {
            value: None,
            fetched_at: None,
            error: None,
        }
    }
}

impl<T> Resolved<T> {
    /// True when the latest fetch failed but an older value is being served
    pub fn is_stale(&self) -> bool {
        self.error.is_some() && self.value.is_some()
    }
}

/// Single cache slot guarded by an async lock
pub struct CacheSlot<T> {
    inner: RwLock<Resolved<T>>,
}

impl<T: Clone> CacheSlot<T> {
    pub fn new() -> Self {
        Self {
            inner: RwLock::new(Resolved::default()),
        }
    }

    /// Record a fetch result and return the resulting view
    pub async fn apply(&self, result: Result<T, FetchError>) -> Resolved<T> {
        let mut slot = self.inner.write().await;
        match result {
            Ok(value) => {
                slot.value = Some(value);
                slot.fetched_at = Some(Utc::now());
                slot.error = None;
            }
            Err(e) => {
                slot.error = Some(e.to_string());
            }
        }
        slot.clone()
    }

    /// Current cached value and last error
    pub async fn resolved(&self) -> Resolved<T> {
        self.inner.read().await.clone()
    }

    /// Whether a value has ever been fetched successfully
    pub async fn has_value(&self) -> bool {
        self.inner.read().await.value.is_some()
    }
}

impl<T: Clone> Default for CacheSlot<T> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sensor::Resource;

    fn status_error(status: u16) -> FetchError {
        FetchError::Status {
            resource: Resource::Data,
            status,
        }
    }

    #[tokio::test]
    async fn test_empty_slot() {
        let slot: CacheSlot<Vec<u32>> = CacheSlot::new();
        let resolved = slot.resolved().await;
        assert!(resolved.value.is_none());
        assert!(resolved.error.is_none());
        assert!(!slot.has_value().await);
    }

    #[tokio::test]
    async fn test_failure_keeps_last_value() {
        let slot = CacheSlot::new();
        slot.apply(Ok(vec![1, 2, 3])).await;

        let resolved = slot.apply(Err(status_error(500))).await;
        assert_eq!(resolved.value, Some(vec![1, 2, 3]));
        assert_eq!(
            resolved.error.as_deref(),
            Some("Error fetching data. Status code: 500")
        );
        assert!(resolved.is_stale());
    }

    #[tokio::test]
    async fn test_failure_without_cache() {
        let slot: CacheSlot<Vec<u32>> = CacheSlot::new();
        let resolved = slot.apply(Err(status_error(404))).await;
        assert!(resolved.value.is_none());
        assert!(resolved.error.is_some());
        assert!(!resolved.is_stale());
    }

    #[tokio::test]
    async fn test_success_clears_error_and_replaces() {
        let slot = CacheSlot::new();
        slot.apply(Ok(vec![1])).await;
        slot.apply(Err(status_error(502))).await;

        let resolved = slot.apply(Ok(vec![9])).await;
        assert_eq!(resolved.value, Some(vec![9]));
        assert!(resolved.error.is_none());
        assert!(resolved.fetched_at.is_some());
    }
}
