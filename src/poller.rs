//! Refresh Poller
//!
//! Background task that refreshes the dashboard on a fixed interval.

use chrono::{DateTime, Utc};
use serde::Serialize;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{Notify, RwLock};

use crate::dashboard::{Dashboard, RefreshReport};

/// Periodically refreshes a [`Dashboard`]
pub struct Poller {
    dashboard: Arc<Dashboard>,
    interval: Duration,
    running: Arc<AtomicBool>,
    shutdown: Arc<Notify>,
    status: Arc<RwLock<PollerStatus>>,
}

/// Current state of the poller
#[derive(Debug, Clone, Default, Serialize)]
pub struct PollerStatus {
    pub running: bool,
    pub interval_secs: u64,
    pub runs: u64,
    pub last_run: Option<DateTime<Utc>>,
    pub last_report: Option<RefreshReport>,
}

impl Poller {
    /// Create a new poller
    pub fn new(dashboard: Arc<Dashboard>, interval: Duration) -> Self {
        Self {
            dashboard,
            interval,
            running: Arc::new(AtomicBool::new(false)),
            shutdown: Arc::new(Notify::new()),
            status: Arc::new(RwLock::new(PollerStatus {
                interval_secs: interval.as_secs(),
                ..Default::default()
            })),
        }
    }

    /// Refresh once and record the outcome
    pub async fn run_once(&self) -> RefreshReport {
        let report = self.dashboard.refresh().await;

        if report.is_success() {
            tracing::info!(
                devices = ?report.devices,
                readings = ?report.readings,
                "Scheduled refresh complete"
            );
        } else {
            tracing::error!(errors = ?report.errors, "Scheduled refresh failed");
        }

        let mut status = self.status.write().await;
        status.runs += 1;
        status.last_run = Some(report.refreshed_at);
        status.last_report = Some(report.clone());

        report
    }

    /// Start the poller background task. The first refresh runs immediately.
    pub fn start(self: Arc<Self>) -> tokio::task::JoinHandle<()> {
        self.running.store(true, Ordering::SeqCst);
        let poller = self.clone();

        tokio::spawn(async move {
            let mut interval = tokio::time::interval(poller.interval);
            interval.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);

            loop {
                tokio::select! {
                    _ = interval.tick() => {}
                    _ = poller.shutdown.notified() => break,
                }

                if !poller.running.load(Ordering::SeqCst) {
                    break;
                }

                poller.run_once().await;
            }

            poller.running.store(false, Ordering::SeqCst);
            tracing::info!("Poller stopped");
        })
    }

    /// Stop the poller. A refresh in progress completes first.
    pub fn stop(&self) {
        self.running.store(false, Ordering::SeqCst);
        self.shutdown.notify_one();
    }

    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::SeqCst)
    }

    pub async fn status(&self) -> PollerStatus {
        let mut status = self.status.read().await.clone();
        status.running = self.is_running();
        status
    }
}
