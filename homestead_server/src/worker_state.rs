use std::sync::{Arc, Mutex};

use chrono::{DateTime, Utc};
use homestead_engine::traits::ScanSummary;
use serde::{Deserialize, Serialize};

/// A point-in-time view of the progression worker, served by the status endpoint.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct WorkerStatus {
    pub enabled: bool,
    pub last_run: Option<DateTime<Utc>>,
    pub next_run: Option<DateTime<Utc>>,
    pub run_count: u64,
    pub last_error: Option<String>,
    pub last_summary: Option<ScanSummary>,
}

/// Shared bookkeeping for the progression worker. The worker writes after every scan; the HTTP layer reads snapshots
/// and toggles `enabled`.
#[derive(Clone, Default)]
pub struct WorkerState(Arc<Mutex<WorkerStatus>>);

impl WorkerState {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, WorkerStatus> {
        self.0.lock().unwrap_or_else(|e| e.into_inner())
    }

    pub fn set_enabled(&self, enabled: bool) {
        self.lock().enabled = enabled;
    }

    pub fn is_enabled(&self) -> bool {
        self.lock().enabled
    }

    /// Records a successful scan and clears any previous error.
    pub fn record_run(&self, summary: ScanSummary, next_run: Option<DateTime<Utc>>) {
        let mut status = self.lock();
        status.last_run = Some(Utc::now());
        status.next_run = next_run;
        status.run_count += 1;
        status.last_error = None;
        status.last_summary = Some(summary);
    }

    pub fn record_error(&self, error: String) {
        self.lock().last_error = Some(error);
    }

    pub fn snapshot(&self) -> WorkerStatus {
        self.lock().clone()
    }
}
