use std::{
    collections::VecDeque,
    sync::{Arc, Mutex},
};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Keep the last 500 entries; older ones fall off the back.
const MAX_LOG_ENTRIES: usize = 500;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ActivityEntry {
    pub timestamp: DateTime<Utc>,
    pub action: String,
    pub details: String,
    pub is_error: bool,
}

/// A bounded, in-memory log of worker decisions, served by the logs endpoint. This is operator-facing state, not a
/// replacement for the process log.
#[derive(Clone, Default)]
pub struct ActivityLog(Arc<Mutex<VecDeque<ActivityEntry>>>);

impl ActivityLog {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, VecDeque<ActivityEntry>> {
        self.0.lock().unwrap_or_else(|e| e.into_inner())
    }

    pub fn record<S: Into<String>, T: Into<String>>(&self, action: S, details: T) {
        self.push(action.into(), details.into(), false);
    }

    pub fn record_error<S: Into<String>, T: Into<String>>(&self, action: S, details: T) {
        self.push(action.into(), details.into(), true);
    }

    fn push(&self, action: String, details: String, is_error: bool) {
        let mut logs = self.lock();
        logs.push_back(ActivityEntry { timestamp: Utc::now(), action, details, is_error });
        while logs.len() > MAX_LOG_ENTRIES {
            logs.pop_front();
        }
    }

    /// The most recent `count` entries, newest first.
    pub fn recent(&self, count: usize) -> Vec<ActivityEntry> {
        let logs = self.lock();
        logs.iter().rev().take(count).cloned().collect()
    }

    pub fn clear(&self) {
        self.lock().clear();
    }
}
