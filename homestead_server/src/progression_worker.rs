use std::{sync::Arc, time::Duration};

use chrono::Utc;
use homestead_engine::{traits::ProgressionSettings, ProgressionApi, SqliteDatabase};
use log::*;
use tokio::{
    sync::{mpsc, watch},
    task::JoinHandle,
    time::MissedTickBehavior,
};

use crate::{activity_log::ActivityLog, worker_state::WorkerState};

#[derive(Clone, Debug)]
pub struct ProgressionWorkerConfig {
    /// How often the timer fires. A manual trigger runs a scan without waiting for it.
    pub interval: Duration,
    /// Whether timed scans start enabled. Manual triggers work either way.
    pub autostart: bool,
    /// The static lifecycle settings. A runtime override replaces these wholesale for as long as it is set.
    pub settings: ProgressionSettings,
}

impl Default for ProgressionWorkerConfig {
    fn default() -> Self {
        Self { interval: Duration::from_secs(300), autostart: true, settings: ProgressionSettings::default() }
    }
}

/// Handle for steering the progression worker from the HTTP layer. Cheap to clone; all state is shared.
#[derive(Clone)]
pub struct ProgressionControl {
    trigger: mpsc::Sender<()>,
    overrides: Arc<watch::Sender<Option<ProgressionSettings>>>,
    shutdown: Arc<watch::Sender<bool>>,
    state: WorkerState,
}

impl ProgressionControl {
    pub fn set_enabled(&self, enabled: bool) {
        self.state.set_enabled(enabled);
    }

    /// Queues a manual scan. Returns false if the trigger queue is full (a scan is already queued up behind the
    /// current one), which callers treat as "already happening".
    pub fn trigger_scan(&self) -> bool {
        self.trigger.try_send(()).is_ok()
    }

    pub fn set_override(&self, settings: Option<ProgressionSettings>) {
        self.overrides.send_replace(settings);
    }

    pub fn current_override(&self) -> Option<ProgressionSettings> {
        *self.overrides.borrow()
    }

    /// Asks the worker to exit after any in-flight scan completes.
    pub fn shutdown(&self) {
        self.shutdown.send_replace(true);
    }
}

/// Starts the order progression worker. Do not await the returned JoinHandle unless you have called
/// [`ProgressionControl::shutdown`]; the loop runs for the lifetime of the process otherwise.
///
/// The loop waits on whichever comes first: the interval timer, a manual trigger, or shutdown. Scans run strictly
/// one at a time inside this task, so a trigger arriving mid-scan is processed after the current scan finishes,
/// never concurrently. The effective settings are recomputed from the runtime override on every invocation.
pub fn start_progression_worker(
    db: SqliteDatabase,
    config: ProgressionWorkerConfig,
    state: WorkerState,
    activity: ActivityLog,
) -> (JoinHandle<()>, ProgressionControl) {
    let (trigger_tx, mut trigger_rx) = mpsc::channel::<()>(1);
    let (override_tx, override_rx) = watch::channel(None);
    let (shutdown_tx, mut shutdown_rx) = watch::channel(false);
    state.set_enabled(config.autostart);
    let control = ProgressionControl {
        trigger: trigger_tx,
        overrides: Arc::new(override_tx),
        shutdown: Arc::new(shutdown_tx),
        state: state.clone(),
    };
    let handle = tokio::spawn(async move {
        let api = ProgressionApi::new(db);
        let mut timer = tokio::time::interval(config.interval);
        timer.set_missed_tick_behavior(MissedTickBehavior::Delay);
        info!("🕰️ Order progression worker started (interval {}s)", config.interval.as_secs());
        loop {
            let manual = tokio::select! {
                _ = timer.tick() => false,
                Some(()) = trigger_rx.recv() => true,
                res = shutdown_rx.changed() => {
                    match res {
                        Ok(()) if *shutdown_rx.borrow() => {
                            info!("🕰️ Order progression worker shutting down");
                            break;
                        },
                        Ok(()) => continue,
                        // All control handles are gone; nothing can steer this worker any more
                        Err(_) => break,
                    }
                },
            };
            if manual {
                info!("🕰️ Manual progression scan triggered");
            } else if !state.is_enabled() {
                continue;
            }
            let settings = {
                let current = *override_rx.borrow();
                resolve_settings(current.as_ref(), &config.settings)
            };
            let now = Utc::now();
            match api.run_scan(&settings, now).await {
                Ok(summary) => {
                    let next_run = chrono::Duration::from_std(config.interval).ok().map(|d| now + d);
                    state.record_run(summary, next_run);
                    activity.record("scan", summary.to_string());
                },
                Err(e) => {
                    error!("🕰️ Error running order progression scan: {e}");
                    state.record_error(e.to_string());
                    activity.record_error("scan", e.to_string());
                },
            }
        }
    });
    (handle, control)
}

/// Resolves the settings for one scan: the runtime override wins when present, the static configuration otherwise.
/// Called once per invocation; nothing is mutated.
pub fn resolve_settings(
    runtime_override: Option<&ProgressionSettings>,
    static_config: &ProgressionSettings,
) -> ProgressionSettings {
    runtime_override.copied().unwrap_or(*static_config)
}
