//! A cancellable periodic task on the tokio runtime.
//!
//! Each tick runs one bounded batch on the blocking pool. Ticks that come due
//! while a batch is still running are skipped, never queued.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tracing::{debug, warn};

/// Owns one background loop: its join handle and its cancellation signal.
#[derive(Debug)]
pub struct ScheduledTask {
    name: String,
    shutdown_tx: Option<watch::Sender<bool>>,
    task: Option<JoinHandle<()>>,
    runs: Arc<AtomicU64>,
}

impl ScheduledTask {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            shutdown_tx: None,
            task: None,
            runs: Arc::new(AtomicU64::new(0)),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn is_running(&self) -> bool {
        self.task.as_ref().is_some_and(|t| !t.is_finished())
    }

    /// Completed batches since construction.
    pub fn run_count(&self) -> u64 {
        self.runs.load(Ordering::Relaxed)
    }

    /// Spawn the loop. The first batch runs one `interval` after start.
    ///
    /// Returns false if the task is already running, the interval is zero,
    /// or there is no tokio runtime on this thread.
    pub fn start<F>(&mut self, interval: Duration, job: F) -> bool
    where
        F: Fn() + Send + Sync + 'static,
    {
        if self.is_running() {
            debug!(task = %self.name, "start ignored: already running");
            return false;
        }
        if interval.is_zero() {
            warn!(task = %self.name, "start rejected: zero interval");
            return false;
        }
        let runtime = match tokio::runtime::Handle::try_current() {
            Ok(handle) => handle,
            Err(e) => {
                warn!(task = %self.name, error = %e, "start rejected: no tokio runtime");
                return false;
            }
        };

        let (shutdown_tx, shutdown_rx) = watch::channel(false);
        let name = self.name.clone();
        let runs = Arc::clone(&self.runs);
        let task = runtime.spawn(run_loop(name, interval, Arc::new(job), runs, shutdown_rx));

        self.shutdown_tx = Some(shutdown_tx);
        self.task = Some(task);
        debug!(task = %self.name, interval_ms = interval.as_millis() as u64, "scheduled task started");
        true
    }

    /// Signal the loop to exit without waiting for it. Idempotent.
    /// Returns whether a running loop was signalled.
    pub fn stop(&mut self) -> bool {
        let signalled = match self.shutdown_tx.take() {
            Some(tx) => tx.send(true).is_ok(),
            None => false,
        };
        self.task = None;
        signalled
    }

    /// Signal the loop and wait until any in-flight batch has finished.
    pub async fn shutdown(&mut self) {
        if let Some(tx) = self.shutdown_tx.take() {
            let _ = tx.send(true);
        }
        if let Some(task) = self.task.take() {
            if let Err(e) = task.await {
                warn!(task = %self.name, error = %e, "scheduled task ended abnormally");
            }
        }
    }
}

impl Drop for ScheduledTask {
    fn drop(&mut self) {
        if let Some(tx) = self.shutdown_tx.take() {
            let _ = tx.send(true);
        }
    }
}

async fn run_loop<F>(
    name: String,
    interval: Duration,
    job: Arc<F>,
    runs: Arc<AtomicU64>,
    mut shutdown_rx: watch::Receiver<bool>,
) where
    F: Fn() + Send + Sync + 'static,
{
    let mut ticker = tokio::time::interval(interval);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
    // The first tick completes immediately.
    ticker.tick().await;

    loop {
        tokio::select! {
            biased;
            changed = shutdown_rx.changed() => {
                if changed.is_err() || *shutdown_rx.borrow() {
                    break;
                }
            }
            _ = ticker.tick() => {
                let job = Arc::clone(&job);
                match tokio::task::spawn_blocking(move || (*job)()).await {
                    Ok(()) => {
                        runs.fetch_add(1, Ordering::Relaxed);
                    }
                    Err(e) => warn!(task = %name, error = %e, "scheduled batch panicked"),
                }
            }
        }
    }
    debug!(task = %name, "scheduled task stopped");
}
