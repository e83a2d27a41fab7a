//! Feed poller
//!
//! A tokio task that runs [`poll_feed_once`] on a fixed interval. The first
//! tick fires one full interval after spawn. Errors are logged and stored by
//! the tick itself; the loop never exits on them.
//!
//! Stopping cancels an in-flight request, so a response can never land after
//! [`FeedPoller::stop`] returns.

use super::feed::{poll_feed_once, PollOutcome};
use crate::AppCore;
use async_lock::RwLock;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::{interval, MissedTickBehavior};
use tracing::{debug, info, warn};

/// Handle to a running poller. Dropping it stops the poller.
#[derive(Debug)]
pub struct FeedPoller {
    stop_tx: watch::Sender<bool>,
    handle: Option<JoinHandle<()>>,
}

impl FeedPoller {
    /// Start polling every `period`.
    pub fn spawn(app_core: Arc<RwLock<AppCore>>, period: Duration) -> Self {
        let (stop_tx, stop_rx) = watch::channel(false);
        let handle = tokio::spawn(run(app_core, period, stop_rx));
        info!(period_ms = period.as_millis() as u64, "feed poller started");
        Self {
            stop_tx,
            handle: Some(handle),
        }
    }

    /// Start polling at the configured interval.
    pub async fn spawn_configured(app_core: Arc<RwLock<AppCore>>) -> Self {
        let period = app_core.read().await.config().polling.interval();
        Self::spawn(app_core, period)
    }

    /// Whether the task is still running.
    pub fn is_running(&self) -> bool {
        self.handle.as_ref().map_or(false, |h| !h.is_finished())
    }

    /// Signal the task to stop. Does not wait.
    pub fn stop(&self) {
        // send_replace: works with no receivers left.
        if !self.stop_tx.send_replace(true) {
            info!("feed poller stopping");
        }
    }

    /// Stop and wait for the task to exit.
    pub async fn shutdown(mut self) {
        self.stop();
        if let Some(handle) = self.handle.take() {
            if let Err(e) = handle.await {
                warn!(error = %e, "feed poller task ended abnormally");
            }
        }
    }
}

impl Drop for FeedPoller {
    fn drop(&mut self) {
        self.stop_tx.send_replace(true);
        if let Some(handle) = self.handle.take() {
            handle.abort();
        }
    }
}

async fn run(app_core: Arc<RwLock<AppCore>>, period: Duration, mut stop_rx: watch::Receiver<bool>) {
    let mut ticker = interval(period);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
    // The first tick completes immediately; polling starts one period in.
    ticker.tick().await;

    loop {
        tokio::select! {
            changed = stop_rx.changed() => {
                if changed.is_err() || *stop_rx.borrow() {
                    break;
                }
            }
            _ = ticker.tick() => {
                tokio::select! {
                    changed = stop_rx.changed() => {
                        if changed.is_err() || *stop_rx.borrow() {
                            break;
                        }
                    }
                    outcome = poll_feed_once(&app_core) => match outcome {
                        Ok(PollOutcome::Fetched { new_items }) => {
                            debug!(new_items, "poll tick complete");
                        }
                        Ok(PollOutcome::Skipped) => debug!("poll tick skipped"),
                        Ok(PollOutcome::Stale) => debug!("poll tick discarded"),
                        Err(e) => debug!(error = %e, "poll tick failed; retrying next interval"),
                    }
                }
            }
        }
    }
    info!("feed poller stopped");
}
