//! Periodic expiry of unread commands

use crate::store::PendingCommandStore;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::{Instant, MissedTickBehavior};
use tracing::{debug, info};

/// Spawn the sweeper task
///
/// Every `interval` the task asks the store to drop a command older than its
/// expiry window. The task ends when `shutdown` flips to `true` or its
/// sender is dropped.
pub fn spawn_sweeper(
    store: Arc<PendingCommandStore>,
    interval: Duration,
    mut shutdown: watch::Receiver<bool>,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        debug!(
            "Sweeper started (interval {:?}, expiry {:?})",
            interval,
            store.expiry()
        );

        loop {
            tokio::select! {
                _ = ticker.tick() => {
                    if let Some(command) = store.sweep(Instant::now()) {
                        info!(
                            %command,
                            "Cleared stale command ({:?} timeout)",
                            store.expiry()
                        );
                    }
                }
                changed = shutdown.changed() => {
                    if changed.is_err() || *shutdown.borrow() {
                        break;
                    }
                }
            }
        }

        debug!("Sweeper stopped");
    })
}
