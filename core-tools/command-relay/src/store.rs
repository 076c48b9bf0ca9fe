//! Pending command store
//!
//! Holds at most one directional command. A newer write replaces an unread
//! older one, a read clears what it returns, and commands older than the
//! expiry window are dropped either by the sweeper or by the next read.
//!
//! Every operation is a single critical section over one `Mutex`. The store
//! reads time from `tokio::time::Instant` so tests can drive it with a
//! paused clock.

use sdk::errors::BenchError;
use sdk::types::Direction;
use std::sync::{Mutex, MutexGuard, PoisonError};
use std::time::Duration;
use tokio::time::Instant;
use tracing::debug;

/// Age after which an unread command is discarded
pub const DEFAULT_EXPIRY: Duration = Duration::from_secs(2);

/// How often the sweeper checks for an expired command
pub const DEFAULT_SWEEP_INTERVAL: Duration = Duration::from_millis(500);

#[derive(Debug, Clone, Copy)]
struct Pending {
    command: Direction,
    set_at: Instant,
}

/// Single-slot command buffer shared by the HTTP handlers and the sweeper
#[derive(Debug)]
pub struct PendingCommandStore {
    slot: Mutex<Option<Pending>>,
    expiry: Duration,
}

impl PendingCommandStore {
    /// Create an empty store with the default 2 second expiry
    pub fn new() -> Self {
        Self::with_expiry(DEFAULT_EXPIRY)
    }

    /// Create an empty store with a custom expiry window
    pub fn with_expiry(expiry: Duration) -> Self {
        Self {
            slot: Mutex::new(None),
            expiry,
        }
    }

    pub fn expiry(&self) -> Duration {
        self.expiry
    }

    // Every mutation is a single assignment, so a poisoned slot is still
    // consistent and can be used as-is.
    fn lock(&self) -> MutexGuard<'_, Option<Pending>> {
        self.slot.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Validate `candidate` and store it, replacing any unread command
    ///
    /// The candidate is uppercased before validation. On error the store is
    /// left untouched.
    pub fn set(&self, candidate: &str) -> Result<Direction, BenchError> {
        let command = Direction::parse_candidate(candidate)?;
        self.set_command(command);
        Ok(command)
    }

    /// Store an already-validated command
    pub fn set_command(&self, command: Direction) {
        let pending = Pending {
            command,
            set_at: Instant::now(),
        };
        *self.lock() = Some(pending);
    }

    /// Return the pending command and clear it
    ///
    /// A command that has outlived the expiry window is cleared without
    /// being returned, even if the sweeper has not reached it yet.
    pub fn take(&self) -> Option<Direction> {
        let now = Instant::now();
        let pending = self.lock().take()?;

        if self.is_expired(&pending, now) {
            debug!(command = %pending.command, "Dropped expired command on read");
            return None;
        }
        Some(pending.command)
    }

    /// Clear the pending command if it is older than the expiry window
    ///
    /// Age is computed under the same lock that performs the clear, so a
    /// command stored after `now` was sampled is never removed. Returns the
    /// command that was cleared, if any.
    pub fn sweep(&self, now: Instant) -> Option<Direction> {
        let mut slot = self.lock();
        match *slot {
            Some(pending) if self.is_expired(&pending, now) => {
                *slot = None;
                Some(pending.command)
            }
            _ => None,
        }
    }

    /// Look at the slot without consuming it
    ///
    /// This is a raw view: an expired command that has not been swept yet
    /// is still reported.
    pub fn peek(&self) -> Option<Direction> {
        let slot = *self.lock();
        slot.map(|pending| pending.command)
    }

    fn is_expired(&self, pending: &Pending, now: Instant) -> bool {
        now.saturating_duration_since(pending.set_at) > self.expiry
    }
}

impl Default for PendingCommandStore {
    fn default() -> Self {
        Self::new()
    }
}
