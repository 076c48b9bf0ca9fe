//! Command Relay
//!
//! HTTP polling relay that buffers a single pending directional command
//! between an external sender and a polling consumer (a game client, for
//! instance).
//!
//! # Endpoints
//!
//! - POST /command - Store a command (JSON, form, or raw text body)
//! - GET /command - Retrieve and clear the pending command
//! - OPTIONS /command - CORS preflight
//!
//! Commands that are not picked up within the expiry window are cleared by
//! a background sweeper.

/// Single-slot pending command store
pub mod store;

/// POST body decoding
pub mod body;

/// Periodic expiry task
pub mod sweeper;

/// Router, handlers, and server lifecycle
pub mod server;

pub use server::{router, RelayConfig, RelayServer};
pub use store::{PendingCommandStore, DEFAULT_EXPIRY, DEFAULT_SWEEP_INTERVAL};
