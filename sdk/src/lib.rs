//! BCI Testbench SDK
//!
//! Shared library providing the error type and domain types used by the
//! signal simulator, the command relay, and the relay client.

/// Error types and handling
pub mod errors;

/// Direction commands and signal messages
pub mod types;

// Re-export commonly used types
pub use errors::{BenchError, BenchErrorExt};
pub use types::{Direction, SignalMessage, ACTIONS};
