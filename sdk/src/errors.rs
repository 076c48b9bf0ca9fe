//! Error types and handling
//!
//! This module provides the error type used throughout the testbench.
//! All errors implement the `BenchErrorExt` trait which provides
//! operator-facing hints and indicates whether errors are recoverable.

use thiserror::Error;

/// Trait for testbench error extensions
///
/// Provides additional context for errors, including a short hint that is
/// safe to print on the operator's terminal and recoverability information.
pub trait BenchErrorExt {
    /// Returns a user-friendly hint for the error
    fn user_hint(&self) -> &str;

    /// Returns whether the error is recoverable
    ///
    /// Recoverable errors leave the tool usable: interactive loops report
    /// them and keep prompting. Non-recoverable errors abort the command.
    fn is_recoverable(&self) -> bool;
}

/// Main testbench error type
///
/// # Error Categories
///
/// - **Validation**: Invalid relay commands, simulator actions, confidences
/// - **Configuration**: Invalid or unreadable configuration
/// - **Transport**: UDP/TCP socket failures and HTTP client failures
///
/// # Examples
///
/// ```
/// use sdk::errors::{BenchError, BenchErrorExt};
///
/// let error = BenchError::InvalidCommand("X".to_string());
/// println!("Hint: {}", error.user_hint());
/// assert!(error.is_recoverable());
///
/// let fatal = BenchError::Config("bad port".to_string());
/// assert!(!fatal.is_recoverable());
/// ```
#[derive(Debug, Error)]
pub enum BenchError {
    // Validation errors
    #[error("Invalid command: '{0}'")]
    InvalidCommand(String),

    #[error("Invalid confidence: {0}")]
    InvalidConfidence(String),

    #[error("Unknown action: {0}")]
    UnknownAction(String),

    #[error("Invalid action: '{0}'")]
    InvalidAction(String),

    #[error("Invalid frequency: {0} Hz")]
    InvalidFrequency(f64),

    // Configuration errors
    #[error("Configuration error: {0}")]
    Config(String),

    // Transport errors
    #[error("Network error: {0}")]
    Network(String),

    #[error("HTTP error: {0}")]
    Http(String),
}

impl BenchErrorExt for BenchError {
    fn user_hint(&self) -> &str {
        match self {
            // Validation errors
            Self::InvalidCommand(_) => "Use L, R, U, or D",
            Self::InvalidConfidence(_) => "Confidence must be between 0.0 and 1.0",
            Self::UnknownAction(_) => "Type 'help' to list the available actions",
            Self::InvalidAction(_) => "Actions must be non-empty and must not contain ','",
            Self::InvalidFrequency(_) => "Frequency must be a positive number of Hz",

            // Configuration errors
            Self::Config(_) => "Check your config.toml file for errors",

            // Transport errors
            Self::Network(_) => "Network operation failed. Check host and port",
            Self::Http(_) => "Could not reach the relay. Is it running?",
        }
    }

    fn is_recoverable(&self) -> bool {
        match self {
            // Non-recoverable errors
            Self::Config(_) => false,

            // All other errors are potentially recoverable
            _ => true,
        }
    }
}
