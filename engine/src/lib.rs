//! BCI Testbench Library
//!
//! This library provides the core functionality of the testbench.
//! It is used by both the main binary and integration tests.

/// Configuration management module
pub mod config;

/// UDP signal simulator
pub mod simulator;

/// HTTP client for the command relay
pub mod relay_client;

/// Telemetry and Observability
pub mod telemetry;

/// CLI interface module
pub mod cli;

/// Command handlers module
pub mod handlers;
