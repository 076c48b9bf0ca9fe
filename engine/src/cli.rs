//! CLI interface for the BCI testbench
//!
//! This module provides the command-line interface using clap's derive API.
//! Two independent command groups: `signal` drives the UDP signal
//! simulator, `relay` runs or talks to the HTTP command relay.

use clap::{Args, Parser, Subcommand};
use std::net::IpAddr;
use std::path::PathBuf;

/// BCI Testbench
///
/// Developer utilities for exercising a BCI orchestrator without a headset
/// and for relaying directional commands to a polling game client.
#[derive(Parser, Debug)]
#[command(name = "bci-testbench")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Set log level (error, warn, info, debug, trace)
    #[arg(long, global = true, value_name = "LEVEL")]
    pub log: Option<String>,

    /// Specify alternate configuration file
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Send simulated classifier output over UDP
    Signal {
        #[command(subcommand)]
        action: SignalAction,
    },

    /// Run or drive the HTTP command relay
    Relay {
        #[command(subcommand)]
        action: RelayAction,
    },
}

/// UDP destination overrides
#[derive(Args, Debug, Clone, Default)]
pub struct TargetArgs {
    /// Target host (default from config: 127.0.0.1)
    #[arg(long)]
    pub host: Option<String>,

    /// Target port (default from config: 7400)
    #[arg(long)]
    pub port: Option<u16>,
}

/// Signal simulator actions
#[derive(Subcommand, Debug)]
pub enum SignalAction {
    /// Send a single action,confidence message
    Send {
        /// Action to send (e.g. push)
        action: String,
        /// Confidence (0.0-1.0)
        confidence: f64,
        #[command(flatten)]
        target: TargetArgs,
    },

    /// Run the scripted test sequence
    Sequence {
        #[command(flatten)]
        target: TargetArgs,
    },

    /// Broadcast one message repeatedly until Ctrl+C
    Broadcast {
        /// Action to send
        action: String,
        /// Confidence (0.0-1.0)
        confidence: f64,
        /// Messages per second (default from config: 10)
        #[arg(short, long)]
        frequency: Option<f64>,
        #[command(flatten)]
        target: TargetArgs,
    },

    /// Ramp an action's confidence up to 1.0 and back down
    Ramp {
        /// Action to ramp
        action: String,
        #[command(flatten)]
        target: TargetArgs,
    },

    /// Interactive prompt
    Interactive {
        #[command(flatten)]
        target: TargetArgs,
    },
}

/// Command relay actions
#[derive(Subcommand, Debug)]
pub enum RelayAction {
    /// Run the relay server until Ctrl+C
    Serve {
        /// HTTP port (default from config: 8080)
        #[arg(long)]
        port: Option<u16>,
        /// Interface to bind (default from config: 0.0.0.0)
        #[arg(long)]
        bind: Option<IpAddr>,
    },

    /// Post commands to a running relay
    ///
    /// No arguments starts an interactive prompt; a single multi-letter
    /// argument is sent letter by letter.
    Send {
        /// Commands (L, R, U, D) or one sequence string such as RRUUDD
        commands: Vec<String>,
        /// Relay endpoint (default from config)
        #[arg(long)]
        url: Option<String>,
    },

    /// Fetch and clear the pending command, as a game client would
    Poll {
        /// Relay endpoint (default from config)
        #[arg(long)]
        url: Option<String>,
    },
}
