//! Relay client
//!
//! Operator-side client for the command relay: posts directional commands
//! as JSON and polls the relay the way a game client would.
//!
//! # Modes
//!
//! - One argument longer than one character: a sequence string such as
//!   `RRRUUUDDD`, sent one letter at a time
//! - One or more single-letter arguments: sent in order
//! - No arguments: interactive prompt

use sdk::errors::BenchError;
use sdk::types::Direction;
use serde_json::json;
use std::io::Write;
use std::time::Duration;
use tokio::io::{AsyncBufRead, AsyncBufReadExt};
use tracing::debug;

/// Delay between commands in sequence and multi-command modes
pub const COMMAND_SPACING: Duration = Duration::from_millis(500);

/// How the command-line arguments should be sent
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClientMode {
    /// Prompt for commands
    Interactive,
    /// Send every character of one argument
    Sequence(String),
    /// Send each argument as a command
    Commands(Vec<String>),
}

impl ClientMode {
    /// Pick the mode for the given positional arguments
    pub fn from_args(args: &[String]) -> Self {
        match args {
            [] => ClientMode::Interactive,
            [single] if single.chars().count() > 1 => ClientMode::Sequence(single.clone()),
            _ => ClientMode::Commands(args.to_vec()),
        }
    }
}

/// Relay's answer to a POST
#[derive(Debug, Clone, PartialEq)]
pub enum SendOutcome {
    /// 200 with the relay's JSON body
    Accepted(serde_json::Value),
    /// Any other status with the raw body
    Rejected { status: u16, body: String },
}

/// HTTP client for the relay's `/command` endpoint
#[derive(Debug, Clone)]
pub struct RelayClient {
    http: reqwest::Client,
    url: String,
}

impl RelayClient {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            url: url.into(),
        }
    }

    /// POST `{"command": command}`
    ///
    /// The command is sent as given; validation is the relay's job.
    pub async fn send(&self, command: &str) -> Result<SendOutcome, BenchError> {
        let response = self
            .http
            .post(&self.url)
            .json(&json!({ "command": command }))
            .send()
            .await
            .map_err(map_request_error)?;

        let status = response.status();
        debug!("Relay answered {} for '{}'", status, command);

        if status.is_success() {
            let body = response
                .json::<serde_json::Value>()
                .await
                .map_err(|e| BenchError::Http(format!("Invalid response body: {}", e)))?;
            Ok(SendOutcome::Accepted(body))
        } else {
            let body = response.text().await.unwrap_or_default();
            Ok(SendOutcome::Rejected {
                status: status.as_u16(),
                body,
            })
        }
    }

    /// GET the pending command, consuming it on the relay
    pub async fn poll(&self) -> Result<Option<Direction>, BenchError> {
        let response = self
            .http
            .get(&self.url)
            .send()
            .await
            .map_err(map_request_error)?;

        let status = response.status();
        if !status.is_success() {
            return Err(BenchError::Http(format!("Relay answered {}", status)));
        }

        let body = response.text().await.map_err(map_request_error)?;
        if body.is_empty() {
            return Ok(None);
        }
        Direction::parse_candidate(&body).map(Some)
    }

    /// Send `command` and print the outcome; returns whether it was accepted
    pub async fn send_and_report(&self, command: &str) -> bool {
        match self.send(command).await {
            Ok(SendOutcome::Accepted(body)) => {
                println!("✓ Command '{}' sent successfully", command);
                println!("  Response: {}", body);
                true
            }
            Ok(SendOutcome::Rejected { status, body }) => {
                println!("✗ Error sending command '{}'", command);
                println!("  Status: {}", status);
                println!("  Response: {}", body);
                false
            }
            Err(e) => {
                println!("✗ {}", failure_message(&e));
                false
            }
        }
    }

    /// Send each valid letter of `sequence`, spaced by [`COMMAND_SPACING`]
    ///
    /// Returns the number of accepted commands.
    pub async fn run_sequence(&self, sequence: &str) -> usize {
        println!("=== Sending command sequence: {} ===", sequence);
        let mut accepted = 0;

        for letter in sequence.chars() {
            let letter = letter.to_uppercase().to_string();
            if Direction::parse_candidate(&letter).is_err() {
                println!("Skipping invalid command: {}", letter);
                continue;
            }
            if self.send_and_report(&letter).await {
                accepted += 1;
            }
            tokio::time::sleep(COMMAND_SPACING).await;
        }

        accepted
    }

    /// Send each argument uppercased; spaced only when there is more than one
    ///
    /// Returns the number of accepted commands.
    pub async fn run_commands(&self, commands: &[String]) -> usize {
        let spaced = commands.len() > 1;
        let mut accepted = 0;

        for command in commands {
            if self.send_and_report(&command.to_uppercase()).await {
                accepted += 1;
            }
            if spaced {
                tokio::time::sleep(COMMAND_SPACING).await;
            }
        }

        accepted
    }

    /// Prompt for L/R/U/D until Q, end of input, or Ctrl+C
    pub async fn run_interactive<R>(&self, reader: R) -> anyhow::Result<()>
    where
        R: AsyncBufRead + Unpin,
    {
        println!("=== Relay Command Test Client ===");
        println!("Commands: L (left), R (right), U (up), D (down), Q (quit)");
        println!("Server: {}", self.url);
        println!();

        let mut lines = reader.lines();
        loop {
            print!("Enter command: ");
            std::io::stdout().flush().ok();

            let line = tokio::select! {
                line = lines.next_line() => line?,
                _ = tokio::signal::ctrl_c() => {
                    println!("\nGoodbye!");
                    return Ok(());
                }
            };
            let Some(line) = line else {
                println!();
                return Ok(());
            };

            let command = line.trim().to_uppercase();
            if command == "Q" {
                println!("Goodbye!");
                return Ok(());
            }
            if command.is_empty() {
                continue;
            }
            if Direction::parse_candidate(&command).is_ok() {
                self.send_and_report(&command).await;
            } else {
                println!("Invalid command: {}", command);
                println!("Use L, R, U, D, or Q to quit");
            }
        }
    }
}

/// Operator-facing text for a failed request
///
/// HTTP failures already carry a complete sentence, so the variant prefix
/// is left off.
pub fn failure_message(e: &BenchError) -> String {
    match e {
        BenchError::Http(message) => message.clone(),
        other => other.to_string(),
    }
}

fn map_request_error(e: reqwest::Error) -> BenchError {
    if e.is_connect() {
        BenchError::Http("Could not connect to server. Is it running?".to_string())
    } else {
        BenchError::Http(e.to_string())
    }
}
