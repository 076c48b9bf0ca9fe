//! Interactive simulator prompt
//!
//! Reads operator lines and dispatches them to the [`SignalSender`]. Bad
//! input is reported and the prompt continues. Ctrl+C during a continuous
//! broadcast returns to the prompt; Ctrl+C anywhere else exits.

use super::{broadcast_period, SignalSender};
use sdk::errors::BenchErrorExt;
use sdk::types::{is_known_action, SignalMessage, ACTIONS};
use std::future::Future;
use std::io::Write;
use thiserror::Error;
use tokio::io::{AsyncBufRead, AsyncBufReadExt};

/// A parsed prompt line
#[derive(Debug, Clone, PartialEq)]
pub enum PromptCommand {
    /// Blank line
    Empty,
    /// quit / exit / q
    Quit,
    /// help
    Help,
    /// Run the scripted test sequence
    Sequence,
    /// Ramp a known action
    Ramp(String),
    /// Broadcast until Ctrl+C
    Continuous {
        action: String,
        confidence: f64,
        frequency_hz: f64,
    },
    /// Send one message
    Send(SignalMessage),
}

/// Why a prompt line was rejected
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PromptError {
    #[error("Unknown action. Available: {}", ACTIONS.join(", "))]
    UnknownAction,

    #[error("Usage: continuous ACTION CONFIDENCE FREQUENCY")]
    ContinuousUsage,

    #[error("Confidence must be between 0.0 and 1.0")]
    ConfidenceOutOfRange,

    #[error("Invalid confidence value")]
    InvalidConfidence,

    #[error("Invalid frequency value")]
    InvalidFrequency,

    #[error("Format: action,confidence (e.g., push,0.85)")]
    Format,

    #[error("Unknown command. Type 'help' for options.")]
    UnknownCommand,
}

/// Parse one prompt line
///
/// The line is trimmed and lowercased first.
pub fn parse_line(line: &str) -> Result<PromptCommand, PromptError> {
    let input = line.trim().to_lowercase();

    if input.is_empty() {
        return Ok(PromptCommand::Empty);
    }

    match input.as_str() {
        "quit" | "exit" | "q" => return Ok(PromptCommand::Quit),
        "help" => return Ok(PromptCommand::Help),
        "sequence" => return Ok(PromptCommand::Sequence),
        _ => {}
    }

    if let Some(rest) = input.strip_prefix("ramp ") {
        let action = rest.split_whitespace().next().unwrap_or_default();
        if !is_known_action(action) {
            return Err(PromptError::UnknownAction);
        }
        return Ok(PromptCommand::Ramp(action.to_string()));
    }

    if input.starts_with("continuous ") {
        let parts: Vec<&str> = input.split_whitespace().collect();
        let [_, action, confidence, frequency] = parts.as_slice() else {
            return Err(PromptError::ContinuousUsage);
        };
        let confidence: f64 = confidence
            .parse()
            .map_err(|_| PromptError::InvalidConfidence)?;
        let frequency_hz: f64 = frequency
            .parse()
            .map_err(|_| PromptError::InvalidFrequency)?;
        if broadcast_period(frequency_hz).is_err() {
            return Err(PromptError::InvalidFrequency);
        }
        if SignalMessage::new(*action, confidence).is_err() {
            return Err(PromptError::InvalidConfidence);
        }
        return Ok(PromptCommand::Continuous {
            action: action.to_string(),
            confidence,
            frequency_hz,
        });
    }

    if input.contains(',') {
        let parts: Vec<&str> = input.split(',').collect();
        let [action, confidence] = parts.as_slice() else {
            return Err(PromptError::Format);
        };
        let confidence: f64 = confidence
            .trim()
            .parse()
            .map_err(|_| PromptError::InvalidConfidence)?;
        if !(0.0..=1.0).contains(&confidence) {
            return Err(PromptError::ConfidenceOutOfRange);
        }
        let message = SignalMessage::bounded(action.trim(), confidence)
            .map_err(|_| PromptError::Format)?;
        return Ok(PromptCommand::Send(message));
    }

    Err(PromptError::UnknownCommand)
}

fn print_banner(sender: &SignalSender) {
    println!("\nInteractive Mode");
    println!("{}", "=".repeat(50));
    println!("Commands:");
    println!("  action,confidence  - Send command (e.g., push,0.85)");
    println!("  sequence          - Run test sequence");
    println!("  ramp ACTION       - Ramp confidence for action");
    println!("  continuous ACTION CONF HZ - Continuous broadcast");
    println!("  help              - Show this help");
    println!("  quit              - Exit");
    println!("{}", "=".repeat(50));
    println!("Sending to {}", sender.target());
    println!();
}

fn prompt() {
    print!(">>> ");
    std::io::stdout().flush().ok();
}

/// Run the prompt until quit, end of input, or Ctrl+C
pub async fn run_interactive<R>(sender: &SignalSender, reader: R) -> anyhow::Result<()>
where
    R: AsyncBufRead + Unpin,
{
    run_interactive_with(sender, reader, || async {
        tokio::signal::ctrl_c().await.ok();
    })
    .await
}

/// Run the prompt with a custom interrupt source
///
/// `interrupt` is called for every wait that Ctrl+C may cut short. An
/// interrupt at the prompt, or during a sequence or ramp, ends the session;
/// during a continuous broadcast it only stops the broadcast.
pub async fn run_interactive_with<R, I, Fut>(
    sender: &SignalSender,
    reader: R,
    mut interrupt: I,
) -> anyhow::Result<()>
where
    R: AsyncBufRead + Unpin,
    I: FnMut() -> Fut,
    Fut: Future<Output = ()>,
{
    print_banner(sender);
    let mut lines = reader.lines();

    loop {
        prompt();

        let line = tokio::select! {
            line = lines.next_line() => line?,
            _ = interrupt() => {
                println!("\nGoodbye!");
                return Ok(());
            }
        };

        let Some(line) = line else {
            println!();
            return Ok(());
        };

        let command = match parse_line(&line) {
            Ok(command) => command,
            Err(e) => {
                println!("{}", e);
                continue;
            }
        };

        let result = match command {
            PromptCommand::Empty => Ok(()),
            PromptCommand::Quit => {
                println!("Goodbye!");
                return Ok(());
            }
            PromptCommand::Help => {
                println!("Actions: {}", ACTIONS.join(", "));
                println!("Confidence: 0.0 to 1.0");
                Ok(())
            }
            PromptCommand::Sequence => tokio::select! {
                result = sender.run_sequence() => result,
                _ = interrupt() => {
                    println!("\nGoodbye!");
                    return Ok(());
                }
            },
            PromptCommand::Ramp(action) => tokio::select! {
                result = sender.ramp(&action) => result,
                _ = interrupt() => {
                    println!("\nGoodbye!");
                    return Ok(());
                }
            },
            PromptCommand::Continuous {
                action,
                confidence,
                frequency_hz,
            } => match SignalMessage::new(action, confidence) {
                Ok(message) => sender
                    .broadcast(&message, frequency_hz, interrupt())
                    .await
                    .map(|_| ()),
                Err(e) => Err(e),
            },
            PromptCommand::Send(message) => sender.send(&message).await,
        };

        if let Err(e) = result {
            tracing::warn!("Interactive command failed: {}", e);
            println!("Error: {} ({})", e, e.user_hint());
        }
    }
}
