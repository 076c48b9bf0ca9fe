//! Command handlers for CLI operations
//!
//! Resolves command-line overrides against the loaded [`Config`] and runs
//! the simulator, the relay server, or the relay client.

use anyhow::{Context, Result};
use command_relay::RelayServer;
use sdk::types::SignalMessage;
use tokio::io::BufReader;

use crate::cli::{RelayAction, SignalAction, TargetArgs};
use crate::config::Config;
use crate::relay_client::{ClientMode, RelayClient};
use crate::simulator::{interactive, SignalSender};

/// Resolve the UDP destination: flags win over config
pub fn resolve_target(target: &TargetArgs, config: &Config) -> (String, u16) {
    let host = target
        .host
        .clone()
        .unwrap_or_else(|| config.simulator.host.clone());
    let port = target.port.unwrap_or(config.simulator.port);
    (host, port)
}

async fn connect(target: &TargetArgs, config: &Config) -> Result<SignalSender> {
    let (host, port) = resolve_target(target, config);
    println!("\nBCI Test Sender v{}", env!("CARGO_PKG_VERSION"));
    println!("Target: {}:{}", host, port);

    SignalSender::connect(&host, port)
        .await
        .with_context(|| format!("Failed to set up UDP sender for {}:{}", host, port))
}

/// Handle `signal ...`
pub async fn handle_signal(action: SignalAction, config: &Config) -> Result<()> {
    match action {
        SignalAction::Send {
            action,
            confidence,
            target,
        } => {
            let sender = connect(&target, config).await?;
            let message = SignalMessage::new(action, confidence)?;
            sender.send(&message).await?;
        }

        SignalAction::Sequence { target } => {
            let sender = connect(&target, config).await?;
            sender.run_sequence().await?;
        }

        SignalAction::Broadcast {
            action,
            confidence,
            frequency,
            target,
        } => {
            let sender = connect(&target, config).await?;
            let message = SignalMessage::new(action, confidence)?;
            let frequency = frequency.unwrap_or(config.simulator.frequency_hz);
            let sent = sender
                .broadcast(&message, frequency, async {
                    tokio::signal::ctrl_c().await.ok();
                })
                .await?;
            tracing::info!("Broadcast stopped after {} messages", sent);
        }

        SignalAction::Ramp { action, target } => {
            let sender = connect(&target, config).await?;
            sender.ramp(&action.to_lowercase()).await?;
        }

        SignalAction::Interactive { target } => {
            let sender = connect(&target, config).await?;
            let stdin = BufReader::new(tokio::io::stdin());
            interactive::run_interactive(&sender, stdin).await?;
        }
    }

    Ok(())
}

/// Handle `relay ...`
pub async fn handle_relay(action: RelayAction, config: &Config) -> Result<()> {
    match action {
        RelayAction::Serve { port, bind } => {
            let mut relay_config = config.relay.to_relay_config();
            if let Some(port) = port {
                relay_config.port = port;
            }
            if let Some(bind) = bind {
                relay_config.bind = bind;
            }
            serve(relay_config).await
        }

        RelayAction::Send { commands, url } => {
            let client = RelayClient::new(url.unwrap_or_else(|| config.client.url.clone()));
            match ClientMode::from_args(&commands) {
                ClientMode::Interactive => {
                    let stdin = BufReader::new(tokio::io::stdin());
                    client.run_interactive(stdin).await?;
                }
                ClientMode::Sequence(sequence) => {
                    client.run_sequence(&sequence).await;
                }
                ClientMode::Commands(commands) => {
                    client.run_commands(&commands).await;
                }
            }
            Ok(())
        }

        RelayAction::Poll { url } => {
            let client = RelayClient::new(url.unwrap_or_else(|| config.client.url.clone()));
            match client.poll().await? {
                Some(command) => println!("{}", command),
                None => println!("(no command pending)"),
            }
            Ok(())
        }
    }
}

async fn serve(relay_config: command_relay::RelayConfig) -> Result<()> {
    let relay = RelayServer::start(relay_config.clone())
        .await
        .context("Failed to start command relay")?;
    let port = relay.local_addr().port();

    println!("{}", "=".repeat(60));
    println!("Command Relay Running on Port {}", port);
    println!("{}", "=".repeat(60));
    println!("POST commands to: http://localhost:{}/command", port);
    println!("Clients poll from: http://localhost:{}/command", port);
    println!(
        "Unread commands expire after {:?} (checked every {:?})",
        relay_config.expiry, relay_config.sweep_interval
    );
    println!();
    println!("Example usage:");
    println!(
        "  curl -X POST http://localhost:{}/command -d 'command=R'",
        port
    );
    println!("  bci-testbench relay send R");
    println!();
    println!("Waiting for commands... (Ctrl+C to stop)");
    println!("{}", "=".repeat(60));

    tokio::signal::ctrl_c()
        .await
        .context("Failed to listen for Ctrl+C")?;

    relay.stop().await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_target_defaults() {
        let config = Config::default();
        let (host, port) = resolve_target(&TargetArgs::default(), &config);
        assert_eq!(host, "127.0.0.1");
        assert_eq!(port, 7400);
    }

    #[test]
    fn test_resolve_target_overrides() {
        let config = Config::default();
        let target = TargetArgs {
            host: Some("10.0.0.2".to_string()),
            port: Some(9000),
        };
        assert_eq!(
            resolve_target(&target, &config),
            ("10.0.0.2".to_string(), 9000)
        );
    }
}
