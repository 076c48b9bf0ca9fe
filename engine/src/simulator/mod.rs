//! Signal simulator
//!
//! Emulates a BCI classifier by sending `action,confidence` datagrams to the
//! orchestrator. Sends are fire-and-forget: no acknowledgement, no retry.
//!
//! # Modes
//!
//! - Single send
//! - Scripted test sequence ([`TEST_SEQUENCE`])
//! - Continuous broadcast at a fixed frequency until interrupted
//! - Confidence ramp up and back down, followed by a neutral reset
//! - Interactive prompt (see [`interactive`])

/// Interactive prompt mode
pub mod interactive;

use sdk::errors::BenchError;
use sdk::types::{is_known_action, SignalMessage};
use std::future::Future;
use std::net::{IpAddr, Ipv4Addr, Ipv6Addr, SocketAddr};
use std::time::Duration;
use tokio::net::UdpSocket;
use tokio::time::{sleep, MissedTickBehavior};
use tracing::debug;

/// One scripted step: send, then wait `delay`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SequenceStep {
    pub action: &'static str,
    pub confidence: f64,
    pub delay: Duration,
}

const fn step(action: &'static str, confidence: f64, delay_ms: u64) -> SequenceStep {
    SequenceStep {
        action,
        confidence,
        delay: Duration::from_millis(delay_ms),
    }
}

/// Scripted test sequence: every directional action bracketed by neutral
pub const TEST_SEQUENCE: [SequenceStep; 13] = [
    step("neutral", 0.30, 1000),
    step("push", 0.85, 2000),
    step("neutral", 0.40, 500),
    step("left", 0.75, 2000),
    step("neutral", 0.30, 500),
    step("right", 0.80, 2000),
    step("neutral", 0.40, 500),
    step("pull", 0.70, 2000),
    step("neutral", 0.30, 1000),
    step("lift", 0.90, 1000),
    step("neutral", 0.30, 1000),
    step("drop", 0.88, 1000),
    step("neutral", 0.30, 2000),
];

/// Ramp step size in percent
pub const RAMP_STEP_PERCENT: usize = 5;

/// Pause between ramp messages
pub const RAMP_STEP_DELAY: Duration = Duration::from_millis(100);

/// Pause at full confidence before ramping back down
pub const RAMP_HOLD: Duration = Duration::from_secs(1);

/// Confidence levels of the ramp: 0.00 up to 1.00 and back down
///
/// Returns `(up, down)`.
pub fn ramp_levels() -> (Vec<f64>, Vec<f64>) {
    let up: Vec<f64> = (0..=100)
        .step_by(RAMP_STEP_PERCENT)
        .map(|percent| percent as f64 / 100.0)
        .collect();
    let down = up.iter().rev().copied().collect();
    (up, down)
}

/// Interval between broadcast messages at `frequency_hz`
///
/// Rejects frequencies whose period is not a representable, non-zero
/// `Duration`.
pub fn broadcast_period(frequency_hz: f64) -> Result<Duration, BenchError> {
    if !frequency_hz.is_finite() || frequency_hz <= 0.0 {
        return Err(BenchError::InvalidFrequency(frequency_hz));
    }
    match Duration::try_from_secs_f64(1.0 / frequency_hz) {
        Ok(period) if !period.is_zero() => Ok(period),
        _ => Err(BenchError::InvalidFrequency(frequency_hz)),
    }
}

/// UDP sender bound to an ephemeral local port
pub struct SignalSender {
    socket: UdpSocket,
    target: SocketAddr,
}

impl SignalSender {
    /// Resolve `host:port` and bind a local socket of the matching family
    pub async fn connect(host: &str, port: u16) -> Result<Self, BenchError> {
        let target = tokio::net::lookup_host((host, port))
            .await
            .map_err(|e| BenchError::Network(format!("Failed to resolve {}:{}: {}", host, port, e)))?
            .next()
            .ok_or_else(|| BenchError::Network(format!("No address found for {}:{}", host, port)))?;

        let local = match target {
            SocketAddr::V4(_) => SocketAddr::new(IpAddr::V4(Ipv4Addr::UNSPECIFIED), 0),
            SocketAddr::V6(_) => SocketAddr::new(IpAddr::V6(Ipv6Addr::UNSPECIFIED), 0),
        };
        let socket = UdpSocket::bind(local)
            .await
            .map_err(|e| BenchError::Network(format!("Failed to bind UDP socket: {}", e)))?;

        debug!("Signal sender targeting {}", target);
        Ok(Self { socket, target })
    }

    /// Destination of every datagram
    pub fn target(&self) -> SocketAddr {
        self.target
    }

    /// Send one message as a single datagram
    pub async fn send(&self, message: &SignalMessage) -> Result<(), BenchError> {
        let payload = message.encode();
        self.socket
            .send_to(payload.as_bytes(), self.target)
            .await
            .map_err(|e| BenchError::Network(format!("Failed to send '{}': {}", payload, e)))?;

        let timestamp = chrono::Local::now().format("%H:%M:%S%.3f");
        println!("[{}] Sent: {}", timestamp, payload);
        debug!(target_addr = %self.target, "Sent {}", payload);
        Ok(())
    }

    /// Build and send `action,confidence`
    pub async fn send_action(&self, action: &str, confidence: f64) -> Result<(), BenchError> {
        let message = SignalMessage::new(action, confidence)?;
        self.send(&message).await
    }

    /// Run [`TEST_SEQUENCE`], sleeping after every send
    ///
    /// Aborts on the first send failure.
    pub async fn run_sequence(&self) -> Result<(), BenchError> {
        println!("\nRunning test sequence...");
        println!("{}", "-".repeat(40));

        for step in TEST_SEQUENCE.iter() {
            self.send_action(step.action, step.confidence).await?;
            sleep(step.delay).await;
        }

        println!("{}", "-".repeat(40));
        println!("✓ Test sequence complete\n");
        Ok(())
    }

    /// Send `message` every `1 / frequency_hz` seconds until `shutdown`
    /// resolves
    ///
    /// Returns the number of datagrams sent.
    pub async fn broadcast<F>(
        &self,
        message: &SignalMessage,
        frequency_hz: f64,
        shutdown: F,
    ) -> Result<u64, BenchError>
    where
        F: Future<Output = ()>,
    {
        let period = broadcast_period(frequency_hz)?;

        println!(
            "\nBroadcasting '{}' at {}Hz...",
            message.action(),
            frequency_hz
        );
        println!("Press Ctrl+C to stop\n");

        let mut ticker = tokio::time::interval(period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        tokio::pin!(shutdown);

        let mut sent = 0u64;
        loop {
            tokio::select! {
                biased;
                _ = &mut shutdown => break,
                _ = ticker.tick() => {
                    self.send(message).await?;
                    sent += 1;
                }
            }
        }

        println!("\n✓ Stopped");
        Ok(sent)
    }

    /// Ramp `action` confidence 0.00 → 1.00 → 0.00, then reset to neutral
    pub async fn ramp(&self, action: &str) -> Result<(), BenchError> {
        if !is_known_action(action) {
            return Err(BenchError::UnknownAction(action.to_string()));
        }

        println!("\nRamping '{}' confidence...", action);
        let (up, down) = ramp_levels();

        for confidence in up {
            self.send_action(action, confidence).await?;
            sleep(RAMP_STEP_DELAY).await;
        }

        sleep(RAMP_HOLD).await;

        for confidence in down {
            self.send_action(action, confidence).await?;
            sleep(RAMP_STEP_DELAY).await;
        }

        self.send_action("neutral", 0.3).await?;
        println!("✓ Ramp complete");
        Ok(())
    }
}
