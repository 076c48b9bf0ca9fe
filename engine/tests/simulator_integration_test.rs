//! Integration tests for the UDP signal simulator
//!
//! A loopback socket stands in for the orchestrator. Timed modes run on a
//! paused clock so the scripted delays elapse instantly.

use bci_testbench::simulator::{interactive, SignalSender, TEST_SEQUENCE};
use sdk::types::SignalMessage;
use std::time::Duration;
use tokio::net::UdpSocket;

async fn receiver() -> (UdpSocket, SignalSender) {
    let socket = UdpSocket::bind("127.0.0.1:0").await.unwrap();
    let port = socket.local_addr().unwrap().port();
    let sender = SignalSender::connect("127.0.0.1", port).await.unwrap();
    (socket, sender)
}

/// Read exactly `count` datagrams that are already queued
async fn drain(socket: &UdpSocket, count: usize) -> Vec<String> {
    let mut buf = [0u8; 256];
    let mut messages = Vec::with_capacity(count);
    for _ in 0..count {
        let (len, _) = tokio::time::timeout(Duration::from_secs(5), socket.recv_from(&mut buf))
            .await
            .expect("datagram not received")
            .unwrap();
        messages.push(String::from_utf8(buf[..len].to_vec()).unwrap());
    }
    messages
}

#[tokio::test]
async fn test_single_send() {
    let (socket, sender) = receiver().await;

    sender
        .send(&SignalMessage::new("push", 0.85).unwrap())
        .await
        .unwrap();
    sender.send_action("neutral", 0.3).await.unwrap();

    assert_eq!(drain(&socket, 2).await, vec!["push,0.85", "neutral,0.30"]);
}

#[tokio::test]
async fn test_unknown_action_is_still_sent() {
    let (socket, sender) = receiver().await;

    sender.send_action("jump", 1.5).await.unwrap();

    assert_eq!(drain(&socket, 1).await, vec!["jump,1.50"]);
}

#[tokio::test(start_paused = true)]
async fn test_sequence_sends_script_in_order() {
    let (socket, sender) = receiver().await;
    let start = tokio::time::Instant::now();

    sender.run_sequence().await.unwrap();

    assert_eq!(start.elapsed(), Duration::from_millis(16500));
    let expected: Vec<String> = TEST_SEQUENCE
        .iter()
        .map(|step| format!("{},{:.2}", step.action, step.confidence))
        .collect();
    assert_eq!(drain(&socket, TEST_SEQUENCE.len()).await, expected);
}

#[tokio::test(start_paused = true)]
async fn test_ramp_goes_up_down_and_resets() {
    let (socket, sender) = receiver().await;

    sender.ramp("lift").await.unwrap();

    let messages = drain(&socket, 43).await;
    assert_eq!(messages[0], "lift,0.00");
    assert_eq!(messages[1], "lift,0.05");
    assert_eq!(messages[20], "lift,1.00");
    assert_eq!(messages[21], "lift,1.00");
    assert_eq!(messages[41], "lift,0.00");
    assert_eq!(messages[42], "neutral,0.30");
    assert!(messages[..42].iter().all(|m| m.starts_with("lift,")));
}

#[tokio::test(start_paused = true)]
async fn test_broadcast_stops_on_shutdown() {
    let (socket, sender) = receiver().await;
    let message = SignalMessage::new("left", 0.7).unwrap();

    // 10 Hz for 550 ms: ticks at 0, 100, ..., 500
    let sent = sender
        .broadcast(&message, 10.0, tokio::time::sleep(Duration::from_millis(550)))
        .await
        .unwrap();

    assert_eq!(sent, 6);
    let messages = drain(&socket, sent as usize).await;
    assert!(messages.iter().all(|m| m == "left,0.70"));
}

#[tokio::test]
async fn test_interactive_script() {
    let (socket, sender) = receiver().await;
    let script = "push,0.85\n\nhello\npush,1.5\nLEFT,0.5\nquit\npull,0.9\n";

    interactive::run_interactive(&sender, script.as_bytes())
        .await
        .unwrap();

    // Invalid lines are skipped and nothing after quit is sent
    assert_eq!(drain(&socket, 2).await, vec!["push,0.85", "left,0.50"]);
    let mut buf = [0u8; 64];
    let extra = tokio::time::timeout(Duration::from_millis(100), socket.recv_from(&mut buf)).await;
    assert!(extra.is_err());
}

#[tokio::test]
async fn test_interactive_ends_at_eof() {
    let (socket, sender) = receiver().await;

    interactive::run_interactive(&sender, "right,0.8\n".as_bytes())
        .await
        .unwrap();

    assert_eq!(drain(&socket, 1).await, vec!["right,0.80"]);
}

#[tokio::test(start_paused = true)]
async fn test_interrupt_during_sequence_ends_session() {
    let (socket, sender) = receiver().await;
    let deadline = tokio::time::Instant::now() + Duration::from_millis(1500);
    let start = tokio::time::Instant::now();

    interactive::run_interactive_with(&sender, "sequence\npush,0.10\nquit\n".as_bytes(), || {
        tokio::time::sleep_until(deadline)
    })
    .await
    .unwrap();

    assert_eq!(start.elapsed(), Duration::from_millis(1500));
    // neutral at 0 s, push at 1 s; nothing after the interrupt
    assert_eq!(drain(&socket, 2).await, vec!["neutral,0.30", "push,0.85"]);
    let mut buf = [0u8; 64];
    let extra = tokio::time::timeout(Duration::from_millis(100), socket.recv_from(&mut buf)).await;
    assert!(extra.is_err());
}

#[tokio::test(start_paused = true)]
async fn test_interrupt_during_ramp_ends_session() {
    let (socket, sender) = receiver().await;
    let deadline = tokio::time::Instant::now() + Duration::from_millis(250);

    interactive::run_interactive_with(&sender, "ramp push\nright,0.8\n".as_bytes(), || {
        tokio::time::sleep_until(deadline)
    })
    .await
    .unwrap();

    // Steps at 0, 100 and 200 ms before the interrupt
    assert_eq!(
        drain(&socket, 3).await,
        vec!["push,0.00", "push,0.05", "push,0.10"]
    );
    let mut buf = [0u8; 64];
    let extra = tokio::time::timeout(Duration::from_millis(100), socket.recv_from(&mut buf)).await;
    assert!(extra.is_err());
}

#[tokio::test(start_paused = true)]
async fn test_interrupt_during_continuous_returns_to_prompt() {
    let (socket, sender) = receiver().await;
    let stop_at = tokio::time::Instant::now() + Duration::from_millis(250);
    let mut calls = 0;

    // First wait is the prompt, second is the broadcast; later prompts never fire
    interactive::run_interactive_with(
        &sender,
        "continuous left 0.7 10\nright,0.8\nquit\n".as_bytes(),
        move || {
            calls += 1;
            let deadline = if calls == 2 {
                stop_at
            } else {
                stop_at + Duration::from_secs(3600)
            };
            tokio::time::sleep_until(deadline)
        },
    )
    .await
    .unwrap();

    assert_eq!(
        drain(&socket, 4).await,
        vec!["left,0.70", "left,0.70", "left,0.70", "right,0.80"]
    );
}
