//! End-to-end tests against a live relay on a loopback port

use command_relay::{RelayConfig, RelayServer};
use std::net::{IpAddr, Ipv4Addr};
use std::time::Duration;

async fn start_relay(expiry: Duration, sweep_interval: Duration) -> RelayServer {
    let config = RelayConfig {
        bind: IpAddr::V4(Ipv4Addr::LOCALHOST),
        port: 0,
        expiry,
        sweep_interval,
    };
    RelayServer::start(config).await.unwrap()
}

#[tokio::test]
async fn test_post_then_poll_over_http() {
    let relay = start_relay(Duration::from_secs(2), Duration::from_millis(500)).await;
    let url = format!("http://{}/command", relay.local_addr());
    let client = reqwest::Client::new();

    let response = client
        .post(&url)
        .json(&serde_json::json!({"command": "u"}))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 200);
    assert_eq!(
        response.headers()["access-control-allow-origin"],
        "*"
    );
    assert_eq!(
        response.text().await.unwrap(),
        r#"{"status":"success","command":"U"}"#
    );

    let first = client.get(&url).send().await.unwrap().text().await.unwrap();
    let second = client.get(&url).send().await.unwrap().text().await.unwrap();
    assert_eq!(first, "U");
    assert_eq!(second, "");

    relay.stop().await.unwrap();
}

#[tokio::test]
async fn test_form_post_over_http() {
    let relay = start_relay(Duration::from_secs(2), Duration::from_millis(500)).await;
    let url = format!("http://{}/command", relay.local_addr());
    let client = reqwest::Client::new();

    let response = client
        .post(&url)
        .header("content-type", "application/x-www-form-urlencoded")
        .body("command=Z")
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 400);
    assert_eq!(relay.store().peek(), None);

    let response = client
        .post(&url)
        .header("content-type", "application/x-www-form-urlencoded")
        .body("command=l")
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 200);
    assert_eq!(client.get(&url).send().await.unwrap().text().await.unwrap(), "L");

    relay.stop().await.unwrap();
}

#[tokio::test]
async fn test_unread_command_expires_on_live_server() {
    let relay = start_relay(Duration::from_millis(200), Duration::from_millis(50)).await;
    let url = format!("http://{}/command", relay.local_addr());
    let client = reqwest::Client::new();

    client.post(&url).body("R").send().await.unwrap();
    assert_eq!(relay.store().peek(), Some(sdk::Direction::Right));

    tokio::time::sleep(Duration::from_millis(500)).await;
    assert_eq!(relay.store().peek(), None);
    assert_eq!(client.get(&url).send().await.unwrap().text().await.unwrap(), "");

    relay.stop().await.unwrap();
}

#[tokio::test]
async fn test_concurrent_posts_leave_one_command() {
    let relay = start_relay(Duration::from_secs(2), Duration::from_millis(500)).await;
    let url = format!("http://{}/command", relay.local_addr());
    let client = reqwest::Client::new();

    let mut tasks = Vec::new();
    for command in ["L", "R", "U", "D", "L", "R", "U", "D"] {
        let client = client.clone();
        let url = url.clone();
        tasks.push(tokio::spawn(async move {
            client.post(&url).body(command).send().await.unwrap().status()
        }));
    }
    for task in tasks {
        assert_eq!(task.await.unwrap(), 200);
    }

    let first = client.get(&url).send().await.unwrap().text().await.unwrap();
    assert!(["L", "R", "U", "D"].contains(&first.as_str()));
    assert_eq!(client.get(&url).send().await.unwrap().text().await.unwrap(), "");

    relay.stop().await.unwrap();
}

#[tokio::test]
async fn test_bind_conflict_is_reported() {
    let relay = start_relay(Duration::from_secs(2), Duration::from_millis(500)).await;
    let taken = RelayConfig {
        bind: IpAddr::V4(Ipv4Addr::LOCALHOST),
        port: relay.local_addr().port(),
        ..RelayConfig::default()
    };

    let err = RelayServer::start(taken).await.err().unwrap();
    assert!(matches!(err, sdk::BenchError::Network(_)));

    relay.stop().await.unwrap();
}
