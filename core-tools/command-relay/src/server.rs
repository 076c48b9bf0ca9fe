//! Relay HTTP surface
//!
//! Maps requests on `/command` to store operations and owns the server and
//! sweeper tasks. Every response, 404s included, carries
//! `Access-Control-Allow-Origin: *` so browser clients on any origin can
//! poll the relay.

use crate::body::extract_candidate;
use crate::store::{PendingCommandStore, DEFAULT_EXPIRY, DEFAULT_SWEEP_INTERVAL};
use crate::sweeper::spawn_sweeper;
use axum::{
    body::Bytes,
    extract::State,
    http::{
        header::{
            ACCESS_CONTROL_ALLOW_HEADERS, ACCESS_CONTROL_ALLOW_METHODS,
            ACCESS_CONTROL_ALLOW_ORIGIN, CONTENT_TYPE,
        },
        HeaderValue, StatusCode,
    },
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use sdk::errors::BenchError;
use serde::Serialize;
use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tower_http::set_header::SetResponseHeaderLayer;
use tower_http::trace::TraceLayer;

/// Message returned with every rejected POST
pub const INVALID_COMMAND_MESSAGE: &str = "Invalid command. Use L, R, U, or D";

/// Relay server settings
#[derive(Debug, Clone)]
pub struct RelayConfig {
    /// Interface to bind
    pub bind: IpAddr,
    /// TCP port; 0 picks a free one
    pub port: u16,
    /// Age after which an unread command is dropped
    pub expiry: Duration,
    /// Sweeper period
    pub sweep_interval: Duration,
}

impl Default for RelayConfig {
    fn default() -> Self {
        Self {
            bind: IpAddr::V4(Ipv4Addr::UNSPECIFIED),
            port: 8080,
            expiry: DEFAULT_EXPIRY,
            sweep_interval: DEFAULT_SWEEP_INTERVAL,
        }
    }
}

/// Relay state shared across handlers
#[derive(Clone)]
struct RelayState {
    store: Arc<PendingCommandStore>,
}

#[derive(Serialize)]
struct SuccessBody<'a> {
    status: &'a str,
    command: &'a str,
}

#[derive(Serialize)]
struct ErrorBody<'a> {
    status: &'a str,
    message: &'a str,
}

/// Build the relay router around `store`
///
/// HEAD is routed explicitly so it never reaches `get_command`, which
/// consumes the pending command.
pub fn router(store: Arc<PendingCommandStore>) -> Router {
    Router::new()
        .route(
            "/command",
            get(get_command)
                .head(not_found)
                .post(post_command)
                .options(options_command)
                .fallback(not_found),
        )
        .fallback(not_found)
        .with_state(RelayState { store })
        .layer(TraceLayer::new_for_http())
        .layer(SetResponseHeaderLayer::overriding(
            ACCESS_CONTROL_ALLOW_ORIGIN,
            HeaderValue::from_static("*"),
        ))
}

/// POST /command
async fn post_command(State(state): State<RelayState>, body: Bytes) -> Response {
    let body = String::from_utf8_lossy(&body);
    let candidate = extract_candidate(&body);

    match state.store.set(&candidate) {
        Ok(command) => {
            tracing::info!("[POST] Command received and stored: '{}'", command);
            let body = SuccessBody {
                status: "success",
                command: command.as_str(),
            };
            (StatusCode::OK, Json(body)).into_response()
        }
        Err(_) => {
            tracing::warn!("[POST] Invalid command rejected: '{}'", candidate);
            let body = ErrorBody {
                status: "error",
                message: INVALID_COMMAND_MESSAGE,
            };
            (StatusCode::BAD_REQUEST, Json(body)).into_response()
        }
    }
}

/// GET /command
async fn get_command(State(state): State<RelayState>) -> impl IntoResponse {
    let command = state.store.take();

    match command {
        Some(command) => tracing::info!("[GET] Returning command: '{}' (cleared)", command),
        None => tracing::debug!("[GET] No command waiting"),
    }

    (
        StatusCode::OK,
        [(CONTENT_TYPE, "text/plain")],
        command.map(|c| c.as_str()).unwrap_or_default(),
    )
}

/// OPTIONS /command (CORS preflight)
async fn options_command() -> impl IntoResponse {
    (
        StatusCode::OK,
        [
            (ACCESS_CONTROL_ALLOW_METHODS, "GET, POST, OPTIONS"),
            (ACCESS_CONTROL_ALLOW_HEADERS, "Content-Type"),
        ],
    )
}

async fn not_found() -> StatusCode {
    StatusCode::NOT_FOUND
}

/// Running relay: HTTP server plus sweeper
pub struct RelayServer {
    addr: SocketAddr,
    store: Arc<PendingCommandStore>,
    shutdown_tx: watch::Sender<bool>,
    server_task: JoinHandle<()>,
    sweeper_task: JoinHandle<()>,
}

impl RelayServer {
    /// Bind the listener and spawn the server and sweeper tasks
    ///
    /// The store is created here and shared with both tasks; nothing else
    /// holds relay state.
    pub async fn start(config: RelayConfig) -> Result<Self, BenchError> {
        let requested = SocketAddr::new(config.bind, config.port);
        let listener = tokio::net::TcpListener::bind(requested)
            .await
            .map_err(|e| BenchError::Network(format!("Failed to bind to {}: {}", requested, e)))?;

        let addr = listener
            .local_addr()
            .map_err(|e| BenchError::Network(format!("Failed to get local address: {}", e)))?;

        tracing::info!("Command relay bound to {}", addr);

        let store = Arc::new(PendingCommandStore::with_expiry(config.expiry));
        let (shutdown_tx, shutdown_rx) = watch::channel(false);

        let sweeper_task = spawn_sweeper(
            Arc::clone(&store),
            config.sweep_interval,
            shutdown_rx.clone(),
        );

        let app = router(Arc::clone(&store));
        let mut server_shutdown = shutdown_rx;
        let server_task = tokio::spawn(async move {
            tracing::info!("Command relay listening on http://{}/command", addr);

            axum::serve(listener, app)
                .with_graceful_shutdown(async move {
                    while !*server_shutdown.borrow() {
                        if server_shutdown.changed().await.is_err() {
                            break;
                        }
                    }
                    tracing::info!("Command relay shutting down gracefully");
                })
                .await
                .unwrap_or_else(|e| {
                    tracing::error!("Command relay error: {}", e);
                });
        });

        Ok(Self {
            addr,
            store,
            shutdown_tx,
            server_task,
            sweeper_task,
        })
    }

    /// Address the listener actually bound
    pub fn local_addr(&self) -> SocketAddr {
        self.addr
    }

    /// Handle to the shared store
    pub fn store(&self) -> Arc<PendingCommandStore> {
        Arc::clone(&self.store)
    }

    /// Signal shutdown and wait for both tasks to finish
    pub async fn stop(self) -> Result<(), BenchError> {
        self.shutdown_tx.send_replace(true);

        for (name, task) in [("server", self.server_task), ("sweeper", self.sweeper_task)] {
            task.await
                .map_err(|e| BenchError::Network(format!("Relay {} task failed: {}", name, e)))?;
        }

        tracing::info!("Command relay stopped");
        Ok(())
    }
}
