//! Server setup and execution.

use std::{future::Future, sync::Arc};

use axum::{Router, routing::get};
use thunder_shared::time::Clock;
use tokio::net::TcpListener;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::usecase::{FrameLimits, LobbyHandle, MessageRouter};

use super::{
    handler::{health_check, status, websocket_handler},
    signal::shutdown_signal,
    state::AppState,
};

/// WebSocket path clients connect to
pub const CHAT_PATH: &str = "/chat";

/// Thunder Chat server
pub struct Server {
    state: Arc<AppState>,
}

impl Server {
    /// Create a new server on top of a running lobby.
    ///
    /// # Arguments
    ///
    /// * `lobby` - Handle to the lobby actor
    /// * `limits` - Field limits applied to inbound frames
    /// * `clock` - Clock used for HTTP responses
    pub fn new(lobby: LobbyHandle, limits: FrameLimits, clock: Arc<dyn Clock>) -> Self {
        let router = MessageRouter::new(lobby.clone(), limits);
        Self {
            state: Arc::new(AppState {
                lobby,
                router,
                clock,
            }),
        }
    }

    /// Build the axum application.
    pub fn app(&self) -> Router {
        Router::new()
            .route(CHAT_PATH, get(websocket_handler))
            .route("/api/status", get(status))
            .route("/api/health", get(health_check))
            .with_state(self.state.clone())
            .layer(CorsLayer::permissive())
            .layer(TraceLayer::new_for_http())
    }

    /// Run the server until Ctrl+C or SIGTERM.
    ///
    /// # Arguments
    ///
    /// * `host` - The host address to bind to (e.g., "127.0.0.1")
    /// * `port` - The port number to bind to (e.g., 8080)
    pub async fn run(self, host: String, port: u16) -> Result<(), Box<dyn std::error::Error>> {
        let bind_addr = format!("{}:{}", host, port);
        let listener = TcpListener::bind(&bind_addr).await?;

        tracing::info!("Thunder Chat server listening on {}", listener.local_addr()?);
        tracing::info!("Connect to: ws://{}{}", bind_addr, CHAT_PATH);
        tracing::info!("Press Ctrl+C to shutdown gracefully");

        self.serve(listener, shutdown_signal()).await?;

        tracing::info!("Server shutdown complete");
        Ok(())
    }

    /// Serve on an already bound listener until `shutdown` resolves.
    pub async fn serve<F>(self, listener: TcpListener, shutdown: F) -> std::io::Result<()>
    where
        F: Future<Output = ()> + Send + 'static,
    {
        axum::serve(listener, self.app())
            .with_graceful_shutdown(shutdown)
            .await
    }
}
