//! WebSocket connection handlers.

use std::sync::Arc;

use axum::{
    extract::{
        State,
        ws::{Message, WebSocket, WebSocketUpgrade},
    },
    response::IntoResponse,
};
use futures_util::{
    sink::SinkExt,
    stream::{SplitSink, StreamExt},
};
use tokio::sync::mpsc;

use crate::{
    domain::ConnectionId,
    ui::state::AppState,
    usecase::{MessageRouter, RouteError, RouteOutcome},
};

pub async fn websocket_handler(
    ws: WebSocketUpgrade,
    State(state): State<Arc<AppState>>,
) -> impl IntoResponse {
    ws.on_upgrade(move |socket| handle_socket(socket, state))
}

/// Spawns a task that drains the connection's outbound channel into the WebSocket.
///
/// The task ends when a write fails, or when the lobby drops the channel after a
/// LEAVE; in the latter case a close frame is sent last.
fn pusher_loop(
    mut rx: mpsc::UnboundedReceiver<String>,
    mut sender: SplitSink<WebSocket, Message>,
) -> tokio::task::JoinHandle<()> {
    tokio::spawn(async move {
        while let Some(frame) = rx.recv().await {
            if sender.send(Message::Text(frame.into())).await.is_err() {
                return;
            }
        }
        let _ = sender.send(Message::Close(None)).await;
    })
}

/// Reads frames until the client closes the socket, a read fails or a LEAVE is accepted.
///
/// Returns `RouteOutcome::Close` only for the LEAVE case.
fn receiver_loop(
    mut receiver: futures_util::stream::SplitStream<WebSocket>,
    router: MessageRouter,
    connection_id: ConnectionId,
) -> tokio::task::JoinHandle<RouteOutcome> {
    tokio::spawn(async move {
        while let Some(msg) = receiver.next().await {
            let msg = match msg {
                Ok(msg) => msg,
                Err(e) => {
                    tracing::debug!("WebSocket error on '{}': {}", connection_id, e);
                    break;
                }
            };

            match msg {
                Message::Text(text) => match router.route(&connection_id, text.as_str()).await {
                    Ok(RouteOutcome::Continue) => {}
                    Ok(RouteOutcome::Close) => return RouteOutcome::Close,
                    Err(RouteError::MalformedFrame(reason)) => {
                        tracing::warn!("Dropping frame from '{}': {}", connection_id, reason);
                    }
                    Err(e) => {
                        tracing::error!("Failed to route frame from '{}': {}", connection_id, e);
                        break;
                    }
                },
                Message::Binary(_) => {
                    tracing::debug!("Ignoring binary frame from '{}'", connection_id);
                }
                Message::Close(_) => {
                    tracing::info!("Connection '{}' requested close", connection_id);
                    break;
                }
                // Ping/pong is handled by the WebSocket protocol
                _ => {}
            }
        }
        RouteOutcome::Continue
    })
}

async fn handle_socket(socket: WebSocket, state: Arc<AppState>) {
    let (tx, rx) = mpsc::unbounded_channel();

    let connection_id = match state.lobby.connect(tx).await {
        Ok(id) => id,
        Err(e) => {
            tracing::error!("Failed to admit connection: {}", e);
            return;
        }
    };
    tracing::info!("Connection '{}' established", connection_id);

    let (sender, receiver) = socket.split();
    let mut send_task = pusher_loop(rx, sender);
    let mut recv_task = receiver_loop(receiver, state.router.clone(), connection_id.clone());

    // If any one of the tasks completes, stop the other
    tokio::select! {
        outcome = &mut recv_task => match outcome {
            // The lobby has already dropped the channel, so the writer finishes on its own
            Ok(RouteOutcome::Close) => {
                let _ = (&mut send_task).await;
            }
            _ => send_task.abort(),
        },
        _ = &mut send_task => recv_task.abort(),
    };

    // Idempotent: a LEAVE has already removed the connection
    if let Err(e) = state.lobby.disconnect(connection_id.clone()).await {
        tracing::warn!("Failed to disconnect '{}': {}", connection_id, e);
    }
    tracing::info!("Connection '{}' closed", connection_id);
}
