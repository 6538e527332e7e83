//! WebSocket client session management.

use futures_util::{
    SinkExt, StreamExt,
    stream::{SplitSink, SplitStream},
};
use thunder_server::infrastructure::dto::websocket::WireMessage;
use thunder_shared::time::{get_unix_timestamp_millis, timestamp_to_iso8601};
use tokio::{net::TcpStream, sync::mpsc};
use tokio_tungstenite::{
    MaybeTlsStream, WebSocketStream, connect_async, tungstenite::protocol::Message,
};

use crate::{
    command::{Command, join_frame},
    error::ClientError,
    formatter::MessageFormatter,
    ui::redisplay_prompt,
};

type WsStream = WebSocketStream<MaybeTlsStream<TcpStream>>;

fn now_iso8601() -> String {
    timestamp_to_iso8601(get_unix_timestamp_millis())
}

async fn send_frame(
    write: &mut SplitSink<WsStream, Message>,
    frame: &WireMessage,
) -> Result<(), ClientError> {
    let json = serde_json::to_string(frame)
        .map_err(|e| ClientError::ConnectionError(format!("failed to serialize frame: {}", e)))?;
    write.send(Message::Text(json.into())).await.map_err(|e| {
        tracing::warn!("Failed to send message: {}", e);
        ClientError::ConnectionLost
    })
}

/// Print every frame from the server until the connection ends.
async fn read_loop(mut read: SplitStream<WsStream>, name: String) {
    while let Some(message) = read.next().await {
        match message {
            Ok(Message::Text(text)) => {
                let formatted = match serde_json::from_str::<WireMessage>(text.as_str()) {
                    Ok(msg) => MessageFormatter::format(&msg),
                    Err(_) => MessageFormatter::format_raw_message(text.as_str()),
                };
                print!("{}", formatted);
                redisplay_prompt(&name);
            }
            Ok(Message::Close(_)) => {
                tracing::info!("Server closed the connection");
                break;
            }
            Err(e) => {
                tracing::warn!("WebSocket read error: {}", e);
                break;
            }
            _ => {}
        }
    }
}

/// Send input lines until the user quits.
///
/// A closed input channel (Ctrl+C / Ctrl+D) counts as `/quit`.
async fn write_loop(
    write: &mut SplitSink<WsStream, Message>,
    input: &mut mpsc::UnboundedReceiver<String>,
    name: &str,
) -> Result<(), ClientError> {
    loop {
        let command = match input.recv().await {
            Some(line) => match Command::parse(&line) {
                Ok(command) => command,
                Err(e) => {
                    print!("{}", MessageFormatter::format_error(&e.to_string()));
                    redisplay_prompt(name);
                    continue;
                }
            },
            None => Command::Quit,
        };

        if command == Command::Help {
            print!("{}", MessageFormatter::format_help());
            redisplay_prompt(name);
            continue;
        }

        if let Some(frame) = command.to_frame(name, &now_iso8601()) {
            send_frame(write, &frame).await?;
        }

        if command == Command::Quit {
            let _ = write.close().await;
            return Ok(());
        }
        redisplay_prompt(name);
    }
}

/// Connect, JOIN as `name` and run until the user quits or the connection ends.
///
/// Returns `Ok(())` only when the user quit.
pub async fn run_client_session(
    url: &str,
    name: &str,
    input: &mut mpsc::UnboundedReceiver<String>,
) -> Result<(), ClientError> {
    let (ws_stream, _response) = connect_async(url)
        .await
        .map_err(|e| ClientError::ConnectionError(e.to_string()))?;

    tracing::info!("Connected to chat server!");
    print!("{}", MessageFormatter::format_welcome(name));

    let (mut write, read) = ws_stream.split();
    send_frame(&mut write, &join_frame(name, &now_iso8601())).await?;

    let mut read_task = tokio::spawn(read_loop(read, name.to_string()));

    tokio::select! {
        _ = &mut read_task => Err(ClientError::ConnectionLost),
        result = write_loop(&mut write, input, name) => {
            read_task.abort();
            result
        }
    }
}
