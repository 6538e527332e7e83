//! Thunder Chat pairing server.
//!
//! Pairs waiting clients first-come first-served and relays chat frames between partners.
//!
//! Run with:
//! ```not_rust
//! cargo run --bin thunder-server
//! cargo run --bin thunder-server -- --host 0.0.0.0 --port 3000
//! ```

use std::sync::Arc;

use clap::Parser;
use thunder_server::{
    domain::value_object::{DEFAULT_MAX_DISPLAY_NAME_CHARS, DEFAULT_MAX_MESSAGE_CONTENT_CHARS},
    infrastructure::message_pusher::WebSocketMessagePusher,
    ui::Server,
    usecase::{FrameLimits, LobbyService},
};
use thunder_shared::{logger::setup_logger, time::SystemClock};

#[derive(Parser, Debug)]
#[command(name = "thunder-server")]
#[command(about = "Random 1-on-1 anonymous chat server", long_about = None)]
struct Args {
    /// Host address to bind the server to
    #[arg(short = 'H', long, default_value = "127.0.0.1")]
    host: String,

    /// Port number to bind the server to
    #[arg(short = 'p', long, default_value = "8080")]
    port: u16,

    /// Display names longer than this are truncated (characters)
    #[arg(long, default_value_t = DEFAULT_MAX_DISPLAY_NAME_CHARS)]
    max_name_length: usize,

    /// Maximum chat message length in characters
    #[arg(long, default_value_t = DEFAULT_MAX_MESSAGE_CONTENT_CHARS)]
    max_message_length: usize,
}

#[tokio::main]
async fn main() {
    setup_logger(env!("CARGO_BIN_NAME"), "debug");

    let args = Args::parse();

    // 1. MessagePusher (WebSocket implementation)
    let message_pusher = Arc::new(WebSocketMessagePusher::new());

    // 2. Lobby actor, the single owner of all connection and session state
    let clock = Arc::new(SystemClock);
    let lobby = LobbyService::spawn(message_pusher, clock.clone());

    // 3. Server
    let limits = FrameLimits {
        max_name_chars: args.max_name_length,
        max_content_chars: args.max_message_length,
    };
    let server = Server::new(lobby, limits, clock);
    if let Err(e) = server.run(args.host, args.port).await {
        tracing::error!("Server error: {}", e);
        std::process::exit(1);
    }
}
