//! Thunder Chat terminal client with reconnection support.
//!
//! Connects to a Thunder Chat server, joins under a display name and chats with
//! whoever the server pairs you with.
//! Automatically reconnects on disconnection (max 5 attempts with 5 second interval).
//!
//! Run with:
//! ```not_rust
//! cargo run --bin thunder-client -- --name Alice
//! cargo run --bin thunder-client -- -n Bob -u ws://127.0.0.1:3000/chat
//! ```

use clap::Parser;

use thunder_shared::logger::setup_logger;

#[derive(Parser, Debug)]
#[command(name = "thunder-client")]
#[command(about = "Terminal client for Thunder Chat random 1-on-1 chat", long_about = None)]
struct Args {
    /// Display name shown to your chat partner
    #[arg(short = 'n', long)]
    name: String,

    /// WebSocket server URL
    #[arg(short = 'u', long, default_value = "ws://127.0.0.1:8080/chat")]
    url: String,
}

#[tokio::main]
async fn main() {
    setup_logger(env!("CARGO_BIN_NAME"), "info");

    let args = Args::parse();

    if let Err(e) = thunder_client::run_client(args.url, args.name).await {
        tracing::error!("Client error: {}", e);
        std::process::exit(1);
    }
}
