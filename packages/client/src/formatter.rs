//! Message formatting utilities for client display.

use thunder_server::infrastructure::dto::websocket::{MessageType, WireMessage};
use thunder_shared::time::parse_iso8601;

/// Prefix of PARTNER_CONNECTED content; the partner's name follows it.
pub const PARTNER_CONNECTED_PREFIX: &str = "You are now chatting with ";

/// Message formatter for client display
pub struct MessageFormatter;

impl MessageFormatter {
    /// Format a frame received from the server.
    pub fn format(message: &WireMessage) -> String {
        let time = Self::format_time(&message.timestamp);
        match message.r#type {
            MessageType::PartnerConnected => {
                let partner = Self::partner_name(&message.content);
                format!(
                    "\n============================================================\n\
                     [{}] Connected with {}. Say hi!\n\
                     ============================================================\n",
                    time, partner
                )
            }
            MessageType::PartnerDisconnected => {
                format!("\n[{}] - {}\n", time, message.content)
            }
            MessageType::Waiting => format!("\n[{}] ... {}\n", time, message.content),
            MessageType::Users => {
                let users = message.users.as_deref().unwrap_or_default();
                format!("\n[{}] In this chat: {}\n", time, users.join(", "))
            }
            MessageType::Chat if message.is_gif == Some(true) => {
                format!("\n[{}] @{} sent a GIF: {}\n", time, message.sender, message.content)
            }
            MessageType::Chat => {
                format!("\n[{}] @{}: {}\n", time, message.sender, message.content)
            }
            _ => format!("\n[{}] * {}\n", time, message.content),
        }
    }

    /// The partner's name carried by a PARTNER_CONNECTED content.
    pub fn partner_name(content: &str) -> &str {
        content
            .strip_prefix(PARTNER_CONNECTED_PREFIX)
            .unwrap_or(content)
    }

    /// `HH:MM:SS` (UTC) of an ISO-8601 timestamp, or `--:--:--` if it can't be parsed.
    pub fn format_time(timestamp: &str) -> String {
        parse_iso8601(timestamp)
            .map(|dt| dt.format("%H:%M:%S").to_string())
            .unwrap_or_else(|| "--:--:--".to_string())
    }

    /// Format the banner shown after connecting
    pub fn format_welcome(name: &str) -> String {
        format!(
            "\nYou are '{}'. Type messages and press Enter to send.\n\
             Commands: /gif <url>, /next, /quit, /help\n\n",
            name
        )
    }

    /// Format the command list
    pub fn format_help() -> String {
        "\n  <text>       send a message\n  \
         /gif <url>   send a GIF\n  \
         /next        find a new partner\n  \
         /quit        leave the chat\n"
            .to_string()
    }

    /// Format a local error (e.g. a mistyped command)
    pub fn format_error(error: &str) -> String {
        format!("\n! {}\n", error)
    }

    /// Format a raw text message (when parsing fails)
    pub fn format_raw_message(text: &str) -> String {
        format!("\n← Received: {}\n", text)
    }
}
