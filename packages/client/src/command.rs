//! Input line parsing.
//!
//! Plain text is sent as a chat message; lines starting with `/` are commands.

use thunder_server::infrastructure::dto::websocket::{MessageType, WireMessage};

use crate::error::ClientError;

/// A parsed input line
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Plain chat text
    Chat(String),
    /// `/gif <url>`
    Gif(String),
    /// `/next`: leave the current partner and find a new one
    Next,
    /// `/quit`: leave the chat and exit
    Quit,
    /// `/help`
    Help,
}

impl Command {
    /// Parse one trimmed input line.
    pub fn parse(line: &str) -> Result<Self, ClientError> {
        let Some(rest) = line.strip_prefix('/') else {
            return Ok(Command::Chat(line.to_string()));
        };

        let (name, argument) = match rest.split_once(char::is_whitespace) {
            Some((name, argument)) => (name, argument.trim()),
            None => (rest, ""),
        };

        match name {
            "gif" if argument.is_empty() => Err(ClientError::MissingArgument("/gif <url>")),
            "gif" => Ok(Command::Gif(argument.to_string())),
            "next" => Ok(Command::Next),
            "quit" | "exit" => Ok(Command::Quit),
            "help" => Ok(Command::Help),
            _ => Err(ClientError::UnknownCommand(line.to_string())),
        }
    }

    /// The frame to send for this command, if any.
    pub fn to_frame(&self, name: &str, timestamp: &str) -> Option<WireMessage> {
        let frame = match self {
            Command::Chat(text) => {
                let mut frame = WireMessage::new(MessageType::Chat, name, text.as_str(), timestamp);
                frame.is_gif = Some(false);
                frame
            }
            Command::Gif(url) => {
                let mut frame = WireMessage::new(MessageType::Chat, name, url.as_str(), timestamp);
                frame.is_gif = Some(true);
                frame
            }
            Command::Next => WireMessage::new(MessageType::FindNew, name, "", timestamp),
            Command::Quit => WireMessage::new(MessageType::Leave, name, "", timestamp),
            Command::Help => return None,
        };
        Some(frame)
    }
}

/// The JOIN frame sent right after connecting.
pub fn join_frame(name: &str, timestamp: &str) -> WireMessage {
    WireMessage::new(MessageType::Join, name, "", timestamp)
}
