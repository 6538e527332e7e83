//! Error types for the Thunder Chat client.

use thiserror::Error;

/// Client-specific errors
#[derive(Debug, Error)]
pub enum ClientError {
    /// The server could not be reached
    #[error("Connection error: {0}")]
    ConnectionError(String),

    /// An established connection was closed by the server or the network
    #[error("Connection lost")]
    ConnectionLost,

    /// Gave up after repeated connection failures
    #[error("Failed to reconnect after {0} attempts")]
    ReconnectFailed(u32),

    /// Input line that is neither text nor a known command
    #[error("Unknown command: {0}")]
    UnknownCommand(String),

    /// A command that needs an argument was given none
    #[error("Usage: {0}")]
    MissingArgument(&'static str),
}
