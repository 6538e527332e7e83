//! HTTP API response DTOs.

use serde::{Deserialize, Serialize};

/// `status` reported by `/api/status` while the server accepts connections.
pub const STATUS_ONLINE: &str = "online";

/// `message` reported by `/api/status`.
pub const STATUS_MESSAGE: &str = "Chat server is running";

/// Response of `GET /api/status`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusDto {
    pub status: String,
    pub message: String,
    /// Unix milliseconds
    pub timestamp: i64,
    pub connections: usize,
    pub waiting: usize,
    pub sessions: usize,
}

/// Response of `GET /api/health`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HealthDto {
    pub status: String,
}
