//! HTTP and WebSocket request handlers.

pub mod http;
pub mod websocket;

pub use http::{health_check, status};
pub use websocket::websocket_handler;
