//! Shared application state.

use std::sync::Arc;

use thunder_shared::time::Clock;

use crate::usecase::{LobbyHandle, MessageRouter};

/// State shared by every request handler.
pub struct AppState {
    /// Handle to the lobby that owns all connection and session state
    pub lobby: LobbyHandle,
    /// Parses inbound frames and forwards them to the lobby
    pub router: MessageRouter,
    pub clock: Arc<dyn Clock>,
}
