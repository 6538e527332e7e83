//! Conversion logic between DTOs and domain types.

use thunder_shared::time::timestamp_to_iso8601;
use uuid::Uuid;

use crate::domain::{LobbyStats, ServerEvent, Timestamp};
use crate::infrastructure::dto::{
    http::{STATUS_MESSAGE, STATUS_ONLINE, StatusDto},
    websocket::{MessageType, SYSTEM_SENDER, WireMessage},
};

// ========================================
// Domain Event → DTO
// ========================================

/// Render a server event as an outbound frame.
///
/// Every frame gets a fresh `id`. Relayed CHAT keeps the client's timestamp when
/// it supplied one; all other frames are stamped with `now`.
pub fn to_wire_message(event: &ServerEvent, now: Timestamp) -> WireMessage {
    let server_time = timestamp_to_iso8601(now.value());
    let mut message = WireMessage {
        id: Some(Uuid::new_v4().to_string()),
        r#type: message_type_of(event),
        sender: SYSTEM_SENDER.to_string(),
        content: event.content(),
        timestamp: server_time,
        users: None,
        is_gif: None,
    };

    match event {
        ServerEvent::Users { users } => {
            message.users = Some(users.iter().map(|u| u.as_str().to_string()).collect());
        }
        ServerEvent::Chat {
            sender,
            is_gif,
            timestamp,
            ..
        } => {
            message.sender = sender.as_str().to_string();
            message.is_gif = Some(*is_gif);
            if let Some(timestamp) = timestamp {
                message.timestamp = timestamp.clone();
            }
        }
        _ => {}
    }

    message
}

fn message_type_of(event: &ServerEvent) -> MessageType {
    match event {
        ServerEvent::PartnerConnected { .. } => MessageType::PartnerConnected,
        ServerEvent::PartnerDisconnected { .. } => MessageType::PartnerDisconnected,
        ServerEvent::Waiting => MessageType::Waiting,
        ServerEvent::Users { .. } => MessageType::Users,
        ServerEvent::System { .. } => MessageType::System,
        ServerEvent::Chat { .. } => MessageType::Chat,
    }
}

impl StatusDto {
    /// Status report for a running server.
    pub fn online(stats: LobbyStats, now: Timestamp) -> Self {
        Self {
            status: STATUS_ONLINE.to_string(),
            message: STATUS_MESSAGE.to_string(),
            timestamp: now.value(),
            connections: stats.connections,
            waiting: stats.waiting,
            sessions: stats.sessions,
        }
    }
}
