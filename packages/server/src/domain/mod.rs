//! Domain layer
//!
//! 接続・セッション・ペアリングキューと、その状態遷移を扱う純粋なモデル層です。

pub mod entity;
pub mod error;
pub mod event;
pub mod message_pusher;
pub mod pairing_queue;
pub mod registry;
pub mod session_manager;
pub mod value_object;

pub use entity::{Connection, ConnectionState, Session};
pub use error::{DomainError, MessagePushError, ValueObjectError};
pub use event::{ClientEvent, Notification, ServerEvent};
pub use message_pusher::{MessagePusher, PusherChannel};
pub use pairing_queue::PairingQueue;
pub use registry::ConnectionRegistry;
pub use session_manager::{LobbyStats, SessionManager};
pub use value_object::{
    ConnectionId, ConnectionIdFactory, DisplayName, MessageContent, SessionId, SessionIdFactory,
    Timestamp,
};
