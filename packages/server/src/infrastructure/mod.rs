//! Infrastructure layer
//!
//! ワイヤー形式（JSON）の DTO と、WebSocket チャンネルを使った通知の実装を提供します。

pub mod dto;
pub mod message_pusher;
