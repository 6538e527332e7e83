//! WebSocket を使った MessagePusher 実装
//!
//! ## 責務
//!
//! - 接続ごとの送信チャンネル（`PusherChannel`）を管理
//! - 通知（シリアライズ済みのフレーム）を該当する接続のチャンネルへ送る
//!
//! チャンネルの受信側は UI 層（`ui::handler::websocket`）の書き込みタスクが読み出します。
//! 1 つの接続に対する送信は常に同じチャンネルを通るので、送った順に届きます。

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::Mutex;

use crate::domain::{ConnectionId, MessagePushError, MessagePusher, PusherChannel};

/// WebSocket を使った MessagePusher 実装
#[derive(Default)]
pub struct WebSocketMessagePusher {
    /// Key: 接続 ID / Value: その接続の送信チャンネル
    channels: Mutex<HashMap<ConnectionId, PusherChannel>>,
}

impl WebSocketMessagePusher {
    pub fn new() -> Self {
        Self::default()
    }

    /// 登録中のチャンネルが無いかどうか
    pub async fn is_empty(&self) -> bool {
        self.channels.lock().await.is_empty()
    }
}

#[async_trait]
impl MessagePusher for WebSocketMessagePusher {
    async fn register_client(&self, connection_id: ConnectionId, sender: PusherChannel) {
        let mut channels = self.channels.lock().await;
        tracing::debug!("Connection '{}' registered to MessagePusher", connection_id);
        channels.insert(connection_id, sender);
    }

    async fn unregister_client(&self, connection_id: &ConnectionId) {
        let mut channels = self.channels.lock().await;
        if channels.remove(connection_id).is_some() {
            tracing::debug!(
                "Connection '{}' unregistered from MessagePusher",
                connection_id
            );
        }
    }

    async fn push_to(
        &self,
        connection_id: &ConnectionId,
        content: &str,
    ) -> Result<(), MessagePushError> {
        let channels = self.channels.lock().await;

        let Some(sender) = channels.get(connection_id) else {
            return Err(MessagePushError::ClientNotFound(
                connection_id.as_str().to_string(),
            ));
        };
        sender
            .send(content.to_string())
            .map_err(|e| MessagePushError::PushFailed(e.to_string()))?;
        tracing::debug!("Pushed frame to connection '{}'", connection_id);
        Ok(())
    }
}
