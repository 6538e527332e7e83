//! メッセージ送信（通知）の抽象化
//!
//! Session Manager が生成した通知を、接続ごとの送信チャンネルへ届けるためのポートです。
//! 実装は Infrastructure 層（`infrastructure::message_pusher`）にあります。

use async_trait::async_trait;
use tokio::sync::mpsc;

use super::{error::MessagePushError, value_object::ConnectionId};

/// 接続ごとの送信チャンネル。WebSocket への書き込みタスクがこれを受信側で読み出す。
pub type PusherChannel = mpsc::UnboundedSender<String>;

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait MessagePusher: Send + Sync {
    /// 接続の送信チャンネルを登録する
    async fn register_client(&self, connection_id: ConnectionId, sender: PusherChannel);

    /// 接続の送信チャンネルを登録解除する（登録されていなければ何もしない）
    async fn unregister_client(&self, connection_id: &ConnectionId);

    /// 特定の接続にシリアライズ済みのフレームを送る
    async fn push_to(
        &self,
        connection_id: &ConnectionId,
        content: &str,
    ) -> Result<(), MessagePushError>;
}
