//! UseCase: ロビー（接続・ペアリング・中継の直列化）
//!
//! ## 概要
//!
//! `LobbyService` は `SessionManager` を排他的に所有する tokio タスクです。
//! 全ての状態変更は `LobbyCommand` としてチャンネル経由で届き、1 つずつ処理されます。
//! あるコマンドが生んだ通知は、次のコマンドを取り出す前に全て送信されます。
//!
//! そのため、
//! - 同じ接続への通知は状態遷移の順に届く
//! - あるセッションでの CHAT 中継と、そのセッションの解体が同時に起こることはない
//!
//! `LobbyHandle` はクローン可能な窓口で、各要求は `oneshot` で完了を待ちます。

use std::sync::Arc;

use thunder_shared::time::Clock;
use tokio::sync::{mpsc, oneshot};

use crate::{
    domain::{
        ClientEvent, ConnectionId, ConnectionIdFactory, DomainError, LobbyStats, MessagePusher,
        Notification, PusherChannel, SessionManager, Timestamp,
    },
    infrastructure::dto::conversion::to_wire_message,
};

use super::error::LobbyError;

/// コマンドチャンネルの既定の容量
pub const DEFAULT_COMMAND_BUFFER: usize = 1024;

/// Lobby への要求
enum LobbyCommand {
    Connect {
        channel: PusherChannel,
        reply: oneshot::Sender<Result<ConnectionId, DomainError>>,
    },
    Dispatch {
        connection_id: ConnectionId,
        event: ClientEvent,
        reply: oneshot::Sender<()>,
    },
    Stats {
        reply: oneshot::Sender<LobbyStats>,
    },
}

/// Session Manager を所有するアクター
pub struct LobbyService {
    manager: SessionManager,
    pusher: Arc<dyn MessagePusher>,
    clock: Arc<dyn Clock>,
    commands: mpsc::Receiver<LobbyCommand>,
}

impl LobbyService {
    /// アクターとハンドルを作成する（まだ起動しない）
    pub fn new(
        pusher: Arc<dyn MessagePusher>,
        clock: Arc<dyn Clock>,
        buffer: usize,
    ) -> (Self, LobbyHandle) {
        let (tx, rx) = mpsc::channel(buffer);
        let service = Self {
            manager: SessionManager::new(),
            pusher,
            clock,
            commands: rx,
        };
        (service, LobbyHandle { commands: tx })
    }

    /// アクターを tokio タスクとして起動し、ハンドルを返す
    pub fn spawn(pusher: Arc<dyn MessagePusher>, clock: Arc<dyn Clock>) -> LobbyHandle {
        let (service, handle) = Self::new(pusher, clock, DEFAULT_COMMAND_BUFFER);
        tokio::spawn(service.run());
        handle
    }

    /// 全てのハンドルが破棄されるまでコマンドを処理する
    pub async fn run(mut self) {
        tracing::debug!("Lobby started");
        while let Some(command) = self.commands.recv().await {
            self.handle(command).await;
        }
        tracing::debug!("Lobby stopped");
    }

    async fn handle(&mut self, command: LobbyCommand) {
        match command {
            LobbyCommand::Connect { channel, reply } => {
                let connection_id = ConnectionIdFactory::generate();
                let result = match self.manager.admit(connection_id.clone(), self.now()) {
                    Ok(()) => {
                        self.pusher
                            .register_client(connection_id.clone(), channel)
                            .await;
                        Ok(connection_id)
                    }
                    Err(e) => Err(e),
                };
                let _ = reply.send(result);
            }
            LobbyCommand::Dispatch {
                connection_id,
                event,
                reply,
            } => {
                tracing::debug!("Applying {} from '{}'", event.kind(), connection_id);
                let ends_connection = event.ends_connection();
                let now = self.now();

                let notifications = self.manager.apply(&connection_id, event, now);
                self.deliver(notifications, now).await;

                if ends_connection {
                    self.pusher.unregister_client(&connection_id).await;
                }
                let _ = reply.send(());
            }
            LobbyCommand::Stats { reply } => {
                let _ = reply.send(self.manager.stats());
            }
        }
    }

    /// 通知を順番に送る。送れなかった通知は捨てる（その接続は切断処理中）。
    async fn deliver(&self, notifications: Vec<Notification>, now: Timestamp) {
        for notification in notifications {
            let message = to_wire_message(&notification.event, now);
            let json = match serde_json::to_string(&message) {
                Ok(json) => json,
                Err(e) => {
                    tracing::error!("Failed to serialize {:?}: {}", message.r#type, e);
                    continue;
                }
            };

            if let Err(e) = self.pusher.push_to(&notification.to, &json).await {
                tracing::debug!(
                    "Dropped {:?} for '{}': {}",
                    message.r#type,
                    notification.to,
                    e
                );
            }
        }
    }

    fn now(&self) -> Timestamp {
        Timestamp::new(self.clock.now_millis())
    }
}

/// Lobby への窓口
#[derive(Clone)]
pub struct LobbyHandle {
    commands: mpsc::Sender<LobbyCommand>,
}

impl LobbyHandle {
    /// 新しい接続を受け付け、送信チャンネルを登録する
    pub async fn connect(&self, channel: PusherChannel) -> Result<ConnectionId, LobbyError> {
        let (reply, response) = oneshot::channel();
        self.send(LobbyCommand::Connect { channel, reply }).await?;
        let admitted = response.await.map_err(|_| LobbyError::Unavailable)?;
        Ok(admitted?)
    }

    /// 検証済みのクライアントイベントを適用し、通知の送信まで待つ
    pub async fn dispatch(
        &self,
        connection_id: ConnectionId,
        event: ClientEvent,
    ) -> Result<(), LobbyError> {
        let (reply, response) = oneshot::channel();
        self.send(LobbyCommand::Dispatch {
            connection_id,
            event,
            reply,
        })
        .await?;
        response.await.map_err(|_| LobbyError::Unavailable)
    }

    /// トランスポートの切断を通知する。何度呼んでもよい。
    pub async fn disconnect(&self, connection_id: ConnectionId) -> Result<(), LobbyError> {
        self.dispatch(connection_id, ClientEvent::Disconnect).await
    }

    pub async fn stats(&self) -> Result<LobbyStats, LobbyError> {
        let (reply, response) = oneshot::channel();
        self.send(LobbyCommand::Stats { reply }).await?;
        response.await.map_err(|_| LobbyError::Unavailable)
    }

    async fn send(&self, command: LobbyCommand) -> Result<(), LobbyError> {
        self.commands
            .send(command)
            .await
            .map_err(|_| LobbyError::Unavailable)
    }
}
