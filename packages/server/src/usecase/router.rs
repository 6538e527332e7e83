//! UseCase: 受信フレームの振り分け
//!
//! 生のテキストフレームを `InboundFrame` として解釈し、値オブジェクトに検証してから
//! `ClientEvent` として Lobby に渡します。解釈・検証に失敗したフレームは
//! `RouteError::MalformedFrame` として返され、呼び出し側は記録して捨てるだけです。
//! 接続は閉じません。

use crate::{
    domain::{
        ClientEvent, ConnectionId, DisplayName, MessageContent,
        value_object::{DEFAULT_MAX_DISPLAY_NAME_CHARS, DEFAULT_MAX_MESSAGE_CONTENT_CHARS},
    },
    infrastructure::dto::websocket::InboundFrame,
};

use super::{error::RouteError, lobby::LobbyHandle};

/// フレームの各フィールドの上限（文字数）
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FrameLimits {
    pub max_name_chars: usize,
    pub max_content_chars: usize,
}

impl Default for FrameLimits {
    fn default() -> Self {
        Self {
            max_name_chars: DEFAULT_MAX_DISPLAY_NAME_CHARS,
            max_content_chars: DEFAULT_MAX_MESSAGE_CONTENT_CHARS,
        }
    }
}

/// フレーム処理後に接続をどうするか
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RouteOutcome {
    Continue,
    /// LEAVE を受け付けたのでトランスポートを閉じる
    Close,
}

#[derive(Clone)]
pub struct MessageRouter {
    lobby: LobbyHandle,
    limits: FrameLimits,
}

impl MessageRouter {
    pub fn new(lobby: LobbyHandle, limits: FrameLimits) -> Self {
        Self { lobby, limits }
    }

    /// フレームを解釈して Lobby に渡す
    pub async fn route(
        &self,
        connection_id: &ConnectionId,
        raw: &str,
    ) -> Result<RouteOutcome, RouteError> {
        let event = parse_frame(raw, &self.limits)?;
        let outcome = if event.ends_connection() {
            RouteOutcome::Close
        } else {
            RouteOutcome::Continue
        };

        self.lobby.dispatch(connection_id.clone(), event).await?;
        Ok(outcome)
    }
}

/// 生のフレームを検証済みの `ClientEvent` に変換する
pub fn parse_frame(raw: &str, limits: &FrameLimits) -> Result<ClientEvent, RouteError> {
    let frame: InboundFrame =
        serde_json::from_str(raw).map_err(|e| RouteError::MalformedFrame(e.to_string()))?;

    match frame {
        InboundFrame::Join { sender } => DisplayName::new(sender, limits.max_name_chars)
            .map(ClientEvent::Join)
            .map_err(|e| RouteError::MalformedFrame(format!("JOIN: {}", e))),
        InboundFrame::Chat {
            content,
            is_gif,
            timestamp,
        } => {
            let content = MessageContent::new(content, limits.max_content_chars)
                .map_err(|e| RouteError::MalformedFrame(format!("CHAT: {}", e)))?;
            Ok(ClientEvent::Chat {
                content,
                is_gif,
                timestamp: timestamp.filter(|t| !t.trim().is_empty()),
            })
        }
        InboundFrame::Leave => Ok(ClientEvent::Leave),
        InboundFrame::FindNew => Ok(ClientEvent::FindNew),
        InboundFrame::Unknown => Err(RouteError::MalformedFrame(
            "unsupported message type".to_string(),
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        domain::{LobbyStats, message_pusher::MockMessagePusher},
        usecase::lobby::LobbyService,
    };
    use std::sync::Arc;
    use thunder_shared::time::FixedClock;
    use tokio::sync::mpsc;

    fn limits() -> FrameLimits {
        FrameLimits::default()
    }

    fn assert_malformed(raw: &str) {
        let result = parse_frame(raw, &limits());
        assert!(
            matches!(result, Err(RouteError::MalformedFrame(_))),
            "expected MalformedFrame for {}, got {:?}",
            raw,
            result
        );
    }

    #[test]
    fn test_parse_join() {
        // テスト項目: JOIN の sender が前後の空白を除いた表示名になる
        // given (前提条件):
        let raw = r#"{"type":"JOIN","sender":"  alice ","content":"","timestamp":"2024-01-01T00:00:00.000Z"}"#;

        // when (操作):
        let event = parse_frame(raw, &limits()).unwrap();

        // then (期待する結果):
        assert_eq!(
            event,
            ClientEvent::Join(DisplayName::try_from("alice".to_string()).unwrap())
        );
    }

    #[test]
    fn test_parse_chat_keeps_content_and_flags() {
        // テスト項目: CHAT の本文・isGif・timestamp がそのまま保持される
        // given (前提条件):
        let raw = r#"{"type":"CHAT","sender":"alice","content":" hi there ","timestamp":"2024-01-01T00:00:00.000Z","isGif":true}"#;

        // when (操作):
        let event = parse_frame(raw, &limits()).unwrap();

        // then (期待する結果):
        assert_eq!(
            event,
            ClientEvent::Chat {
                content: MessageContent::try_from(" hi there ".to_string()).unwrap(),
                is_gif: true,
                timestamp: Some("2024-01-01T00:00:00.000Z".to_string()),
            }
        );
    }

    #[test]
    fn test_parse_chat_defaults() {
        // テスト項目: isGif と timestamp が無ければ false / None になる
        // given (前提条件):
        let raw = r#"{"type":"CHAT","content":"hello"}"#;

        // when (操作):
        let event = parse_frame(raw, &limits()).unwrap();

        // then (期待する結果):
        assert_eq!(
            event,
            ClientEvent::Chat {
                content: MessageContent::try_from("hello".to_string()).unwrap(),
                is_gif: false,
                timestamp: None,
            }
        );
    }

    #[test]
    fn test_parse_leave_and_find_new() {
        // テスト項目: LEAVE と FIND_NEW は本文に関係なく解釈される
        // given (前提条件):
        let leave = r#"{"type":"LEAVE","sender":"alice","content":""}"#;
        let find_new = r#"{"type":"FIND_NEW","sender":"alice","content":"","timestamp":"t"}"#;

        // when (操作) / then (期待する結果):
        assert_eq!(parse_frame(leave, &limits()).unwrap(), ClientEvent::Leave);
        assert_eq!(
            parse_frame(find_new, &limits()).unwrap(),
            ClientEvent::FindNew
        );
    }

    #[test]
    fn test_parse_rejects_malformed_frames() {
        // テスト項目: 読めない・種別不明・必須フィールド不正のフレームは MalformedFrame
        assert_malformed("not json");
        assert_malformed("");
        assert_malformed(r#"{"content":"no type"}"#);
        assert_malformed(r#"{"type":"TYPING"}"#);
        assert_malformed(r#"{"type":"PARTNER_CONNECTED","content":"x"}"#);
        assert_malformed(r#"{"type":"JOIN","sender":"   "}"#);
        assert_malformed(r#"{"type":"JOIN"}"#);
        assert_malformed(r#"{"type":"CHAT","content":""}"#);
        assert_malformed(r#"{"type":"CHAT","content":"   ","isGif":true}"#);
    }

    #[test]
    fn test_parse_respects_limits() {
        // テスト項目: 上限を超える名前は切り詰められ、本文は拒否される
        // given (前提条件):
        let limits = FrameLimits {
            max_name_chars: 3,
            max_content_chars: 5,
        };

        // when (操作) / then (期待する結果):
        assert_eq!(
            parse_frame(r#"{"type":"JOIN","sender":"bob"}"#, &limits).unwrap(),
            ClientEvent::Join(DisplayName::try_from("bob".to_string()).unwrap())
        );
        assert_eq!(
            parse_frame(r#"{"type":"JOIN","sender":"carol"}"#, &limits).unwrap(),
            ClientEvent::Join(DisplayName::try_from("car".to_string()).unwrap())
        );
        assert!(parse_frame(r#"{"type":"CHAT","content":"héllo"}"#, &limits).is_ok());
        assert!(parse_frame(r#"{"type":"CHAT","content":"hello!"}"#, &limits).is_err());
    }

    #[tokio::test]
    async fn test_route_outcomes() {
        // テスト項目: LEAVE は Close、それ以外は Continue、不正なフレームは状態を変えない
        // given (前提条件):
        let mut pusher = MockMessagePusher::new();
        pusher.expect_register_client().return_const(());
        pusher.expect_unregister_client().return_const(());
        pusher.expect_push_to().returning(|_, _| Ok(()));
        let lobby = LobbyService::spawn(Arc::new(pusher), Arc::new(FixedClock::new(0)));
        let router = MessageRouter::new(lobby.clone(), FrameLimits::default());
        let (tx, _rx) = mpsc::unbounded_channel();
        let id = lobby.connect(tx).await.unwrap();

        // when (操作):
        let malformed = router.route(&id, "{").await;
        let join = router
            .route(&id, r#"{"type":"JOIN","sender":"alice"}"#)
            .await;
        let leave = router.route(&id, r#"{"type":"LEAVE"}"#).await;

        // then (期待する結果):
        assert!(matches!(malformed, Err(RouteError::MalformedFrame(_))));
        assert_eq!(join, Ok(RouteOutcome::Continue));
        assert_eq!(leave, Ok(RouteOutcome::Close));
        assert_eq!(lobby.stats().await.unwrap(), LobbyStats::default());
    }
}
