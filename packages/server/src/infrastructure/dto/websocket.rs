//! WebSocket frame DTOs.
//!
//! Every frame is one JSON object. Outbound frames always use [`WireMessage`];
//! inbound frames are first decoded into the closed [`InboundFrame`] variant set.

use serde::{Deserialize, Serialize};

/// `sender` of every frame the server generates itself.
pub const SYSTEM_SENDER: &str = "system";

/// Frame types shared by client and server.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum MessageType {
    Join,
    Chat,
    Leave,
    Users,
    PartnerConnected,
    PartnerDisconnected,
    Waiting,
    FindNew,
    System,
}

/// The wire message as exchanged over `/chat`.
///
/// Optional fields are omitted when absent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WireMessage {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub r#type: MessageType,
    #[serde(default)]
    pub sender: String,
    #[serde(default)]
    pub content: String,
    #[serde(default)]
    pub timestamp: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub users: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_gif: Option<bool>,
}

impl WireMessage {
    /// Build a client frame with no optional fields set.
    pub fn new(
        r#type: MessageType,
        sender: impl Into<String>,
        content: impl Into<String>,
        timestamp: impl Into<String>,
    ) -> Self {
        Self {
            id: None,
            r#type,
            sender: sender.into(),
            content: content.into(),
            timestamp: timestamp.into(),
            users: None,
            is_gif: None,
        }
    }
}

/// Inbound frames the server acts on.
///
/// Server-only and unrecognized `type` values land in `Unknown`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(tag = "type", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum InboundFrame {
    Join {
        #[serde(default)]
        sender: String,
    },
    Chat {
        #[serde(default)]
        content: String,
        #[serde(default, rename = "isGif")]
        is_gif: bool,
        #[serde(default)]
        timestamp: Option<String>,
    },
    Leave,
    FindNew,
    #[serde(other)]
    Unknown,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wire_message_omits_absent_optional_fields() {
        // テスト項目: 省略可能なフィールドが None のときは出力されない
        // given (前提条件):
        let message = WireMessage::new(
            MessageType::Waiting,
            SYSTEM_SENDER,
            "Waiting for someone to connect...",
            "2024-01-01T00:00:00.000Z",
        );

        // when (操作):
        let json: serde_json::Value = serde_json::to_value(&message).unwrap();

        // then (期待する結果):
        assert_eq!(
            json,
            serde_json::json!({
                "type": "WAITING",
                "sender": "system",
                "content": "Waiting for someone to connect...",
                "timestamp": "2024-01-01T00:00:00.000Z",
            })
        );
    }

    #[test]
    fn test_wire_message_uses_camel_case_is_gif() {
        // テスト項目: isGif と users はキャメルケースで出力される
        // given (前提条件):
        let mut message = WireMessage::new(MessageType::Chat, "alice", "https://g/x.gif", "t");
        message.is_gif = Some(true);
        message.users = Some(vec!["bob".to_string()]);

        // when (操作):
        let json: serde_json::Value = serde_json::to_value(&message).unwrap();

        // then (期待する結果):
        assert_eq!(json["isGif"], serde_json::json!(true));
        assert_eq!(json["users"], serde_json::json!(["bob"]));
        assert_eq!(json["type"], serde_json::json!("CHAT"));
    }

    #[test]
    fn test_message_type_names() {
        // テスト項目: 全ての種別が大文字スネークケースで表現される
        // given (前提条件):
        let cases = [
            (MessageType::Join, "\"JOIN\""),
            (MessageType::PartnerConnected, "\"PARTNER_CONNECTED\""),
            (MessageType::PartnerDisconnected, "\"PARTNER_DISCONNECTED\""),
            (MessageType::FindNew, "\"FIND_NEW\""),
            (MessageType::System, "\"SYSTEM\""),
        ];

        for (message_type, expected) in cases {
            // when (操作):
            let json = serde_json::to_string(&message_type).unwrap();

            // then (期待する結果):
            assert_eq!(json, expected);
        }
    }

    #[test]
    fn test_inbound_join_and_chat() {
        // テスト項目: JOIN と CHAT が余分なフィールド付きでも解釈できる
        // given (前提条件):
        let join = r#"{"type":"JOIN","sender":"alice","content":"","timestamp":"t"}"#;
        let chat = r#"{"type":"CHAT","sender":"alice","content":"hi","isGif":true}"#;

        // when (操作):
        let join: InboundFrame = serde_json::from_str(join).unwrap();
        let chat: InboundFrame = serde_json::from_str(chat).unwrap();

        // then (期待する結果):
        assert_eq!(
            join,
            InboundFrame::Join {
                sender: "alice".to_string()
            }
        );
        assert_eq!(
            chat,
            InboundFrame::Chat {
                content: "hi".to_string(),
                is_gif: true,
                timestamp: None,
            }
        );
    }

    #[test]
    fn test_inbound_unknown_type() {
        // テスト項目: 未知の種別やサーバー専用の種別は Unknown になる
        // given (前提条件):
        let frames = [
            r#"{"type":"TYPING"}"#,
            r#"{"type":"USERS","users":["x"]}"#,
        ];

        for frame in frames {
            // when (操作):
            let parsed: InboundFrame = serde_json::from_str(frame).unwrap();

            // then (期待する結果):
            assert_eq!(parsed, InboundFrame::Unknown);
        }
    }

    #[test]
    fn test_inbound_missing_type_is_error() {
        // テスト項目: type の無いフレームはデコードに失敗する
        // given (前提条件):
        let frame = r#"{"sender":"alice","content":"hi"}"#;

        // when (操作):
        let result = serde_json::from_str::<InboundFrame>(frame);

        // then (期待する結果):
        assert!(result.is_err());
    }
}
