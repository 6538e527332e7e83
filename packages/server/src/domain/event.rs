//! ドメインイベント
//!
//! - `ClientEvent`: 検証済みのクライアントからの要求（Router が生成）
//! - `ServerEvent`: 状態遷移に伴ってクライアントへ通知する内容
//! - `Notification`: 宛先付きの `ServerEvent`

use super::value_object::{ConnectionId, DisplayName, MessageContent};

/// PARTNER_CONNECTED の本文の接頭辞。クライアントはこれを取り除いて相手の名前を得る。
pub const PARTNER_CONNECTED_PREFIX: &str = "You are now chatting with ";

/// WAITING の本文
pub const WAITING_TEXT: &str = "Waiting for someone to connect...";

/// FIND_NEW を受け付けたときに要求者へ送る SYSTEM の本文
pub const LOOKING_FOR_PARTNER_TEXT: &str = "Looking for a new chat partner...";

/// 切断した相手の名前が分からないときの呼び名
pub const UNKNOWN_PARTNER_NAME: &str = "Your partner";

/// クライアントから届いた（検証済みの）要求
#[derive(Debug, Clone, PartialEq)]
pub enum ClientEvent {
    Join(DisplayName),
    Chat {
        content: MessageContent,
        is_gif: bool,
        /// クライアントが付けたタイムスタンプ（そのまま中継する）
        timestamp: Option<String>,
    },
    FindNew,
    Leave,
    Disconnect,
}

impl ClientEvent {
    /// ログ出力用の種別名
    pub fn kind(&self) -> &'static str {
        match self {
            ClientEvent::Join(_) => "JOIN",
            ClientEvent::Chat { .. } => "CHAT",
            ClientEvent::FindNew => "FIND_NEW",
            ClientEvent::Leave => "LEAVE",
            ClientEvent::Disconnect => "DISCONNECT",
        }
    }

    /// この要求の後に接続を取り除くかどうか
    pub fn ends_connection(&self) -> bool {
        matches!(self, ClientEvent::Leave | ClientEvent::Disconnect)
    }
}

/// サーバーからクライアントへの通知
#[derive(Debug, Clone, PartialEq)]
pub enum ServerEvent {
    PartnerConnected {
        partner: DisplayName,
    },
    PartnerDisconnected {
        partner: Option<DisplayName>,
    },
    Waiting,
    /// 受信者から見える「自分以外」のメンバー
    Users {
        users: Vec<DisplayName>,
    },
    System {
        text: String,
    },
    Chat {
        sender: DisplayName,
        content: MessageContent,
        is_gif: bool,
        timestamp: Option<String>,
    },
}

impl ServerEvent {
    /// ワイヤー上の `content` に載せる本文
    pub fn content(&self) -> String {
        match self {
            ServerEvent::PartnerConnected { partner } => {
                format!("{}{}", PARTNER_CONNECTED_PREFIX, partner)
            }
            ServerEvent::PartnerDisconnected { partner } => format!(
                "{} has disconnected. Waiting for a new partner...",
                partner
                    .as_ref()
                    .map(DisplayName::as_str)
                    .unwrap_or(UNKNOWN_PARTNER_NAME)
            ),
            ServerEvent::Waiting => WAITING_TEXT.to_string(),
            ServerEvent::Users { .. } => String::new(),
            ServerEvent::System { text } => text.clone(),
            ServerEvent::Chat { content, .. } => content.as_str().to_string(),
        }
    }
}

/// 宛先付きの通知
#[derive(Debug, Clone, PartialEq)]
pub struct Notification {
    pub to: ConnectionId,
    pub event: ServerEvent,
}

impl Notification {
    pub fn new(to: ConnectionId, event: ServerEvent) -> Self {
        Self { to, event }
    }
}
