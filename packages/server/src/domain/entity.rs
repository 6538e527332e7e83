//! Entity 定義
//!
//! - `Connection`: クライアント 1 接続分の状態
//! - `Session`: ちょうど 2 接続をペアにしたチャットセッション

use super::{
    error::DomainError,
    value_object::{ConnectionId, DisplayName, SessionId, Timestamp},
};

/// 接続の状態
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectionState {
    /// トランスポート確立済み、JOIN 未受信
    Connecting,
    /// ペアリングキューで相手を待っている
    Waiting,
    /// セッションに参加中
    Paired,
    /// 切断済み（Registry から取り除かれた）
    Closed,
}

/// クライアント接続
///
/// `state == Paired` のときに限り `session_id` が設定される。
#[derive(Debug, Clone, PartialEq)]
pub struct Connection {
    pub id: ConnectionId,
    pub display_name: Option<DisplayName>,
    pub state: ConnectionState,
    pub session_id: Option<SessionId>,
    pub connected_at: Timestamp,
}

impl Connection {
    pub fn new(id: ConnectionId, connected_at: Timestamp) -> Self {
        Self {
            id,
            display_name: None,
            state: ConnectionState::Connecting,
            session_id: None,
            connected_at,
        }
    }

    pub fn is_paired(&self) -> bool {
        self.state == ConnectionState::Paired
    }

    pub fn has_joined(&self) -> bool {
        matches!(
            self.state,
            ConnectionState::Waiting | ConnectionState::Paired
        )
    }

    /// セッションに参加させる
    pub fn pair(&mut self, session_id: SessionId) {
        self.state = ConnectionState::Paired;
        self.session_id = Some(session_id);
    }

    /// セッションから外して待機状態に戻す
    pub fn unpair(&mut self) {
        self.state = ConnectionState::Waiting;
        self.session_id = None;
    }

    pub fn close(&mut self) {
        self.state = ConnectionState::Closed;
        self.session_id = None;
    }
}

/// チャットセッション（ちょうど 2 人）
#[derive(Debug, Clone, PartialEq)]
pub struct Session {
    pub id: SessionId,
    pub member_a: ConnectionId,
    pub member_b: ConnectionId,
    pub created_at: Timestamp,
}

impl Session {
    pub fn new(
        id: SessionId,
        member_a: ConnectionId,
        member_b: ConnectionId,
        created_at: Timestamp,
    ) -> Result<Self, DomainError> {
        if member_a == member_b {
            return Err(DomainError::SelfPairing(member_a.into_string()));
        }
        Ok(Self {
            id,
            member_a,
            member_b,
            created_at,
        })
    }

    pub fn contains(&self, connection_id: &ConnectionId) -> bool {
        &self.member_a == connection_id || &self.member_b == connection_id
    }

    /// 指定した接続の相手を返す（メンバーでなければ None）
    pub fn partner_of(&self, connection_id: &ConnectionId) -> Option<&ConnectionId> {
        if &self.member_a == connection_id {
            Some(&self.member_b)
        } else if &self.member_b == connection_id {
            Some(&self.member_a)
        } else {
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::value_object::{ConnectionIdFactory, SessionIdFactory};

    #[test]
    fn test_new_connection_starts_connecting() {
        // テスト項目: 新規接続は CONNECTING 状態で、セッションを持たない
        // given (前提条件):
        let id = ConnectionIdFactory::generate();

        // when (操作):
        let connection = Connection::new(id.clone(), Timestamp::new(1000));

        // then (期待する結果):
        assert_eq!(connection.state, ConnectionState::Connecting);
        assert!(connection.session_id.is_none());
        assert!(connection.display_name.is_none());
        assert!(!connection.has_joined());
    }

    #[test]
    fn test_pair_and_unpair_keep_session_id_in_sync() {
        // テスト項目: PAIRED ⇔ session_id 設定済み が常に成り立つ
        // given (前提条件):
        let mut connection = Connection::new(ConnectionIdFactory::generate(), Timestamp::new(0));
        let session_id = SessionIdFactory::generate();

        // when (操作):
        connection.pair(session_id.clone());

        // then (期待する結果):
        assert!(connection.is_paired());
        assert_eq!(connection.session_id, Some(session_id));

        // when (操作):
        connection.unpair();

        // then (期待する結果):
        assert_eq!(connection.state, ConnectionState::Waiting);
        assert!(connection.session_id.is_none());
    }

    #[test]
    fn test_session_rejects_self_pairing() {
        // テスト項目: 同じ接続同士のセッションは作成できない
        // given (前提条件):
        let id = ConnectionIdFactory::generate();

        // when (操作):
        let result = Session::new(
            SessionIdFactory::generate(),
            id.clone(),
            id.clone(),
            Timestamp::new(0),
        );

        // then (期待する結果):
        assert_eq!(result, Err(DomainError::SelfPairing(id.into_string())));
    }

    #[test]
    fn test_session_partner_of() {
        // テスト項目: partner_of はもう一方のメンバーを返す
        // given (前提条件):
        let a = ConnectionIdFactory::generate();
        let b = ConnectionIdFactory::generate();
        let outsider = ConnectionIdFactory::generate();
        let session =
            Session::new(SessionIdFactory::generate(), a.clone(), b.clone(), Timestamp::new(0))
                .unwrap();

        // when (操作) / then (期待する結果):
        assert_eq!(session.partner_of(&a), Some(&b));
        assert_eq!(session.partner_of(&b), Some(&a));
        assert_eq!(session.partner_of(&outsider), None);
        assert!(!session.contains(&outsider));
    }
}
