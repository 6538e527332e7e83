//! Session Manager
//!
//! 接続が「ひとり（待機中）」と「ペア（会話中）」の間を行き来する状態遷移を管理する集約です。
//! Connection Registry・Pairing Queue・セッション表を排他的に所有し、
//! すべての操作は同期的・有限時間で完了し、配信すべき `Notification` を順序付きで返します。
//!
//! 直列化（ロックやアクター）は呼び出し側の責務です。

use std::collections::HashMap;

use super::{
    entity::{Connection, ConnectionState, Session},
    error::DomainError,
    event::{ClientEvent, LOOKING_FOR_PARTNER_TEXT, Notification, ServerEvent},
    pairing_queue::PairingQueue,
    registry::ConnectionRegistry,
    value_object::{ConnectionId, DisplayName, MessageContent, SessionId, SessionIdFactory, Timestamp},
};

/// ロビー全体の統計
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct LobbyStats {
    pub connections: usize,
    pub waiting: usize,
    pub sessions: usize,
}

#[derive(Debug, Default)]
pub struct SessionManager {
    registry: ConnectionRegistry,
    queue: PairingQueue,
    sessions: HashMap<SessionId, Session>,
}

impl SessionManager {
    pub fn new() -> Self {
        Self::default()
    }

    /// トランスポート確立直後の接続を登録する
    pub fn admit(&mut self, id: ConnectionId, now: Timestamp) -> Result<(), DomainError> {
        self.registry.admit(id.clone(), now)?;
        tracing::info!("Connection '{}' admitted", id);
        Ok(())
    }

    /// クライアントイベントを対応する操作に振り分ける
    pub fn apply(
        &mut self,
        id: &ConnectionId,
        event: ClientEvent,
        now: Timestamp,
    ) -> Vec<Notification> {
        match event {
            ClientEvent::Join(name) => self.on_join(id, name, now),
            ClientEvent::Chat {
                content,
                is_gif,
                timestamp,
            } => self.on_chat(id, content, is_gif, timestamp),
            ClientEvent::FindNew => self.on_find_new(id, now),
            ClientEvent::Leave => self.on_leave(id, now),
            ClientEvent::Disconnect => self.on_disconnect(id, now),
        }
    }

    /// JOIN: 名前を記録してキューに並べ、即座にマッチングを試みる
    pub fn on_join(
        &mut self,
        id: &ConnectionId,
        name: DisplayName,
        now: Timestamp,
    ) -> Vec<Notification> {
        let mut notifications = Vec::new();

        let Some(connection) = self.registry.get(id) else {
            tracing::debug!("Ignoring JOIN from unknown connection '{}'", id);
            return notifications;
        };
        if connection.has_joined() {
            tracing::debug!(
                "Ignoring JOIN from connection '{}' in state {:?}",
                id,
                connection.state
            );
            return notifications;
        }

        tracing::info!("Connection '{}' joined as '{}'", id, name);
        if let Err(e) = self.registry.set_name(id, name) {
            tracing::warn!("Failed to record display name: {}", e);
            return notifications;
        }
        if let Some(connection) = self.registry.get_mut(id) {
            connection.state = ConnectionState::Waiting;
        }

        self.enqueue(id);
        self.match_waiting(now, &mut notifications);
        self.notify_if_waiting(id, &mut notifications);

        notifications
    }

    /// CHAT: ペアの相手にだけそのまま中継する。ペアでなければ黙って捨てる。
    pub fn on_chat(
        &self,
        id: &ConnectionId,
        content: MessageContent,
        is_gif: bool,
        timestamp: Option<String>,
    ) -> Vec<Notification> {
        let Some(peer) = self.partner_of(id) else {
            tracing::debug!("Dropping CHAT from '{}': not paired", id);
            return Vec::new();
        };
        let Some(sender) = self.registry.display_name(id).cloned() else {
            return Vec::new();
        };

        vec![Notification::new(
            peer.clone(),
            ServerEvent::Chat {
                sender,
                content,
                is_gif,
                timestamp,
            },
        )]
    }

    /// FIND_NEW: 現在のセッションを解体し、双方をキューに戻して再マッチングする。
    /// ペアでない接続からの要求は無視する。
    pub fn on_find_new(&mut self, id: &ConnectionId, now: Timestamp) -> Vec<Notification> {
        let mut notifications = Vec::new();

        if !self.registry.get(id).is_some_and(Connection::is_paired) {
            tracing::debug!("Ignoring FIND_NEW from '{}': not paired", id);
            return notifications;
        }

        let requester_name = self.registry.display_name(id).cloned();
        let peer = self.teardown_session(id);

        if let Some(peer) = &peer {
            notifications.push(Notification::new(
                peer.clone(),
                ServerEvent::PartnerDisconnected {
                    partner: requester_name,
                },
            ));
        }
        notifications.push(Notification::new(
            id.clone(),
            ServerEvent::System {
                text: LOOKING_FOR_PARTNER_TEXT.to_string(),
            },
        ));

        self.enqueue(id);
        if let Some(peer) = &peer {
            self.enqueue(peer);
        }
        self.match_waiting(now, &mut notifications);
        self.notify_if_waiting(id, &mut notifications);

        notifications
    }

    /// LEAVE: クライアントからの明示的な退出
    pub fn on_leave(&mut self, id: &ConnectionId, now: Timestamp) -> Vec<Notification> {
        self.remove_connection(id, now, "left")
    }

    /// トランスポートの切断。LEAVE と全く同じ後始末を行う。
    pub fn on_disconnect(&mut self, id: &ConnectionId, now: Timestamp) -> Vec<Notification> {
        self.remove_connection(id, now, "disconnected")
    }

    pub fn connection(&self, id: &ConnectionId) -> Option<&Connection> {
        self.registry.get(id)
    }

    pub fn session_of(&self, id: &ConnectionId) -> Option<&Session> {
        let session_id = self.registry.get(id)?.session_id.as_ref()?;
        self.sessions.get(session_id)
    }

    pub fn partner_of(&self, id: &ConnectionId) -> Option<&ConnectionId> {
        self.session_of(id)?.partner_of(id)
    }

    pub fn is_queued(&self, id: &ConnectionId) -> bool {
        self.queue.contains(id)
    }

    pub fn stats(&self) -> LobbyStats {
        LobbyStats {
            connections: self.registry.len(),
            waiting: self.queue.len(),
            sessions: self.sessions.len(),
        }
    }

    /// セッション・キュー・Registry から接続を取り除く。冪等。
    fn remove_connection(
        &mut self,
        id: &ConnectionId,
        now: Timestamp,
        reason: &str,
    ) -> Vec<Notification> {
        let mut notifications = Vec::new();

        let Some(connection) = self.registry.get(id) else {
            tracing::debug!("Connection '{}' already removed", id);
            return notifications;
        };
        let leaving_name = connection.display_name.clone();

        let peer = self.teardown_session(id);
        self.queue.remove(id);
        self.registry.remove(id);
        tracing::info!("Connection '{}' {} and removed from registry", id, reason);

        if let Some(peer) = peer {
            notifications.push(Notification::new(
                peer.clone(),
                ServerEvent::PartnerDisconnected {
                    partner: leaving_name,
                },
            ));
            self.enqueue(&peer);
            self.match_waiting(now, &mut notifications);
        }

        notifications
    }

    /// 接続が属するセッションを解体し、両メンバーを WAITING に戻す。相手の ID を返す。
    fn teardown_session(&mut self, id: &ConnectionId) -> Option<ConnectionId> {
        let session_id = self.registry.get(id)?.session_id.clone()?;
        let session = self.sessions.remove(&session_id)?;

        for member in [&session.member_a, &session.member_b] {
            if let Some(connection) = self.registry.get_mut(member) {
                connection.unpair();
            }
        }
        tracing::info!(
            "Session '{}' between '{}' and '{}' closed",
            session.id,
            session.member_a,
            session.member_b
        );

        session.partner_of(id).cloned()
    }

    /// WAITING の接続だけをキューに並べる
    fn enqueue(&mut self, id: &ConnectionId) {
        match self.registry.get(id) {
            Some(connection) if connection.state == ConnectionState::Waiting => {}
            Some(connection) => {
                tracing::warn!(
                    "Refusing to enqueue connection '{}' in state {:?}",
                    id,
                    connection.state
                );
                return;
            }
            None => return,
        }

        if let Err(e) = self.queue.enqueue(id.clone()) {
            tracing::warn!("{}", e);
        }
    }

    fn match_waiting(&mut self, now: Timestamp, notifications: &mut Vec<Notification>) {
        while let Some((first, second)) = self.queue.try_match() {
            if let Err(e) = self.pair(&first, &second, now, notifications) {
                tracing::error!("Failed to pair '{}' with '{}': {}", first, second, e);
                // 登録が残っている方は WAITING のままなので全員キューに戻す。
                // 同じ組を即座に再試行しないよう、このラウンドは打ち切る
                for id in [first, second] {
                    self.enqueue(&id);
                }
                break;
            }
        }
    }

    fn pair(
        &mut self,
        first: &ConnectionId,
        second: &ConnectionId,
        now: Timestamp,
        notifications: &mut Vec<Notification>,
    ) -> Result<(), DomainError> {
        let first_name = self
            .registry
            .display_name(first)
            .cloned()
            .ok_or_else(|| DomainError::ConnectionNotFound(first.as_str().to_string()))?;
        let second_name = self
            .registry
            .display_name(second)
            .cloned()
            .ok_or_else(|| DomainError::ConnectionNotFound(second.as_str().to_string()))?;
        let session = Session::new(
            SessionIdFactory::generate(),
            first.clone(),
            second.clone(),
            now,
        )?;

        for member in [first, second] {
            if let Some(connection) = self.registry.get_mut(member) {
                connection.pair(session.id.clone());
            }
        }
        tracing::info!(
            "Session '{}' created: '{}' ({}) <-> '{}' ({})",
            session.id,
            first,
            first_name,
            second,
            second_name
        );
        self.sessions.insert(session.id.clone(), session);

        for (to, partner) in [(first, second_name), (second, first_name)] {
            notifications.push(Notification::new(
                to.clone(),
                ServerEvent::PartnerConnected {
                    partner: partner.clone(),
                },
            ));
            notifications.push(Notification::new(
                to.clone(),
                ServerEvent::Users {
                    users: vec![partner],
                },
            ));
        }

        Ok(())
    }

    fn notify_if_waiting(&self, id: &ConnectionId, notifications: &mut Vec<Notification>) {
        if self
            .registry
            .get(id)
            .is_some_and(|connection| connection.state == ConnectionState::Waiting)
        {
            notifications.push(Notification::new(id.clone(), ServerEvent::Waiting));
        }
    }

    /// 状態全体の整合性を検査する
    #[cfg(test)]
    pub(crate) fn check_invariants(&self) -> Result<(), String> {
        use std::collections::HashSet;

        let mut seen_members = HashSet::new();
        for (session_id, session) in &self.sessions {
            if &session.id != session_id {
                return Err(format!("session '{}' stored under wrong key", session.id));
            }
            if session.member_a == session.member_b {
                return Err(format!("session '{}' pairs a connection with itself", session.id));
            }
            for member in [&session.member_a, &session.member_b] {
                if !seen_members.insert(member.clone()) {
                    return Err(format!("'{}' belongs to more than one session", member));
                }
                let connection = self
                    .registry
                    .get(member)
                    .ok_or_else(|| format!("session member '{}' is not registered", member))?;
                if connection.session_id.as_ref() != Some(&session.id) || !connection.is_paired() {
                    return Err(format!("'{}' is not marked as paired in '{}'", member, session.id));
                }
            }
        }

        for connection in self.registry.iter() {
            let paired = connection.state == ConnectionState::Paired;
            if paired != connection.session_id.is_some() {
                return Err(format!("'{}' has inconsistent session id", connection.id));
            }
            if paired && !seen_members.contains(&connection.id) {
                return Err(format!("'{}' is paired without a session", connection.id));
            }
            if paired && self.queue.contains(&connection.id) {
                return Err(format!("'{}' is both queued and paired", connection.id));
            }
        }

        for id in self.queue.iter() {
            match self.registry.get(id) {
                Some(connection) if connection.state == ConnectionState::Waiting => {}
                Some(connection) => {
                    return Err(format!("'{}' is queued in state {:?}", id, connection.state));
                }
                None => return Err(format!("'{}' is queued but not registered", id)),
            }
        }

        let waiting = self.registry.count_in_state(ConnectionState::Waiting);
        if waiting != self.queue.len() {
            return Err(format!(
                "{} connections waiting but {} queued",
                waiting,
                self.queue.len()
            ));
        }

        Ok(())
    }
}
