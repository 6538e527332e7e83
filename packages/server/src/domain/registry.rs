//! Connection Registry
//!
//! 生きている全接続とその一時的な属性（表示名・状態）を保持します。
//! 接続エンティティを所有するのはこの Registry だけで、
//! PairingQueue と SessionManager は `ConnectionId` で参照するだけです。

use std::collections::HashMap;

use super::{
    entity::{Connection, ConnectionState},
    error::DomainError,
    value_object::{ConnectionId, DisplayName, Timestamp},
};

#[derive(Debug, Default)]
pub struct ConnectionRegistry {
    connections: HashMap<ConnectionId, Connection>,
}

impl ConnectionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// 新しい接続を CONNECTING 状態で登録する
    pub fn admit(&mut self, id: ConnectionId, connected_at: Timestamp) -> Result<(), DomainError> {
        if self.connections.contains_key(&id) {
            return Err(DomainError::DuplicateConnection(id.into_string()));
        }
        self.connections
            .insert(id.clone(), Connection::new(id, connected_at));
        Ok(())
    }

    /// 表示名を記録する（重複は許容）
    pub fn set_name(&mut self, id: &ConnectionId, name: DisplayName) -> Result<(), DomainError> {
        let connection = self
            .connections
            .get_mut(id)
            .ok_or_else(|| DomainError::ConnectionNotFound(id.as_str().to_string()))?;
        connection.display_name = Some(name);
        Ok(())
    }

    /// 接続を取り除く。冪等で、2 回目以降は None を返す。
    pub fn remove(&mut self, id: &ConnectionId) -> Option<Connection> {
        self.connections.remove(id).map(|mut connection| {
            connection.close();
            connection
        })
    }

    pub fn get(&self, id: &ConnectionId) -> Option<&Connection> {
        self.connections.get(id)
    }

    pub fn get_mut(&mut self, id: &ConnectionId) -> Option<&mut Connection> {
        self.connections.get_mut(id)
    }

    pub fn display_name(&self, id: &ConnectionId) -> Option<&DisplayName> {
        self.connections
            .get(id)
            .and_then(|connection| connection.display_name.as_ref())
    }

    pub fn len(&self) -> usize {
        self.connections.len()
    }

    pub fn is_empty(&self) -> bool {
        self.connections.is_empty()
    }

    pub fn count_in_state(&self, state: ConnectionState) -> usize {
        self.connections
            .values()
            .filter(|connection| connection.state == state)
            .count()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Connection> {
        self.connections.values()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::value_object::ConnectionIdFactory;

    fn name(value: &str) -> DisplayName {
        DisplayName::try_from(value.to_string()).unwrap()
    }

    #[test]
    fn test_admit_registers_connecting_connection() {
        // テスト項目: admit した接続は CONNECTING 状態で取得できる
        // given (前提条件):
        let mut registry = ConnectionRegistry::new();
        let id = ConnectionIdFactory::generate();

        // when (操作):
        let result = registry.admit(id.clone(), Timestamp::new(1000));

        // then (期待する結果):
        assert!(result.is_ok());
        let connection = registry.get(&id).unwrap();
        assert_eq!(connection.state, ConnectionState::Connecting);
        assert_eq!(connection.connected_at, Timestamp::new(1000));
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_admit_rejects_duplicate_id() {
        // テスト項目: 同じ接続 ID は二重登録できない
        // given (前提条件):
        let mut registry = ConnectionRegistry::new();
        let id = ConnectionIdFactory::generate();
        registry.admit(id.clone(), Timestamp::new(0)).unwrap();

        // when (操作):
        let result = registry.admit(id.clone(), Timestamp::new(1));

        // then (期待する結果):
        assert_eq!(
            result,
            Err(DomainError::DuplicateConnection(id.as_str().to_string()))
        );
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_set_name_allows_duplicate_names() {
        // テスト項目: 同じ表示名の接続が独立して登録できる
        // given (前提条件):
        let mut registry = ConnectionRegistry::new();
        let first = ConnectionIdFactory::generate();
        let second = ConnectionIdFactory::generate();
        registry.admit(first.clone(), Timestamp::new(0)).unwrap();
        registry.admit(second.clone(), Timestamp::new(0)).unwrap();

        // when (操作):
        registry.set_name(&first, name("alice")).unwrap();
        registry.set_name(&second, name("alice")).unwrap();

        // then (期待する結果):
        assert_eq!(registry.display_name(&first), Some(&name("alice")));
        assert_eq!(registry.display_name(&second), Some(&name("alice")));
        assert_eq!(registry.len(), 2);
    }

    #[test]
    fn test_set_name_for_unknown_connection() {
        // テスト項目: 存在しない接続への名前設定はエラーになる
        // given (前提条件):
        let mut registry = ConnectionRegistry::new();
        let id = ConnectionIdFactory::generate();

        // when (操作):
        let result = registry.set_name(&id, name("ghost"));

        // then (期待する結果):
        assert!(matches!(result, Err(DomainError::ConnectionNotFound(_))));
    }

    #[test]
    fn test_remove_is_idempotent() {
        // テスト項目: remove は CLOSED の接続を返し、2 回目は何もしない
        // given (前提条件):
        let mut registry = ConnectionRegistry::new();
        let id = ConnectionIdFactory::generate();
        registry.admit(id.clone(), Timestamp::new(0)).unwrap();

        // when (操作):
        let first = registry.remove(&id);
        let second = registry.remove(&id);

        // then (期待する結果):
        assert_eq!(first.map(|c| c.state), Some(ConnectionState::Closed));
        assert!(second.is_none());
        assert!(registry.is_empty());
    }
}
