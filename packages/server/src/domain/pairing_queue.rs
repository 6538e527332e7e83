//! Pairing Queue
//!
//! 相手を待っている接続を到着順（FIFO）に保持します。
//! `try_match` による先頭 2 件の取り出しが、同じ接続を二重にマッチさせないための唯一の直列化点です。

use std::collections::{HashSet, VecDeque};

use super::{error::DomainError, value_object::ConnectionId};

#[derive(Debug, Default)]
pub struct PairingQueue {
    entries: VecDeque<ConnectionId>,
    members: HashSet<ConnectionId>,
}

impl PairingQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// 末尾に追加する。既に並んでいる接続は追加しない。
    pub fn enqueue(&mut self, id: ConnectionId) -> Result<(), DomainError> {
        if !self.members.insert(id.clone()) {
            return Err(DomainError::AlreadyQueued(id.into_string()));
        }
        self.entries.push_back(id);
        Ok(())
    }

    /// 先頭の 2 件を取り出す。2 件未満なら何もしない。
    pub fn try_match(&mut self) -> Option<(ConnectionId, ConnectionId)> {
        if self.entries.len() < 2 {
            return None;
        }
        let first = self.entries.pop_front()?;
        let second = self.entries.pop_front()?;
        self.members.remove(&first);
        self.members.remove(&second);
        Some((first, second))
    }

    /// 特定の接続を取り除く（マッチ前に切断した場合など）
    pub fn remove(&mut self, id: &ConnectionId) -> bool {
        if !self.members.remove(id) {
            return false;
        }
        self.entries.retain(|entry| entry != id);
        true
    }

    pub fn contains(&self, id: &ConnectionId) -> bool {
        self.members.contains(id)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &ConnectionId> {
        self.entries.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::value_object::ConnectionIdFactory;

    fn ids(count: usize) -> Vec<ConnectionId> {
        (0..count).map(|_| ConnectionIdFactory::generate()).collect()
    }

    #[test]
    fn test_try_match_is_fifo() {
        // テスト項目: C1, C2, C3, C4 の順に並ぶと (C1, C2) → (C3, C4) の順でマッチする
        // given (前提条件):
        let mut queue = PairingQueue::new();
        let c = ids(4);
        for id in &c {
            queue.enqueue(id.clone()).unwrap();
        }

        // when (操作):
        let first = queue.try_match();
        let second = queue.try_match();
        let third = queue.try_match();

        // then (期待する結果):
        assert_eq!(first, Some((c[0].clone(), c[1].clone())));
        assert_eq!(second, Some((c[2].clone(), c[3].clone())));
        assert_eq!(third, None);
        assert!(queue.is_empty());
    }

    #[test]
    fn test_single_entry_never_matches() {
        // テスト項目: 1 件だけでは何度試してもマッチしない
        // given (前提条件):
        let mut queue = PairingQueue::new();
        let id = ConnectionIdFactory::generate();
        queue.enqueue(id.clone()).unwrap();

        // when (操作):
        let result = queue.try_match();

        // then (期待する結果):
        assert_eq!(result, None);
        assert!(queue.contains(&id));
        assert_eq!(queue.len(), 1);
    }

    #[test]
    fn test_enqueue_twice_is_rejected() {
        // テスト項目: 同じ接続は 2 回並べない
        // given (前提条件):
        let mut queue = PairingQueue::new();
        let id = ConnectionIdFactory::generate();
        queue.enqueue(id.clone()).unwrap();

        // when (操作):
        let result = queue.enqueue(id.clone());

        // then (期待する結果):
        assert_eq!(result, Err(DomainError::AlreadyQueued(id.as_str().to_string())));
        assert_eq!(queue.len(), 1);
    }

    #[test]
    fn test_remove_keeps_order_of_others() {
        // テスト項目: 途中の接続を取り除いても残りの順序は保たれる
        // given (前提条件):
        let mut queue = PairingQueue::new();
        let c = ids(3);
        for id in &c {
            queue.enqueue(id.clone()).unwrap();
        }

        // when (操作):
        let removed = queue.remove(&c[0]);
        let removed_again = queue.remove(&c[0]);

        // then (期待する結果):
        assert!(removed);
        assert!(!removed_again);
        assert_eq!(queue.try_match(), Some((c[1].clone(), c[2].clone())));
    }

    #[test]
    fn test_requeue_after_match() {
        // テスト項目: マッチで取り出された接続は再び並べる
        // given (前提条件):
        let mut queue = PairingQueue::new();
        let c = ids(2);
        queue.enqueue(c[0].clone()).unwrap();
        queue.enqueue(c[1].clone()).unwrap();
        queue.try_match().unwrap();

        // when (操作):
        let result = queue.enqueue(c[0].clone());

        // then (期待する結果):
        assert!(result.is_ok());
        assert!(queue.contains(&c[0]));
        assert!(!queue.contains(&c[1]));
    }
}
