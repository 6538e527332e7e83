//! ドメイン層のエラー型

use thiserror::Error;

/// Value Object の生成時に発生するエラー
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValueObjectError {
    #[error("Connection ID must not be empty")]
    EmptyConnectionId,

    #[error("Display name must not be empty")]
    EmptyDisplayName,

    #[error("Message content must not be empty")]
    EmptyMessageContent,

    #[error("Message content exceeds {max} characters")]
    MessageContentTooLong { max: usize },
}

/// 集約（Registry / PairingQueue / Session）の不変条件違反
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DomainError {
    #[error("Connection '{0}' is already registered")]
    DuplicateConnection(String),

    #[error("Connection '{0}' not found")]
    ConnectionNotFound(String),

    #[error("Connection '{0}' is already waiting in the pairing queue")]
    AlreadyQueued(String),

    #[error("Connection '{0}' cannot be paired with itself")]
    SelfPairing(String),
}

/// MessagePusher のエラー
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MessagePushError {
    #[error("Client '{0}' not found")]
    ClientNotFound(String),

    #[error("Failed to push message: {0}")]
    PushFailed(String),
}
