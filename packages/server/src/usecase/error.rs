//! UseCase 層のエラー定義

use thiserror::Error;

use crate::domain::DomainError;

/// Lobby への要求が失敗した理由
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LobbyError {
    /// Lobby のタスクが停止している
    #[error("Lobby is not running")]
    Unavailable,

    #[error(transparent)]
    Domain(#[from] DomainError),
}

/// 受信フレームを処理できなかった理由
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RouteError {
    /// JSON として読めない、`type` が無い・未知、必須フィールドが不正
    #[error("Malformed frame: {0}")]
    MalformedFrame(String),

    #[error(transparent)]
    Lobby(#[from] LobbyError),
}
