//! UseCase layer
//!
//! - `lobby`: Session Manager を排他的に所有するアクターと、そのハンドル
//! - `router`: 受信フレームの解釈・検証と Lobby への振り分け

pub mod error;
pub mod lobby;
pub mod router;

pub use error::{LobbyError, RouteError};
pub use lobby::{LobbyHandle, LobbyService};
pub use router::{FrameLimits, MessageRouter, RouteOutcome};
