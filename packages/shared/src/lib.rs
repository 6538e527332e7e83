//! Utilities shared by the Thunder Chat server and client binaries.

pub mod logger;
pub mod time;
