//! Thunder Chat server
//!
//! Pairs anonymous clients one-to-one over WebSocket and relays chat frames
//! between the two members of each session.

pub mod domain;
pub mod infrastructure;
pub mod ui;
pub mod usecase;
