//! Request-level orchestration behind the chat and inference routes.

pub mod chat;
pub mod inference;
