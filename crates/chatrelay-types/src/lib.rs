//! Shared domain types for chatrelay.
//!
//! Conversation turns, LLM request/response shapes, configuration, and the
//! error taxonomy shared by the core, infrastructure, and API crates.
//!
//! Zero infrastructure dependencies -- only serde, chrono, thiserror.

pub mod chat;
pub mod config;
pub mod error;
pub mod llm;
