//! Business logic and port trait definitions for chatrelay.
//!
//! This crate owns the conversation actor model (message log, per-identity
//! actors, the identity registry) and the chat orchestrator. It defines the
//! "ports" (`ConversationStore`, `LlmProvider`) that the infrastructure layer
//! implements, and depends only on `chatrelay-types` -- never on
//! `chatrelay-infra` or any database/IO crate.

pub mod chat;
pub mod conversation;
pub mod llm;
