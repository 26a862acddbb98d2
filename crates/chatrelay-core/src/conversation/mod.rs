//! Conversation actor model.
//!
//! - [`log::MessageLog`]: the ordered turn sequence of one conversation
//! - [`actor::ConversationActor`]: single-writer owner of one log
//! - [`registry::ConversationRegistry`]: identity -> actor resolution
//! - [`store::ConversationStore`]: port for the durable backing copy

pub mod actor;
pub mod log;
pub mod memory;
pub mod registry;
pub mod request;
pub mod store;
