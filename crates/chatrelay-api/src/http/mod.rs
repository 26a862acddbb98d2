//! HTTP layer for chatrelay.
//!
//! Axum routes for the chat page, the chat/history/clear JSON API, and direct
//! access to a conversation actor's surface.

pub mod error;
pub mod handlers;
pub mod router;
