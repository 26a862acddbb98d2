//! Conversation, turn, and actor-surface types for chatrelay.
//!
//! A conversation is an ordered log of [`Turn`]s keyed by an opaque
//! [`ConversationId`]. The request/response shapes at the bottom of this
//! module are the wire contract of a single conversation actor.

use chrono::{DateTime, SubsecRound, Utc};
use serde::{Deserialize, Serialize};

use std::fmt;
use std::str::FromStr;

use crate::llm::{Message, MessageRole};

/// Opaque name of one chat session.
///
/// The partition key for the durable log and the unit of concurrency
/// isolation. Any string is accepted; no normalization is applied.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ConversationId(pub String);

impl ConversationId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ConversationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<String> for ConversationId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for ConversationId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

/// Author of a turn. System-style roles never enter a conversation log.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TurnRole {
    User,
    Assistant,
}

impl fmt::Display for TurnRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TurnRole::User => write!(f, "user"),
            TurnRole::Assistant => write!(f, "assistant"),
        }
    }
}

impl FromStr for TurnRole {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "user" => Ok(TurnRole::User),
            "assistant" => Ok(TurnRole::Assistant),
            other => Err(format!("invalid turn role: '{other}'")),
        }
    }
}

impl From<TurnRole> for MessageRole {
    fn from(role: TurnRole) -> Self {
        match role {
            TurnRole::User => MessageRole::User,
            TurnRole::Assistant => MessageRole::Assistant,
        }
    }
}

/// One role-tagged entry in a conversation log.
///
/// `timestamp` is display metadata only; log position is the authoritative
/// order. It serializes as Unix epoch milliseconds.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Turn {
    pub role: TurnRole,
    pub content: String,
    #[serde(with = "chrono::serde::ts_milliseconds")]
    pub timestamp: DateTime<Utc>,
}

impl Turn {
    /// Build a turn stamped with the current time.
    ///
    /// The timestamp is truncated to millisecond precision so a turn compares
    /// equal to itself after a trip through the durable store.
    pub fn new(role: TurnRole, content: impl Into<String>) -> Self {
        Self {
            role,
            content: content.into(),
            timestamp: Utc::now().trunc_subsecs(3),
        }
    }

    /// Strip the timestamp, producing the `{role, content}` pair sent to inference.
    pub fn to_message(&self) -> Message {
        Message {
            role: self.role.into(),
            content: self.content.clone(),
        }
    }
}

// ---------------------------------------------------------------------------
// Actor surface
// ---------------------------------------------------------------------------

/// Body of an append request against a conversation actor.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppendMessage {
    pub role: TurnRole,
    pub content: String,
}

/// `list` response: the full log in order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ListMessagesResponse {
    pub messages: Vec<Turn>,
}

/// `append` response: the turn exactly as it was persisted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AppendMessageResponse {
    pub success: bool,
    pub message: Turn,
}

/// `clear` response.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClearResponse {
    pub success: bool,
}
