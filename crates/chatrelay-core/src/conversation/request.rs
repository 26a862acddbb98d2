//! Request/response contract of a conversation actor.
//!
//! The actor surface is addressed by method + operation path, mirroring a
//! tiny REST resource:
//!
//! | Method | Operation   | Request                 |
//! |--------|-------------|-------------------------|
//! | GET    | `messages`  | [`ConversationRequest::ListMessages`]  |
//! | POST   | `messages`  | [`ConversationRequest::AppendMessage`] |
//! | POST   | `clear`     | [`ConversationRequest::Clear`]         |
//!
//! Anything else is `NotFound`; there is no partial or prefix matching.

use chatrelay_types::chat::{
    AppendMessage, AppendMessageResponse, ClearResponse, ListMessagesResponse,
};
use chatrelay_types::error::{ChatError, ConversationError};
use serde::Serialize;

/// One operation against a conversation actor.
#[derive(Debug, Clone)]
pub enum ConversationRequest {
    ListMessages,
    AppendMessage(AppendMessage),
    Clear,
}

impl ConversationRequest {
    /// Resolve a method/operation pair (plus optional JSON body) to a request.
    ///
    /// The operation may carry a leading `/`. Unknown combinations fail with
    /// [`ConversationError::NotFound`]; an append with a missing or invalid
    /// body fails with [`ChatError::MalformedRequest`].
    pub fn route(
        method: &str,
        operation: &str,
        body: Option<&[u8]>,
    ) -> Result<Self, ChatError> {
        let op = operation.trim_start_matches('/');
        let method = method.to_ascii_uppercase();

        match (method.as_str(), op) {
            ("GET", "messages") => Ok(ConversationRequest::ListMessages),
            ("POST", "messages") => {
                let bytes = body
                    .filter(|b| !b.is_empty())
                    .ok_or_else(|| ChatError::MalformedRequest("missing request body".into()))?;
                let append: AppendMessage = serde_json::from_slice(bytes)
                    .map_err(|e| ChatError::MalformedRequest(e.to_string()))?;
                Ok(ConversationRequest::AppendMessage(append))
            }
            ("POST", "clear") => Ok(ConversationRequest::Clear),
            _ => Err(ConversationError::NotFound(format!("{method} /{op}")).into()),
        }
    }
}

/// Response to a [`ConversationRequest`], serialized as the bare wire shape.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum ConversationResponse {
    List(ListMessagesResponse),
    Append(AppendMessageResponse),
    Clear(ClearResponse),
}

#[cfg(test)]
mod tests {
    use super::*;
    use chatrelay_types::chat::TurnRole;

    #[test]
    fn test_route_known_operations() {
        assert!(matches!(
            ConversationRequest::route("GET", "/messages", None).unwrap(),
            ConversationRequest::ListMessages
        ));
        assert!(matches!(
            ConversationRequest::route("post", "clear", None).unwrap(),
            ConversationRequest::Clear
        ));

        let body = br#"{"role":"user","content":"hi"}"#;
        match ConversationRequest::route("POST", "messages", Some(body)).unwrap() {
            ConversationRequest::AppendMessage(m) => {
                assert_eq!(m.role, TurnRole::User);
                assert_eq!(m.content, "hi");
            }
            other => panic!("unexpected request: {other:?}"),
        }
    }

    #[test]
    fn test_route_unknown_is_not_found() {
        for (method, op) in [
            ("GET", "clear"),
            ("DELETE", "messages"),
            ("GET", "messages/1"),
            ("GET", "message"),
            ("PUT", "clear"),
        ] {
            let err = ConversationRequest::route(method, op, None).unwrap_err();
            assert!(
                matches!(err, ChatError::Conversation(ConversationError::NotFound(_))),
                "{method} {op} should be NotFound, got {err:?}"
            );
        }
    }

    #[test]
    fn test_route_append_requires_valid_body() {
        let missing = ConversationRequest::route("POST", "messages", None).unwrap_err();
        assert!(matches!(missing, ChatError::MalformedRequest(_)));

        let bad_role = ConversationRequest::route(
            "POST",
            "messages",
            Some(br#"{"role":"narrator","content":"x"}"#),
        )
        .unwrap_err();
        assert!(matches!(bad_role, ChatError::MalformedRequest(_)));

        let no_content =
            ConversationRequest::route("POST", "messages", Some(br#"{"role":"user"}"#))
                .unwrap_err();
        assert!(matches!(no_content, ChatError::MalformedRequest(_)));
    }

    #[test]
    fn test_response_serializes_bare_shape() {
        let json = serde_json::to_value(ConversationResponse::Clear(ClearResponse {
            success: true,
        }))
        .unwrap();
        assert_eq!(json, serde_json::json!({"success": true}));

        let json = serde_json::to_value(ConversationResponse::List(ListMessagesResponse {
            messages: vec![],
        }))
        .unwrap();
        assert_eq!(json, serde_json::json!({"messages": []}));
    }
}
