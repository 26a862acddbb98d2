//! Application error type mapping to HTTP status codes.
//!
//! Every error body has the shape `{ "error": <status text>, "details": <message> }`.

use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;

use chatrelay_types::error::{ChatError, ConversationError};

/// Application-level error that maps to HTTP responses.
#[derive(Debug)]
pub enum AppError {
    /// Errors from the orchestrator or a conversation actor.
    Chat(ChatError),
}

impl From<ChatError> for AppError {
    fn from(e: ChatError) -> Self {
        AppError::Chat(e)
    }
}

impl From<ConversationError> for AppError {
    fn from(e: ConversationError) -> Self {
        AppError::Chat(e.into())
    }
}

impl From<JsonRejection> for AppError {
    fn from(e: JsonRejection) -> Self {
        AppError::Chat(ChatError::MalformedRequest(e.body_text()))
    }
}

impl AppError {
    fn status(&self) -> StatusCode {
        match self {
            AppError::Chat(ChatError::Conversation(ConversationError::NotFound(_))) => {
                StatusCode::NOT_FOUND
            }
            AppError::Chat(ChatError::MalformedRequest(_)) => StatusCode::BAD_REQUEST,
            AppError::Chat(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        let AppError::Chat(e) = &self;
        let details = e.to_string();

        if status.is_server_error() {
            tracing::error!(%status, error = %details, "Request failed");
        } else {
            tracing::debug!(%status, error = %details, "Request rejected");
        }

        let body = json!({
            "error": status.canonical_reason().unwrap_or("Error"),
            "details": details,
        });

        (status, axum::Json(body)).into_response()
    }
}
