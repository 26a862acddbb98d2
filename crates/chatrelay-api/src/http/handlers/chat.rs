//! Chat JSON API consumed by the embedded page.
//!
//! Endpoints:
//! - POST /api/chat    - `{ message, conversationId }` -> `{ response, conversationId }`
//! - POST /api/history - `{ conversationId }` -> `{ messages }`
//! - POST /api/clear   - `{ conversationId }` -> `{ success: true }`

use axum::Json;
use axum::extract::State;
use axum::extract::rejection::JsonRejection;
use serde::Deserialize;

use chatrelay_core::chat::orchestrator::ChatReply;
use chatrelay_types::chat::{ClearResponse, ConversationId, ListMessagesResponse};

use crate::http::error::AppError;
use crate::state::AppState;

/// Body of `POST /api/chat`.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatRequest {
    pub message: String,
    pub conversation_id: ConversationId,
}

/// Body of `POST /api/history` and `POST /api/clear`.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConversationRef {
    pub conversation_id: ConversationId,
}

/// POST /api/chat - run one exchange.
pub async fn chat(
    State(state): State<AppState>,
    body: Result<Json<ChatRequest>, JsonRejection>,
) -> Result<Json<ChatReply>, AppError> {
    let Json(req) = body?;
    let reply = state
        .orchestrator
        .chat(&req.conversation_id, &req.message)
        .await?;
    Ok(Json(reply))
}

/// POST /api/history - full stored log.
pub async fn history(
    State(state): State<AppState>,
    body: Result<Json<ConversationRef>, JsonRejection>,
) -> Result<Json<ListMessagesResponse>, AppError> {
    let Json(req) = body?;
    let messages = state.orchestrator.history(&req.conversation_id).await?;
    Ok(Json(ListMessagesResponse { messages }))
}

/// POST /api/clear - empty the log.
pub async fn clear(
    State(state): State<AppState>,
    body: Result<Json<ConversationRef>, JsonRejection>,
) -> Result<Json<ClearResponse>, AppError> {
    let Json(req) = body?;
    state.orchestrator.clear(&req.conversation_id).await?;
    Ok(Json(ClearResponse { success: true }))
}
