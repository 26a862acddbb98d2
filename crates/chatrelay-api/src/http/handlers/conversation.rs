//! Direct access to one conversation actor.
//!
//! - GET  /api/conversations/{id}/messages - list
//! - POST /api/conversations/{id}/messages - append `{ role, content }`
//! - POST /api/conversations/{id}/clear    - clear
//!
//! Any other method/operation pair is 404.

use axum::Json;
use axum::body::Bytes;
use axum::extract::{Path, State};
use axum::http::Method;

use chatrelay_core::conversation::request::{ConversationRequest, ConversationResponse};
use chatrelay_types::chat::ConversationId;

use crate::http::error::AppError;
use crate::state::AppState;

/// GET|POST /api/conversations/{id}/{*operation}
pub async fn dispatch(
    State(state): State<AppState>,
    method: Method,
    Path((id, operation)): Path<(String, String)>,
    body: Bytes,
) -> Result<Json<ConversationResponse>, AppError> {
    let request = ConversationRequest::route(method.as_str(), &operation, Some(body.as_ref()))?;

    let actor = state
        .orchestrator
        .registry()
        .get_or_create(&ConversationId::from(id));
    let response = actor.handle(request).await?;
    Ok(Json(response))
}
