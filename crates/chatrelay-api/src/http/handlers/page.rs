//! Embedded single-page chat UI.
//!
//! - GET /           - Chat page
//! - GET /index.html - Chat page

use axum::response::Html;

const INDEX_HTML: &str = include_str!("../../../web/index.html");

/// GET / and GET /index.html - serve the chat page.
pub async fn index() -> Html<&'static str> {
    Html(INDEX_HTML)
}
