//! Axum router configuration with middleware.
//!
//! Middleware: CORS (any origin; GET, POST, OPTIONS; Content-Type) and
//! request tracing.

use axum::Router;
use axum::http::{Method, StatusCode, header};
use axum::routing::{any, get, post};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::http::handlers;
use crate::state::AppState;

/// Build the complete router with all routes and middleware.
pub fn build_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE]);

    let api_routes = Router::new()
        .route("/chat", post(handlers::chat::chat))
        .route("/history", post(handlers::chat::history))
        .route("/clear", post(handlers::chat::clear))
        .route(
            "/conversations/{id}/{*operation}",
            any(handlers::conversation::dispatch),
        );

    Router::new()
        .route("/", get(handlers::page::index))
        .route("/index.html", get(handlers::page::index))
        .route("/health", get(health_check))
        .nest("/api", api_routes)
        .fallback(not_found)
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// GET /health - liveness probe.
async fn health_check() -> axum::Json<serde_json::Value> {
    axum::Json(serde_json::json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}

async fn not_found() -> (StatusCode, &'static str) {
    (StatusCode::NOT_FOUND, "Not Found")
}
