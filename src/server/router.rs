use axum::routing::{get, post};
use axum::Router;
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::server::handlers;
use crate::DocRag;

/// Routes for the RAG service. Any origin may call them.
pub fn router(app: Arc<DocRag>) -> Router {
    Router::new()
        .route("/health", get(handlers::health))
        .route("/api/insert", post(handlers::insert))
        .route("/api/find", get(handlers::find))
        .with_state(app)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
}
