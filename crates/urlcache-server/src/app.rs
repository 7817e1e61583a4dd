//! Router assembly: the fetch page plus static serving of the cache root.

use crate::handlers::{self, AppState};
use axum::routing::get;
use axum::Router;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

pub fn router(state: AppState) -> Router {
    let serve_cache = ServeDir::new(state.orchestrator.cache_root());
    Router::new()
        .route("/", get(handlers::fetch_page))
        .nest_service("/cache", serve_cache)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
