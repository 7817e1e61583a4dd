//! The one endpoint: `GET /` with an optional `user_input` query parameter.

use crate::render::{self, PageView};
use axum::extract::{Query, State};
use axum::response::Html;
use serde::Deserialize;
use std::sync::Arc;
use urlcache_core::orchestrator::Orchestrator;
use urlcache_core::validate;

/// Read-only per-process state; requests share nothing mutable.
#[derive(Clone)]
pub struct AppState {
    pub orchestrator: Arc<Orchestrator>,
    /// Operator opt-in to show worker diagnostics on result pages.
    pub expose_worker_output: bool,
}

#[derive(Debug, Deserialize)]
pub struct FetchParams {
    pub user_input: Option<String>,
}

/// Renders the form, or runs the fetch pipeline when `user_input` is present.
///
/// Every outcome is a 200 HTML page; caching failures are per-request and
/// never touch other requests or the process.
pub async fn fetch_page(
    State(state): State<AppState>,
    Query(params): Query<FetchParams>,
) -> Html<String> {
    let Some(raw) = params.user_input else {
        return Html(render::page(&PageView::Form, None));
    };

    let url = match validate::validate(&raw) {
        Ok(url) => url,
        Err(err) => {
            tracing::debug!(input = %raw, %err, "rejected user input");
            return Html(render::page(&PageView::Invalid, None));
        }
    };

    match state.orchestrator.fetch_and_cache(&url).await {
        Ok(fetched) => {
            let view = PageView::Ready {
                href: format!("/cache/{}", fetched.artifact.public_path),
            };
            let transcript = state
                .expose_worker_output
                .then_some(fetched.transcript.as_str());
            Html(render::page(&view, transcript))
        }
        Err(err) => {
            tracing::warn!(url = %url.as_str(), error = %err, "caching failed");
            let transcript = if state.expose_worker_output {
                err.transcript()
            } else {
                None
            };
            Html(render::page(&PageView::Failed, transcript))
        }
    }
}
