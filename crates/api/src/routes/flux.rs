//! Route definitions for the upstream proxy endpoints.
//!
//! All routes are mounted under `/flux`.

use axum::routing::post;
use axum::Router;

use crate::handlers::flux;
use crate::state::AppState;

/// Upstream proxy routes mounted at `/flux`.
///
/// ```text
/// POST /generate -> generate
/// POST /poll     -> poll
/// POST /download -> download
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/generate", post(flux::generate))
        .route("/poll", post(flux::poll))
        .route("/download", post(flux::download))
}
