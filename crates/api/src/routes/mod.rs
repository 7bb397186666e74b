pub mod flux;
pub mod health;
pub mod images;

use axum::routing::post;
use axum::Router;

use crate::handlers;
use crate::state::AppState;

/// Build the `/api` route tree.
///
/// ```text
/// /flux/generate      POST    proxy job submission upstream
/// /flux/poll          POST    proxy a status poll upstream
/// /flux/download      POST    proxy-download an external asset
///
/// /images/store       POST    persist an image + metadata
/// /images/list        GET     list stored images, newest first
/// /images/delete      DELETE  remove one image
/// /images/clear       DELETE  remove every image
///
/// /generate           POST    one-shot generate-and-persist
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .nest("/flux", flux::router())
        .nest("/images", images::router())
        .route("/generate", post(handlers::generation::run_generation))
}
