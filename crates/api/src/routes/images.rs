//! Route definitions for the image persistence endpoints.
//!
//! All routes are mounted under `/images`.

use axum::routing::{delete, get, post};
use axum::Router;

use crate::handlers::images;
use crate::state::AppState;

/// Image persistence routes mounted at `/images`.
///
/// ```text
/// POST   /store  -> store
/// GET    /list   -> list
/// DELETE /delete -> delete
/// DELETE /clear  -> clear
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/store", post(images::store))
        .route("/list", get(images::list))
        .route("/delete", delete(images::delete))
        .route("/clear", delete(images::clear))
}
