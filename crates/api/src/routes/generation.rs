//! Route definitions for portrait generation.

use axum::routing::post;
use axum::Router;

use crate::handlers::generation;
use crate::state::AppState;

/// ```text
/// POST   /generate                 -> generate
/// ```
pub fn router() -> Router<AppState> {
    Router::new().route("/generate", post(generation::generate))
}
