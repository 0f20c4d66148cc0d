//! Route definitions for the `/cases` resource.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::{cases, report};
use crate::state::AppState;

/// Routes mounted at `/cases`.
///
/// ```text
/// GET    /                         -> list
/// POST   /                         -> create
/// GET    /{id}                     -> get_by_id
/// POST   /{id}/attributes          -> create_attributes
/// GET    /{id}/attributes/latest   -> latest_attributes
/// GET    /{id}/images              -> list_images
/// GET    /{id}/report              -> get_report
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(cases::list).post(cases::create))
        .route("/{id}", get(cases::get_by_id))
        .route("/{id}/attributes", post(cases::create_attributes))
        .route("/{id}/attributes/latest", get(cases::latest_attributes))
        .route("/{id}/images", get(cases::list_images))
        .route("/{id}/report", get(report::get_report))
}
