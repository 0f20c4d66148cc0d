pub mod cases;
pub mod generation;
pub mod health;
pub mod schema;

use axum::Router;

use crate::state::AppState;

/// Build the `/api/v1` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /attribute-schema                                 feature schema (public)
///
/// /cases                                            list, create
/// /cases/{id}                                       get
/// /cases/{id}/attributes                            append snapshot (POST)
/// /cases/{id}/attributes/latest                     latest snapshot (GET)
/// /cases/{id}/images                                generated images (GET)
/// /cases/{id}/report                                case report (GET)
///
/// /generate                                         run a generation batch (POST)
/// ```
///
/// Everything except `/attribute-schema` requires a Bearer token.
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .merge(schema::router())
        .nest("/cases", cases::router())
        .merge(generation::router())
}
