//! Route definitions for the shared feature schema.

use axum::routing::get;
use axum::Router;

use crate::handlers::schema;
use crate::state::AppState;

/// ```text
/// GET    /attribute-schema         -> get_schema
/// ```
pub fn router() -> Router<AppState> {
    Router::new().route("/attribute-schema", get(schema::get_schema))
}
