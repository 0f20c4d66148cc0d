//! Domain errors shared by every crate in the workspace.
//!
//! HTTP status mapping lives in the API crate; nothing here knows about HTTP.

use crate::types::DbId;

#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    /// A case, snapshot or image that does not exist (or is not the caller's).
    #[error("Entity not found: {entity} with id {id}")]
    NotFound { entity: &'static str, id: DbId },

    /// Malformed attribute values, out-of-range coordinates or confidence.
    #[error("Validation failed: {0}")]
    Validation(String),

    /// A generation batch is already running for the case.
    #[error("Conflict: {0}")]
    Conflict(String),

    /// Missing, malformed or expired access token.
    #[error("Unauthorized: {0}")]
    Unauthorized(String),
}

impl CoreError {
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }
}
