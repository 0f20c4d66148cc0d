//! Generated image models and DTOs for the `generated_images` table.

use identikit_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A row from the `generated_images` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct GeneratedImage {
    pub id: DbId,
    pub case_id: DbId,
    pub attributes_id: Option<DbId>,
    pub image_url: String,
    pub generation_status: String,
    /// `{ model, totalImages, featureLocks, featureConfidence }`.
    pub generation_metadata: serde_json::Value,
    pub created_at: Timestamp,
}

/// DTO for recording the representative image of a batch.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateGeneratedImage {
    pub case_id: DbId,
    pub attributes_id: Option<DbId>,
    pub image_url: String,
    pub generation_status: String,
    pub generation_metadata: serde_json::Value,
}
