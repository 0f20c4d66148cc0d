//! Repository for the `generated_images` table.

use identikit_core::types::DbId;
use sqlx::PgPool;

use crate::models::generated_image::{CreateGeneratedImage, GeneratedImage};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str =
    "id, case_id, attributes_id, image_url, generation_status, generation_metadata, created_at";

/// Append-only access to generated image records.
pub struct GeneratedImageRepo;

impl GeneratedImageRepo {
    /// Insert a generated image record, returning the created row.
    pub async fn create(
        pool: &PgPool,
        input: &CreateGeneratedImage,
    ) -> Result<GeneratedImage, sqlx::Error> {
        let query = format!(
            "INSERT INTO generated_images
                (case_id, attributes_id, image_url, generation_status, generation_metadata)
             VALUES ($1, $2, $3, $4, $5)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, GeneratedImage>(&query)
            .bind(input.case_id)
            .bind(input.attributes_id)
            .bind(&input.image_url)
            .bind(&input.generation_status)
            .bind(&input.generation_metadata)
            .fetch_one(pool)
            .await
    }

    /// List images for a case, most recently created first.
    pub async fn list_by_case(
        pool: &PgPool,
        case_id: DbId,
    ) -> Result<Vec<GeneratedImage>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM generated_images
             WHERE case_id = $1
             ORDER BY created_at DESC, id DESC"
        );
        sqlx::query_as::<_, GeneratedImage>(&query)
            .bind(case_id)
            .fetch_all(pool)
            .await
    }

    /// The most recent image for a case.
    pub async fn find_latest_by_case(
        pool: &PgPool,
        case_id: DbId,
    ) -> Result<Option<GeneratedImage>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM generated_images
             WHERE case_id = $1
             ORDER BY created_at DESC, id DESC
             LIMIT 1"
        );
        sqlx::query_as::<_, GeneratedImage>(&query)
            .bind(case_id)
            .fetch_optional(pool)
            .await
    }
}
