//! Repository for the `suspect_physical_attributes` table.

use std::sync::LazyLock;

use identikit_core::attributes::AttributeRecord;
use identikit_core::features::{self, FeatureKind};
use identikit_core::types::DbId;
use sqlx::PgPool;

use crate::models::physical_attributes::PhysicalAttributes;

/// Feature columns in schema order.
static FEATURE_COLUMNS: LazyLock<String> = LazyLock::new(|| {
    features::all_keys()
        .map(|key| key.as_str())
        .collect::<Vec<_>>()
        .join(", ")
});

/// Column list shared across queries to avoid repetition.
static COLUMNS: LazyLock<String> =
    LazyLock::new(|| format!("id, case_id, {}, created_at", *FEATURE_COLUMNS));

/// Append-only access to attribute snapshots.
pub struct PhysicalAttributesRepo;

impl PhysicalAttributesRepo {
    /// Insert a new snapshot for `case_id`. Absent features are stored as NULL.
    pub async fn create(
        pool: &PgPool,
        case_id: DbId,
        attributes: &AttributeRecord,
    ) -> Result<PhysicalAttributes, sqlx::Error> {
        let placeholders = (2..=features::FEATURE_SCHEMA.len() + 1)
            .map(|n| format!("${n}"))
            .collect::<Vec<_>>()
            .join(", ");
        let query = format!(
            "INSERT INTO suspect_physical_attributes (case_id, {features})
             VALUES ($1, {placeholders})
             RETURNING {columns}",
            features = *FEATURE_COLUMNS,
            columns = *COLUMNS,
        );

        let mut insert = sqlx::query_as::<_, PhysicalAttributes>(&query).bind(case_id);
        for key in features::all_keys() {
            insert = match key.def().kind {
                FeatureKind::Text => insert.bind(attributes.text(key)),
                FeatureKind::Integer => insert.bind(attributes.integer(key)),
                FeatureKind::Decimal => insert.bind(attributes.decimal(key)),
            };
        }
        insert.fetch_one(pool).await
    }

    /// Find a snapshot by its ID.
    pub async fn find_by_id(
        pool: &PgPool,
        id: DbId,
    ) -> Result<Option<PhysicalAttributes>, sqlx::Error> {
        let query = format!(
            "SELECT {columns} FROM suspect_physical_attributes WHERE id = $1",
            columns = *COLUMNS
        );
        sqlx::query_as::<_, PhysicalAttributes>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// The most recent snapshot for a case.
    pub async fn find_latest_by_case(
        pool: &PgPool,
        case_id: DbId,
    ) -> Result<Option<PhysicalAttributes>, sqlx::Error> {
        let query = format!(
            "SELECT {columns} FROM suspect_physical_attributes
             WHERE case_id = $1
             ORDER BY created_at DESC, id DESC
             LIMIT 1",
            columns = *COLUMNS
        );
        sqlx::query_as::<_, PhysicalAttributes>(&query)
            .bind(case_id)
            .fetch_optional(pool)
            .await
    }
}
