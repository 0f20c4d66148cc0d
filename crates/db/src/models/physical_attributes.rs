//! Attribute snapshot model for the `suspect_physical_attributes` table.
//!
//! The feature columns come from the shared feature schema, so the row is
//! decoded by walking the schema instead of listing 35 fields by hand.

use identikit_core::attributes::AttributeRecord;
use identikit_core::features::{self, FeatureKind};
use identikit_core::types::{DbId, Timestamp};
use serde::Serialize;
use serde_json::Value;
use sqlx::postgres::PgRow;
use sqlx::{FromRow, Row};

/// A row from the `suspect_physical_attributes` table.
///
/// Serializes flat, the way the row looks in the database, with absent
/// features omitted.
#[derive(Debug, Clone, Serialize)]
pub struct PhysicalAttributes {
    pub id: DbId,
    pub case_id: DbId,
    #[serde(flatten)]
    pub attributes: AttributeRecord,
    pub created_at: Timestamp,
}

impl<'r> FromRow<'r, PgRow> for PhysicalAttributes {
    fn from_row(row: &'r PgRow) -> Result<Self, sqlx::Error> {
        let mut attributes = AttributeRecord::new();
        for key in features::all_keys() {
            let column = key.as_str();
            let raw = match key.def().kind {
                FeatureKind::Text => row
                    .try_get::<Option<String>, _>(column)?
                    .map(Value::from),
                FeatureKind::Integer => row.try_get::<Option<i32>, _>(column)?.map(Value::from),
                FeatureKind::Decimal => row.try_get::<Option<f64>, _>(column)?.map(Value::from),
            };
            if let Some(raw) = raw {
                attributes
                    .set(key, &raw)
                    .map_err(|e| sqlx::Error::ColumnDecode {
                        index: column.to_string(),
                        source: Box::new(e),
                    })?;
            }
        }

        Ok(Self {
            id: row.try_get("id")?,
            case_id: row.try_get("case_id")?,
            attributes,
            created_at: row.try_get("created_at")?,
        })
    }
}
