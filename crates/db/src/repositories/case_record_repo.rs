//! Repository for the `suspect_case_records` table.

use identikit_core::types::DbId;
use sqlx::PgPool;

use crate::models::case_record::{CaseRecord, CreateCaseRecord};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, user_id, crime_committed, incident_timestamp, \
    incident_location_address, incident_location_lat, incident_location_lng, \
    reported_by, contact_number, suspect_name, suspect_address, arms_involved, \
    vehicles_involved, custodies, surveillance_footage_ref, created_at, updated_at";

/// Provides create and lookup operations for case records.
pub struct CaseRecordRepo;

impl CaseRecordRepo {
    /// Insert a new case owned by `user_id`, returning the created row.
    pub async fn create(
        pool: &PgPool,
        user_id: DbId,
        input: &CreateCaseRecord,
    ) -> Result<CaseRecord, sqlx::Error> {
        let query = format!(
            "INSERT INTO suspect_case_records (
                user_id, crime_committed, incident_timestamp, incident_location_address,
                incident_location_lat, incident_location_lng, reported_by, contact_number,
                suspect_name, suspect_address, arms_involved, vehicles_involved, custodies,
                surveillance_footage_ref
             )
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, CaseRecord>(&query)
            .bind(user_id)
            .bind(&input.crime_committed)
            .bind(input.incident_timestamp)
            .bind(&input.incident_location_address)
            .bind(input.incident_location_lat)
            .bind(input.incident_location_lng)
            .bind(&input.reported_by)
            .bind(&input.contact_number)
            .bind(&input.suspect_name)
            .bind(&input.suspect_address)
            .bind(&input.arms_involved)
            .bind(&input.vehicles_involved)
            .bind(&input.custodies)
            .bind(&input.surveillance_footage_ref)
            .fetch_one(pool)
            .await
    }

    /// Find a case by its ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<CaseRecord>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM suspect_case_records WHERE id = $1");
        sqlx::query_as::<_, CaseRecord>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Find a case by ID, scoped to its owner.
    ///
    /// Returns `None` both when the case does not exist and when it belongs to
    /// someone else.
    pub async fn find_owned(
        pool: &PgPool,
        id: DbId,
        user_id: DbId,
    ) -> Result<Option<CaseRecord>, sqlx::Error> {
        let query =
            format!("SELECT {COLUMNS} FROM suspect_case_records WHERE id = $1 AND user_id = $2");
        sqlx::query_as::<_, CaseRecord>(&query)
            .bind(id)
            .bind(user_id)
            .fetch_optional(pool)
            .await
    }

    /// List a user's cases, most recently created first.
    pub async fn list_by_user(pool: &PgPool, user_id: DbId) -> Result<Vec<CaseRecord>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM suspect_case_records
             WHERE user_id = $1
             ORDER BY created_at DESC"
        );
        sqlx::query_as::<_, CaseRecord>(&query)
            .bind(user_id)
            .fetch_all(pool)
            .await
    }
}
