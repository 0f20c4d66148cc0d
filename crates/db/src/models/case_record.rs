//! Case record models and DTOs for the `suspect_case_records` table.

use identikit_core::case::validate_location;
use identikit_core::error::CoreError;
use identikit_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A row from the `suspect_case_records` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct CaseRecord {
    pub id: DbId,
    pub user_id: DbId,
    pub crime_committed: Option<String>,
    pub incident_timestamp: Option<Timestamp>,
    pub incident_location_address: Option<String>,
    pub incident_location_lat: Option<f64>,
    pub incident_location_lng: Option<f64>,
    pub reported_by: Option<String>,
    pub contact_number: Option<String>,
    pub suspect_name: Option<String>,
    pub suspect_address: Option<String>,
    pub arms_involved: Option<String>,
    pub vehicles_involved: Option<String>,
    pub custodies: Option<String>,
    pub surveillance_footage_ref: Option<String>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for filing a new case. The owner comes from the caller's token.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CreateCaseRecord {
    pub crime_committed: Option<String>,
    pub incident_timestamp: Option<Timestamp>,
    pub incident_location_address: Option<String>,
    pub incident_location_lat: Option<f64>,
    pub incident_location_lng: Option<f64>,
    pub reported_by: Option<String>,
    pub contact_number: Option<String>,
    pub suspect_name: Option<String>,
    pub suspect_address: Option<String>,
    pub arms_involved: Option<String>,
    pub vehicles_involved: Option<String>,
    pub custodies: Option<String>,
    pub surveillance_footage_ref: Option<String>,
}

impl CreateCaseRecord {
    pub fn validate(&self) -> Result<(), CoreError> {
        validate_location(self.incident_location_lat, self.incident_location_lng)
    }
}
