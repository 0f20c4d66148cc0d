//! Handler for the case report: case details, the described features with
//! their lock/confidence state, and the representative portrait.

use axum::extract::{Path, State};
use axum::Json;
use identikit_core::attributes::AttributeRecord;
use identikit_core::features;
use identikit_core::metadata::FeatureMetadata;
use identikit_core::types::{DbId, Timestamp};
use identikit_db::models::case_record::CaseRecord;
use identikit_db::repositories::{GeneratedImageRepo, PhysicalAttributesRepo};
use serde::Serialize;

use crate::error::AppResult;
use crate::handlers::cases::find_owned_case;
use crate::middleware::auth::AuthUser;
use crate::state::AppState;

const NOT_AVAILABLE: &str = "N/A";

#[derive(Debug, Serialize)]
pub struct DetailLine {
    pub label: &'static str,
    pub value: String,
}

#[derive(Debug, Serialize)]
pub struct FeatureLine {
    pub key: &'static str,
    pub label: String,
    pub value: String,
    pub locked: bool,
    pub confidence: &'static str,
    /// Pre-rendered `Label: value (Confidence: Band)` line.
    pub line: String,
}

#[derive(Debug, Serialize)]
pub struct CaseReport {
    pub case: CaseRecord,
    pub details: Vec<DetailLine>,
    pub attributes_id: Option<DbId>,
    pub features: Vec<FeatureLine>,
    pub image_url: Option<String>,
    pub generated_at: Option<Timestamp>,
}

/// GET /api/v1/cases/{id}/report
///
/// Features and lock/confidence come from the most recent recorded generation
/// when there is one, otherwise from the latest attribute snapshot with
/// default metadata.
pub async fn get_report(
    user: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<CaseReport>> {
    let case = find_owned_case(&state, &user, id).await?;
    let latest_image = GeneratedImageRepo::find_latest_by_case(&state.pool, id).await?;

    let snapshot = match latest_image.as_ref().and_then(|image| image.attributes_id) {
        Some(attributes_id) => PhysicalAttributesRepo::find_by_id(&state.pool, attributes_id).await?,
        None => None,
    };
    let snapshot = match snapshot {
        Some(snapshot) => Some(snapshot),
        None => PhysicalAttributesRepo::find_latest_by_case(&state.pool, id).await?,
    };

    let metadata = latest_image
        .as_ref()
        .map(|image| {
            let meta = &image.generation_metadata;
            FeatureMetadata::from_snapshot(meta.get("featureLocks"), meta.get("featureConfidence"))
        })
        .unwrap_or_default();

    let attributes = snapshot
        .as_ref()
        .map(|s| s.attributes.clone())
        .unwrap_or_default();

    Ok(Json(CaseReport {
        details: case_details(&case),
        features: feature_lines(&attributes, &metadata),
        attributes_id: snapshot.map(|s| s.id),
        image_url: latest_image.as_ref().map(|image| image.image_url.clone()),
        generated_at: latest_image.map(|image| image.created_at),
        case,
    }))
}

fn or_na(value: &Option<String>) -> String {
    value
        .as_deref()
        .filter(|v| !v.trim().is_empty())
        .unwrap_or(NOT_AVAILABLE)
        .to_string()
}

fn case_details(case: &CaseRecord) -> Vec<DetailLine> {
    let incident_time = case
        .incident_timestamp
        .map(|t| t.to_rfc3339())
        .unwrap_or_else(|| NOT_AVAILABLE.to_string());

    vec![
        DetailLine { label: "Incident Time", value: incident_time },
        DetailLine { label: "Location", value: or_na(&case.incident_location_address) },
        DetailLine { label: "Crime", value: or_na(&case.crime_committed) },
        DetailLine { label: "Arms", value: or_na(&case.arms_involved) },
        DetailLine { label: "Vehicles", value: or_na(&case.vehicles_involved) },
        DetailLine { label: "Suspect Name", value: or_na(&case.suspect_name) },
        DetailLine { label: "Suspect Address", value: or_na(&case.suspect_address) },
        DetailLine { label: "Contact", value: or_na(&case.contact_number) },
        DetailLine { label: "Reported By", value: or_na(&case.reported_by) },
    ]
}

/// One line per schema feature, present or not.
pub fn feature_lines(attributes: &AttributeRecord, metadata: &FeatureMetadata) -> Vec<FeatureLine> {
    features::all_keys()
        .map(|key| {
            let meta = metadata.get(key);
            let label = key.display_name();
            let value = attributes
                .text(key)
                .unwrap_or_else(|| NOT_AVAILABLE.to_string());
            let confidence = meta.band().label();
            let lock = if meta.locked { " [LOCKED]" } else { "" };
            FeatureLine {
                key: key.as_str(),
                line: format!("{label}: {value}{lock} (Confidence: {confidence})"),
                label,
                value,
                locked: meta.locked,
                confidence,
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use identikit_core::features::FeatureKey;

    use super::*;

    #[test]
    fn lines_cover_every_feature_with_placeholders() {
        let attributes = AttributeRecord::new().with(FeatureKey::EyeColor, "Hazel").unwrap();
        let metadata = FeatureMetadata::new().with(FeatureKey::EyeColor, true, 90);

        let lines = feature_lines(&attributes, &metadata);
        assert_eq!(lines.len(), 35);

        let eye = lines.iter().find(|l| l.key == "eye_color").unwrap();
        assert_eq!(eye.line, "Eye Color: Hazel [LOCKED] (Confidence: High)");

        let gender = lines.iter().find(|l| l.key == "gender").unwrap();
        assert_eq!(gender.line, "Gender: N/A (Confidence: Medium)");
    }
}
