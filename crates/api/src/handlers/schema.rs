//! Handler for the shared feature schema.

use axum::Json;
use identikit_core::features::{FeatureDef, FEATURE_SCHEMA};

/// GET /api/v1/attribute-schema
///
/// The ordered feature table the intake form and prompt compiler share.
pub async fn get_schema() -> Json<&'static [FeatureDef]> {
    Json(&FEATURE_SCHEMA[..])
}
