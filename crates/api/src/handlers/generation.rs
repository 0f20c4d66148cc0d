//! Handler for suspect portrait generation.
//!
//! Flow: authenticate, validate the body, check the remote is configured,
//! confirm case ownership, claim the case's single-flight slot, resolve the
//! attribute snapshot, compile the prompt, run the batch, then persist the
//! representative image.

use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::Json;
use identikit_core::attributes::AttributeRecord;
use identikit_core::error::CoreError;
use identikit_core::generation::{GeneratedBatch, STATUS_COMPLETED};
use identikit_core::metadata::FeatureMetadata;
use identikit_core::prompt::compile;
use identikit_core::types::DbId;
use identikit_db::models::generated_image::CreateGeneratedImage;
use identikit_db::models::physical_attributes::PhysicalAttributes;
use identikit_db::repositories::{GeneratedImageRepo, PhysicalAttributesRepo};
use identikit_imagegen::orchestrator::run_batch;
use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::error::{AppError, AppResult};
use crate::handlers::cases::{find_owned_case, json_body};
use crate::middleware::auth::AuthUser;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Request / response
// ---------------------------------------------------------------------------

/// Body of `POST /api/v1/generate`.
#[derive(Debug, Deserialize)]
pub struct GenerateRequest {
    #[serde(default, alias = "caseId")]
    pub case_id: Option<DbId>,
    /// New attributes to snapshot first. Omit to reuse the latest snapshot.
    #[serde(default)]
    pub attributes: Option<AttributeRecord>,
    #[serde(
        default,
        rename = "featureMetadata",
        alias = "featureMeta",
        alias = "feature_metadata"
    )]
    pub feature_metadata: Option<FeatureMetadata>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateResponse {
    pub images: Vec<String>,
    pub message: String,
    pub attributes_id: DbId,
    /// `None` if the batch succeeded but recording it failed.
    pub generated_image_id: Option<DbId>,
}

// ---------------------------------------------------------------------------
// Handler
// ---------------------------------------------------------------------------

/// POST /api/v1/generate
pub async fn generate(
    user: AuthUser,
    State(state): State<AppState>,
    body: Result<Json<GenerateRequest>, JsonRejection>,
) -> AppResult<Json<GenerateResponse>> {
    let input = json_body(body)?;
    let case_id = input
        .case_id
        .ok_or_else(|| AppError::BadRequest("case_id is required".into()))?;
    let metadata = input.feature_metadata.unwrap_or_default();
    metadata.validate()?;

    let generator = state
        .generator
        .clone()
        .ok_or_else(|| AppError::Configuration("Image generation is not configured".into()))?;

    find_owned_case(&state, &user, case_id).await?;

    let _slot = state.inflight.try_acquire(case_id).ok_or_else(|| {
        AppError::Core(CoreError::Conflict(
            "Generation already in progress for this case".into(),
        ))
    })?;

    let snapshot = resolve_snapshot(&state, case_id, input.attributes).await?;

    let prompt = compile(&snapshot.attributes, Some(&metadata));
    tracing::debug!(
        case_id = %case_id,
        any_locked = prompt.any_locked,
        prompt = %prompt.text,
        "Compiled generation prompt",
    );

    let settings = state.config.image.batch_settings();
    tracing::info!(
        case_id = %case_id,
        attributes_id = %snapshot.id,
        variations = settings.variation_count,
        "Starting generation batch",
    );
    let batch = run_batch(generator.as_ref(), &prompt.text, prompt.any_locked, &settings).await?;

    let generated_image_id =
        persist_representative(&state, case_id, snapshot.id, generator.model(), &batch, &metadata)
            .await;

    Ok(Json(GenerateResponse {
        message: batch.success_message(),
        images: batch.images,
        attributes_id: snapshot.id,
        generated_image_id,
    }))
}

/// Snapshot the supplied attributes, or fall back to the latest stored one.
async fn resolve_snapshot(
    state: &AppState,
    case_id: DbId,
    attributes: Option<AttributeRecord>,
) -> AppResult<PhysicalAttributes> {
    match attributes {
        Some(attributes) => {
            Ok(PhysicalAttributesRepo::create(&state.pool, case_id, &attributes).await?)
        }
        None => PhysicalAttributesRepo::find_latest_by_case(&state.pool, case_id)
            .await?
            .ok_or(AppError::Core(CoreError::NotFound {
                entity: "Attributes for case",
                id: case_id,
            })),
    }
}

/// Record the first image of the batch with its generation metadata.
///
/// The images are already produced at this point, so a storage failure is
/// logged and reported as a missing id rather than failing the request.
async fn persist_representative(
    state: &AppState,
    case_id: DbId,
    attributes_id: DbId,
    model: &str,
    batch: &GeneratedBatch,
    metadata: &FeatureMetadata,
) -> Option<DbId> {
    let image_url = batch.representative()?.to_string();
    let (feature_locks, feature_confidence) = metadata.snapshot();

    let input = CreateGeneratedImage {
        case_id,
        attributes_id: Some(attributes_id),
        image_url,
        generation_status: STATUS_COMPLETED.to_string(),
        generation_metadata: json!({
            "model": model,
            "totalImages": batch.count(),
            "featureLocks": feature_locks,
            "featureConfidence": feature_confidence,
        }),
    };

    match GeneratedImageRepo::create(&state.pool, &input).await {
        Ok(image) => {
            tracing::info!(
                case_id = %case_id,
                generated_image_id = %image.id,
                images = batch.count(),
                "Generation recorded",
            );
            Some(image.id)
        }
        Err(e) => {
            tracing::error!(case_id = %case_id, error = %e, "Failed to record generated image");
            None
        }
    }
}
