//! Handlers for the `/cases` resource and its attribute snapshots.

use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use identikit_core::attributes::AttributeRecord;
use identikit_core::error::CoreError;
use identikit_core::types::DbId;
use identikit_db::models::case_record::{CaseRecord, CreateCaseRecord};
use identikit_db::models::generated_image::GeneratedImage;
use identikit_db::models::physical_attributes::PhysicalAttributes;
use identikit_db::repositories::{CaseRecordRepo, GeneratedImageRepo, PhysicalAttributesRepo};

use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::state::AppState;

/// Load a case owned by `user`, or 404.
///
/// Cases owned by someone else are indistinguishable from missing ones.
pub async fn find_owned_case(state: &AppState, user: &AuthUser, id: DbId) -> AppResult<CaseRecord> {
    CaseRecordRepo::find_owned(&state.pool, id, user.user_id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound { entity: "Case", id }))
}

/// Unwrap a JSON body, reporting malformed input in the usual error shape.
pub fn json_body<T>(body: Result<Json<T>, JsonRejection>) -> AppResult<T> {
    body.map(|Json(input)| input)
        .map_err(|rejection| AppError::BadRequest(rejection.body_text()))
}

/// POST /api/v1/cases
pub async fn create(
    user: AuthUser,
    State(state): State<AppState>,
    body: Result<Json<CreateCaseRecord>, JsonRejection>,
) -> AppResult<(StatusCode, Json<CaseRecord>)> {
    let input = json_body(body)?;
    input.validate()?;

    let case = CaseRecordRepo::create(&state.pool, user.user_id, &input).await?;
    tracing::info!(case_id = %case.id, user_id = %user.user_id, "Case created");
    Ok((StatusCode::CREATED, Json(case)))
}

/// GET /api/v1/cases
pub async fn list(user: AuthUser, State(state): State<AppState>) -> AppResult<Json<Vec<CaseRecord>>> {
    let cases = CaseRecordRepo::list_by_user(&state.pool, user.user_id).await?;
    Ok(Json(cases))
}

/// GET /api/v1/cases/{id}
pub async fn get_by_id(
    user: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<CaseRecord>> {
    Ok(Json(find_owned_case(&state, &user, id).await?))
}

/// POST /api/v1/cases/{id}/attributes
pub async fn create_attributes(
    user: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    body: Result<Json<AttributeRecord>, JsonRejection>,
) -> AppResult<(StatusCode, Json<PhysicalAttributes>)> {
    let attributes = json_body(body)?;
    find_owned_case(&state, &user, id).await?;

    let snapshot = PhysicalAttributesRepo::create(&state.pool, id, &attributes).await?;
    tracing::info!(
        case_id = %id,
        attributes_id = %snapshot.id,
        features = attributes.len(),
        "Attribute snapshot saved",
    );
    Ok((StatusCode::CREATED, Json(snapshot)))
}

/// GET /api/v1/cases/{id}/attributes/latest
pub async fn latest_attributes(
    user: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<PhysicalAttributes>> {
    find_owned_case(&state, &user, id).await?;
    let snapshot = PhysicalAttributesRepo::find_latest_by_case(&state.pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Attributes for case",
            id,
        }))?;
    Ok(Json(snapshot))
}

/// GET /api/v1/cases/{id}/images
pub async fn list_images(
    user: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<Vec<GeneratedImage>>> {
    find_owned_case(&state, &user, id).await?;
    let images = GeneratedImageRepo::list_by_case(&state.pool, id).await?;
    Ok(Json(images))
}
