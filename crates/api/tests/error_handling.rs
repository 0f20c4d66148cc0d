//! Tests for the mapping of `AppError` onto HTTP responses.

use assert_matches::assert_matches;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use http_body_util::BodyExt;
use identikit_api::error::AppError;
use identikit_core::error::CoreError;
use identikit_core::generation::BatchError;
use uuid::Uuid;

async fn render(err: AppError) -> (StatusCode, axum::http::HeaderMap, serde_json::Value) {
    let response = err.into_response();
    let status = response.status();
    let headers = response.headers().clone();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    (status, headers, serde_json::from_slice(&bytes).unwrap())
}

#[tokio::test]
async fn not_found_names_the_entity() {
    let id = Uuid::nil();
    let (status, _, json) = render(AppError::Core(CoreError::NotFound { entity: "Case", id })).await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(json["code"], "NOT_FOUND");
    assert_eq!(json["error"], format!("Case with id {id} not found"));
}

#[tokio::test]
async fn validation_maps_to_400() {
    let (status, _, json) =
        render(AppError::Core(CoreError::Validation("bad latitude".into()))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["code"], "VALIDATION_ERROR");
    assert_eq!(json["error"], "bad latitude");
}

#[tokio::test]
async fn conflict_maps_to_409() {
    let (status, _, json) = render(AppError::Core(CoreError::Conflict("busy".into()))).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(json["code"], "CONFLICT");
}

#[tokio::test]
async fn rate_limit_carries_retry_after() {
    let (status, headers, json) = render(AppError::Generation(BatchError::RateLimited {
        retry_after_secs: 30,
    }))
    .await;

    assert_eq!(status, StatusCode::TOO_MANY_REQUESTS);
    assert_eq!(json["code"], "RATE_LIMITED");
    assert_eq!(json["retryAfter"], 30);
    assert_eq!(
        json["error"],
        "Rate limit exceeded. Please wait a moment and try again."
    );
    assert_eq!(headers.get("retry-after").unwrap(), "30");
}

#[tokio::test]
async fn quota_exhaustion_maps_to_402() {
    let (status, headers, json) = render(AppError::Generation(BatchError::QuotaExhausted)).await;

    assert_eq!(status, StatusCode::PAYMENT_REQUIRED);
    assert_eq!(json["code"], "CREDITS_EXHAUSTED");
    assert_eq!(
        json["error"],
        "AI credits exhausted. Please add more credits to continue."
    );
    assert!(json.get("retryAfter").is_none());
    assert!(headers.get("retry-after").is_none());
}

#[tokio::test]
async fn empty_batch_maps_to_500() {
    let (status, _, json) = render(AppError::Generation(BatchError::NoImages)).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(json["code"], "GENERATION_FAILED");
    assert_eq!(json["error"], "Failed to generate any images");
}

#[tokio::test]
async fn configuration_error_keeps_its_message() {
    let (status, _, json) =
        render(AppError::Configuration("Image generation is not configured".into())).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(json["code"], "CONFIGURATION_ERROR");
    assert_eq!(json["error"], "Image generation is not configured");
}

#[tokio::test]
async fn database_failures_are_sanitized() {
    let (status, _, json) = render(AppError::Database(sqlx::Error::PoolTimedOut)).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(json["code"], "INTERNAL_ERROR");
    assert_eq!(json["error"], "An internal error occurred");
}

#[tokio::test]
async fn row_not_found_maps_to_404() {
    let (status, _, json) = render(AppError::Database(sqlx::Error::RowNotFound)).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(json["code"], "NOT_FOUND");
}

#[test]
fn batch_errors_convert_into_app_error() {
    let err: AppError = BatchError::QuotaExhausted.into();
    assert_matches!(err, AppError::Generation(BatchError::QuotaExhausted));
}
