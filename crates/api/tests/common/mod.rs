#![allow(dead_code)]

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use axum::body::Body;
use axum::http::{Method, Request};
use axum::response::Response;
use axum::Router;
use http_body_util::BodyExt;
use sqlx::PgPool;
use tokio::sync::{Notify, Semaphore};
use tower::ServiceExt;
use uuid::Uuid;

use identikit_api::auth::jwt::{generate_access_token, JwtConfig, DEFAULT_AUDIENCE};
use identikit_api::config::{ImageGenConfig, ServerConfig};
use identikit_api::inflight::InFlightCases;
use identikit_api::router::build_app_router;
use identikit_api::state::AppState;
use identikit_imagegen::client::ImageGenApiError;
use identikit_imagegen::generator::ImageGenerator;

// ---------------------------------------------------------------------------
// App construction
// ---------------------------------------------------------------------------

/// Build a test `ServerConfig` with safe defaults.
pub fn test_config() -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: vec!["http://localhost:5173".to_string()],
        request_timeout_secs: 30,
        jwt: JwtConfig {
            secret: "test-secret-that-is-long-enough-for-hmac".to_string(),
            audience: DEFAULT_AUDIENCE.to_string(),
            access_token_expiry_mins: 15,
        },
        image: ImageGenConfig {
            api_key: Some("test-key".to_string()),
            call_timeout_secs: 5,
            ..ImageGenConfig::default()
        },
    }
}

/// Full application router with no image generator configured.
pub fn build_test_app(pool: PgPool) -> Router {
    build_app(pool, None)
}

/// Full application router backed by the given generator.
pub fn build_test_app_with_generator(pool: PgPool, generator: Arc<dyn ImageGenerator>) -> Router {
    build_app(pool, Some(generator))
}

/// Full application router with a caller-supplied config.
pub fn build_test_app_with_config(
    pool: PgPool,
    config: ServerConfig,
    generator: Arc<dyn ImageGenerator>,
) -> Router {
    build_app_with_config(pool, config, Some(generator))
}

fn build_app(pool: PgPool, generator: Option<Arc<dyn ImageGenerator>>) -> Router {
    build_app_with_config(pool, test_config(), generator)
}

fn build_app_with_config(
    pool: PgPool,
    config: ServerConfig,
    generator: Option<Arc<dyn ImageGenerator>>,
) -> Router {
    let state = AppState {
        pool,
        config: Arc::new(config.clone()),
        generator,
        inflight: Arc::new(InFlightCases::new()),
    };
    build_app_router(state, &config)
}

/// A valid Bearer token for `user_id`.
pub fn token_for(user_id: Uuid) -> String {
    generate_access_token(user_id, &test_config().jwt).expect("token generation should succeed")
}

// ---------------------------------------------------------------------------
// Request helpers
// ---------------------------------------------------------------------------

pub async fn get(app: Router, uri: &str) -> Response {
    let request = Request::builder()
        .method(Method::GET)
        .uri(uri)
        .body(Body::empty())
        .unwrap();
    app.oneshot(request).await.unwrap()
}

pub async fn get_auth(app: Router, uri: &str, token: &str) -> Response {
    let request = Request::builder()
        .method(Method::GET)
        .uri(uri)
        .header("authorization", format!("Bearer {token}"))
        .body(Body::empty())
        .unwrap();
    app.oneshot(request).await.unwrap()
}

pub async fn post_json(app: Router, uri: &str, body: serde_json::Value) -> Response {
    let request = Request::builder()
        .method(Method::POST)
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap();
    app.oneshot(request).await.unwrap()
}

pub async fn post_json_auth(
    app: Router,
    uri: &str,
    body: serde_json::Value,
    token: &str,
) -> Response {
    let request = Request::builder()
        .method(Method::POST)
        .uri(uri)
        .header("content-type", "application/json")
        .header("authorization", format!("Bearer {token}"))
        .body(Body::from(body.to_string()))
        .unwrap();
    app.oneshot(request).await.unwrap()
}

pub async fn body_json(response: Response) -> serde_json::Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

/// Create a case through the API and return its id.
pub async fn create_case(app: Router, token: &str) -> String {
    let response = post_json_auth(
        app,
        "/api/v1/cases",
        serde_json::json!({ "crime_committed": "Burglary" }),
        token,
    )
    .await;
    assert_eq!(response.status(), axum::http::StatusCode::CREATED);
    body_json(response).await["id"].as_str().unwrap().to_string()
}

// ---------------------------------------------------------------------------
// Scripted generator
// ---------------------------------------------------------------------------

/// What the scripted generator does on a given call.
#[derive(Clone, Debug)]
pub enum Step {
    Image(&'static str),
    NoImage,
    Status(u16),
}

/// Replays `steps` in call order (cycling) and records every prompt.
///
/// With a gate installed, each call signals `started` and then waits for a
/// `release` permit before answering.
pub struct ScriptedGenerator {
    steps: Vec<Step>,
    calls: AtomicUsize,
    pub prompts: Mutex<Vec<String>>,
    gate: Option<(Arc<Notify>, Arc<Semaphore>)>,
    delay: Option<Duration>,
}

impl ScriptedGenerator {
    pub fn new(steps: Vec<Step>) -> Self {
        Self {
            steps,
            calls: AtomicUsize::new(0),
            prompts: Mutex::new(Vec::new()),
            gate: None,
            delay: None,
        }
    }

    /// Answer every call only after `delay`.
    pub fn slow(steps: Vec<Step>, delay: Duration) -> Self {
        Self {
            delay: Some(delay),
            ..Self::new(steps)
        }
    }

    pub fn gated(steps: Vec<Step>, started: Arc<Notify>, release: Arc<Semaphore>) -> Self {
        Self {
            gate: Some((started, release)),
            ..Self::new(steps)
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn prompts(&self) -> Vec<String> {
        self.prompts.lock().unwrap().clone()
    }
}

#[async_trait]
impl ImageGenerator for ScriptedGenerator {
    async fn generate(&self, content: &str) -> Result<Option<String>, ImageGenApiError> {
        let call = self.calls.fetch_add(1, Ordering::SeqCst);
        self.prompts.lock().unwrap().push(content.to_string());

        if let Some((started, release)) = &self.gate {
            started.notify_one();
            let _permit = release.acquire().await.unwrap();
        }
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }

        match &self.steps[call % self.steps.len()] {
            Step::Image(url) => Ok(Some(url.to_string())),
            Step::NoImage => Ok(None),
            Step::Status(status) => Err(ImageGenApiError::ApiError {
                status: *status,
                body: "scripted failure".to_string(),
            }),
        }
    }

    fn model(&self) -> &str {
        "scripted/model"
    }
}
