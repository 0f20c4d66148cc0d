use std::sync::Arc;

use identikit_imagegen::generator::ImageGenerator;

use crate::config::ServerConfig;
use crate::inflight::InFlightCases;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// This is cheaply cloneable (inner data is behind `Arc` or is already `Clone`).
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool.
    pub pool: identikit_db::DbPool,
    /// Server configuration.
    pub config: Arc<ServerConfig>,
    /// Image-generation remote. `None` when no credential is configured.
    pub generator: Option<Arc<dyn ImageGenerator>>,
    /// Cases with a generation batch currently running.
    pub inflight: Arc<InFlightCases>,
}
