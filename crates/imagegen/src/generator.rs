//! The seam between the orchestrator and whatever produces images.

use async_trait::async_trait;

use crate::client::{ImageGenApi, ImageGenApiError};

/// Produces at most one image per call.
///
/// `Ok(None)` means the remote answered but produced no image.
#[async_trait]
pub trait ImageGenerator: Send + Sync {
    async fn generate(&self, content: &str) -> Result<Option<String>, ImageGenApiError>;

    /// Model identifier recorded with persisted results.
    fn model(&self) -> &str;
}

#[async_trait]
impl ImageGenerator for ImageGenApi {
    async fn generate(&self, content: &str) -> Result<Option<String>, ImageGenApiError> {
        self.generate_image(content).await
    }

    fn model(&self) -> &str {
        ImageGenApi::model(self)
    }
}
