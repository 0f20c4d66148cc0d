//! REST client for the chat-completions style image-generation gateway.
//!
//! One request produces at most one image. The image reference is read from
//! `choices[0].message.images[0].image_url.url`; a success response without
//! that path means "no image produced", not an error.

use serde::{Deserialize, Serialize};

/// HTTP client for the image-generation gateway.
#[derive(Clone)]
pub struct ImageGenApi {
    client: reqwest::Client,
    api_url: String,
    api_key: String,
    model: String,
}

/// Errors from the image-generation REST layer.
#[derive(Debug, thiserror::Error)]
pub enum ImageGenApiError {
    /// The HTTP request itself failed (network, DNS, TLS, body decoding).
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// The gateway returned a non-2xx status code.
    #[error("Image API error ({status}): {body}")]
    ApiError {
        /// HTTP status code.
        status: u16,
        /// Raw response body, for logs only.
        body: String,
    },
}

// ---------------------------------------------------------------------------
// Wire types
// ---------------------------------------------------------------------------

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: [ChatMessage<'a>; 1],
    modalities: [&'static str; 2],
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(Debug, Default, Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<Choice>,
}

#[derive(Debug, Default, Deserialize)]
struct Choice {
    #[serde(default)]
    message: Option<ResponseMessage>,
}

#[derive(Debug, Default, Deserialize)]
struct ResponseMessage {
    #[serde(default)]
    images: Vec<ResponseImage>,
}

#[derive(Debug, Deserialize)]
struct ResponseImage {
    image_url: Option<ImageUrl>,
}

#[derive(Debug, Deserialize)]
struct ImageUrl {
    url: Option<String>,
}

impl ChatResponse {
    fn first_image_url(self) -> Option<String> {
        self.choices
            .into_iter()
            .next()?
            .message?
            .images
            .into_iter()
            .next()?
            .image_url?
            .url
            .filter(|url| !url.is_empty())
    }
}

impl ImageGenApi {
    /// Create a client for the gateway at `api_url` (the full completions
    /// endpoint), authenticating with `api_key` and requesting `model`.
    pub fn new(api_url: String, api_key: String, model: String) -> Self {
        Self::with_client(reqwest::Client::new(), api_url, api_key, model)
    }

    /// Create a client reusing an existing [`reqwest::Client`].
    pub fn with_client(
        client: reqwest::Client,
        api_url: String,
        api_key: String,
        model: String,
    ) -> Self {
        Self {
            client,
            api_url,
            api_key,
            model,
        }
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    /// Request one image for `content`.
    ///
    /// Returns `Ok(None)` when the gateway answered successfully but did not
    /// include an image.
    pub async fn generate_image(&self, content: &str) -> Result<Option<String>, ImageGenApiError> {
        let body = ChatRequest {
            model: &self.model,
            messages: [ChatMessage {
                role: "user",
                content,
            }],
            modalities: ["image", "text"],
        };

        let response = self
            .client
            .post(&self.api_url)
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await?;

        let response = Self::ensure_success(response).await?;
        let parsed = response.json::<ChatResponse>().await?;
        Ok(parsed.first_image_url())
    }

    // ---- private helpers ----

    /// Ensure the response has a success status code. Returns the response
    /// unchanged on success, or an [`ImageGenApiError::ApiError`] carrying the
    /// status and body text on failure.
    async fn ensure_success(
        response: reqwest::Response,
    ) -> Result<reqwest::Response, ImageGenApiError> {
        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "<unreadable body>".to_string());
            return Err(ImageGenApiError::ApiError {
                status: status.as_u16(),
                body,
            });
        }
        Ok(response)
    }
}
