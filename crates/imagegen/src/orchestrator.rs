//! Batch orchestration: one remote call per variation, outcomes folded into a
//! [`GeneratedBatch`] or a batch-fatal [`BatchError`].
//!
//! Calls are driven through a bounded `buffer_unordered` stream. With a
//! concurrency of 1 that is plain sequential issuance. On rate-limit or quota
//! exhaustion the stream is dropped, which cancels in-flight calls and stops
//! any new call from being issued; whatever was collected is discarded.

use std::time::Duration;

use futures::stream::{self, StreamExt};
use identikit_core::generation::{
    classify_status, BatchAccumulator, BatchError, GeneratedBatch, UpstreamFailure,
    VariationOutcome, DEFAULT_VARIATION_COUNT,
};
use identikit_core::prompt::variation_prompt;

use crate::client::ImageGenApiError;
use crate::generator::ImageGenerator;

/// Longest slice of an upstream error body kept in logs.
const MAX_LOGGED_BODY_CHARS: usize = 300;

/// Knobs for one batch.
#[derive(Debug, Clone, Copy)]
pub struct BatchSettings {
    pub variation_count: usize,
    pub concurrency: usize,
    pub call_timeout: Duration,
}

impl Default for BatchSettings {
    fn default() -> Self {
        Self {
            variation_count: DEFAULT_VARIATION_COUNT,
            concurrency: 1,
            call_timeout: Duration::from_secs(60),
        }
    }
}

/// Run one generation batch for a compiled prompt.
///
/// `any_locked` selects the per-call variation note. Survivors are returned in
/// variation order regardless of completion order.
pub async fn run_batch(
    generator: &dyn ImageGenerator,
    prompt: &str,
    any_locked: bool,
    settings: &BatchSettings,
) -> Result<GeneratedBatch, BatchError> {
    let count = settings.variation_count;
    let call_timeout = settings.call_timeout;

    let mut calls = stream::iter(1..=count)
        .map(|index| {
            let content = variation_prompt(prompt, index, count, any_locked);
            async move {
                tracing::debug!(variation = index, count, "Requesting image variation");
                let outcome =
                    match tokio::time::timeout(call_timeout, generator.generate(&content)).await {
                        Ok(result) => classify_result(result),
                        Err(_) => VariationOutcome::Failed(format!(
                            "timed out after {}s",
                            call_timeout.as_secs()
                        )),
                    };
                (index, outcome)
            }
        })
        .buffer_unordered(settings.concurrency.max(1));

    let mut batch = BatchAccumulator::new();
    while let Some((index, outcome)) = calls.next().await {
        match &outcome {
            VariationOutcome::Image(_) => {
                tracing::info!(variation = index, count, "Image variation generated");
            }
            VariationOutcome::Empty => {
                tracing::warn!(variation = index, "Image API returned no image");
            }
            VariationOutcome::Failed(reason) => {
                tracing::warn!(variation = index, reason = %reason, "Image variation failed");
            }
            VariationOutcome::RateLimited | VariationOutcome::QuotaExhausted => {}
        }

        if let Err(err) = batch.record(index, outcome) {
            tracing::warn!(variation = index, error = %err, "Aborting generation batch");
            return Err(err);
        }
    }

    let skipped = batch.skipped();
    let result = batch.finish();
    match &result {
        Ok(generated) => {
            tracing::info!(images = generated.count(), skipped, "Generation batch completed")
        }
        Err(err) => tracing::error!(skipped, error = %err, "Generation batch failed"),
    }
    result
}

fn classify_result(result: Result<Option<String>, ImageGenApiError>) -> VariationOutcome {
    match result {
        Ok(Some(url)) => VariationOutcome::Image(url),
        Ok(None) => VariationOutcome::Empty,
        Err(ImageGenApiError::ApiError { status, body }) => match classify_status(status) {
            UpstreamFailure::Other => VariationOutcome::Failed(format!(
                "status {status}: {}",
                truncate(&body, MAX_LOGGED_BODY_CHARS)
            )),
            fatal => fatal.into(),
        },
        Err(ImageGenApiError::Request(e)) => VariationOutcome::Failed(e.to_string()),
    }
}

fn truncate(s: &str, max_chars: usize) -> &str {
    match s.char_indices().nth(max_chars) {
        Some((idx, _)) => &s[..idx],
        None => s,
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
