//! Batch generation constants, per-variation outcome classification and
//! batch accounting.
//!
//! The remote calls themselves live in `identikit-imagegen`; this module only
//! decides what each call's outcome means for the batch as a whole.

use serde::Serialize;

// ---------------------------------------------------------------------------
// Defaults
// ---------------------------------------------------------------------------

/// Variations requested per generation click.
pub const DEFAULT_VARIATION_COUNT: usize = 4;
/// Suggested wait, in seconds, surfaced with a rate-limit abort.
pub const RATE_LIMIT_RETRY_AFTER_SECS: u64 = 30;
/// Remote model identifier used when none is configured.
pub const DEFAULT_MODEL: &str = "google/gemini-2.5-flash-image";

/// Status recorded on a persisted generated image.
pub const STATUS_COMPLETED: &str = "completed";

// ---------------------------------------------------------------------------
// Per-variation outcomes
// ---------------------------------------------------------------------------

/// What one remote generation call produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VariationOutcome {
    /// Success with an extractable image reference.
    Image(String),
    /// Success without an image reference.
    Empty,
    /// Upstream 429. Batch-fatal.
    RateLimited,
    /// Upstream 402. Batch-fatal.
    QuotaExhausted,
    /// Any other failure (non-2xx, transport error, timeout, bad body).
    Failed(String),
}

impl VariationOutcome {
    /// Whether this outcome aborts the whole batch.
    pub fn is_batch_fatal(&self) -> bool {
        matches!(self, Self::RateLimited | Self::QuotaExhausted)
    }
}

/// Upstream status class for a non-2xx response.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpstreamFailure {
    RateLimited,
    QuotaExhausted,
    Other,
}

/// Classify a non-success HTTP status from the image remote.
pub fn classify_status(status: u16) -> UpstreamFailure {
    match status {
        429 => UpstreamFailure::RateLimited,
        402 => UpstreamFailure::QuotaExhausted,
        _ => UpstreamFailure::Other,
    }
}

impl From<UpstreamFailure> for VariationOutcome {
    fn from(failure: UpstreamFailure) -> Self {
        match failure {
            UpstreamFailure::RateLimited => Self::RateLimited,
            UpstreamFailure::QuotaExhausted => Self::QuotaExhausted,
            UpstreamFailure::Other => Self::Failed("upstream error".to_string()),
        }
    }
}

// ---------------------------------------------------------------------------
// Batch result
// ---------------------------------------------------------------------------

/// Conditions that end a batch without a usable result.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum BatchError {
    #[error("Rate limit exceeded. Please wait a moment and try again.")]
    RateLimited { retry_after_secs: u64 },

    #[error("AI credits exhausted. Please add more credits to continue.")]
    QuotaExhausted,

    #[error("Failed to generate any images")]
    NoImages,
}

/// Images from a completed batch, in variation order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GeneratedBatch {
    pub images: Vec<String>,
}

impl GeneratedBatch {
    pub fn count(&self) -> usize {
        self.images.len()
    }

    /// The image persisted as the batch's representative result.
    pub fn representative(&self) -> Option<&str> {
        self.images.first().map(String::as_str)
    }

    pub fn success_message(&self) -> String {
        format!("Generated {} suspect portraits", self.images.len())
    }
}

/// Collects per-variation outcomes, which may arrive in any order.
///
/// The first batch-fatal outcome poisons the accumulator: anything collected
/// so far is discarded and later outcomes are ignored.
#[derive(Debug, Default)]
pub struct BatchAccumulator {
    images: Vec<(usize, String)>,
    skipped: usize,
    aborted: Option<BatchError>,
}

impl BatchAccumulator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record the outcome of variation `index`.
    ///
    /// Returns the batch error once the batch is aborted so the caller can stop
    /// issuing calls.
    pub fn record(&mut self, index: usize, outcome: VariationOutcome) -> Result<(), BatchError> {
        if let Some(err) = &self.aborted {
            return Err(err.clone());
        }
        match outcome {
            VariationOutcome::Image(url) => self.images.push((index, url)),
            VariationOutcome::Empty | VariationOutcome::Failed(_) => self.skipped += 1,
            VariationOutcome::RateLimited => {
                return Err(self.abort(BatchError::RateLimited {
                    retry_after_secs: RATE_LIMIT_RETRY_AFTER_SECS,
                }))
            }
            VariationOutcome::QuotaExhausted => return Err(self.abort(BatchError::QuotaExhausted)),
        }
        Ok(())
    }

    fn abort(&mut self, err: BatchError) -> BatchError {
        self.images.clear();
        self.aborted = Some(err.clone());
        err
    }

    /// Number of variations that produced nothing usable.
    pub fn skipped(&self) -> usize {
        self.skipped
    }

    /// Finish the batch: survivors sorted by variation index, or the
    /// batch-fatal / total-failure error.
    pub fn finish(self) -> Result<GeneratedBatch, BatchError> {
        if let Some(err) = self.aborted {
            return Err(err);
        }
        if self.images.is_empty() {
            return Err(BatchError::NoImages);
        }
        let mut images = self.images;
        images.sort_by_key(|(index, _)| *index);
        Ok(GeneratedBatch {
            images: images.into_iter().map(|(_, url)| url).collect(),
        })
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
