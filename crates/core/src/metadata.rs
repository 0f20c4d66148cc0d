//! Per-feature lock and confidence metadata.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};

use crate::error::CoreError;
use crate::features::{self, FeatureKey};

/// Confidence assumed when a feature carries no metadata (medium band).
pub const DEFAULT_CONFIDENCE: u8 = 50;

/// Upper bound of the confidence slider.
pub const MAX_CONFIDENCE: u8 = 100;

/// Upper bound (inclusive) of the low band.
const LOW_BAND_MAX: u8 = 33;
/// Upper bound (inclusive) of the medium band.
const MEDIUM_BAND_MAX: u8 = 66;

/// Low / medium / high bucket derived from a 0-100 confidence score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ConfidenceBand {
    Low,
    Medium,
    High,
}

impl ConfidenceBand {
    /// 0-33 low, 34-66 medium, 67-100 high.
    pub fn from_score(score: u8) -> Self {
        if score <= LOW_BAND_MAX {
            Self::Low
        } else if score <= MEDIUM_BAND_MAX {
            Self::Medium
        } else {
            Self::High
        }
    }

    /// Capitalised label used in reports.
    pub fn label(self) -> &'static str {
        match self {
            Self::Low => "Low",
            Self::Medium => "Medium",
            Self::High => "High",
        }
    }
}

/// Lock flag and confidence score for one feature.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeatureMeta {
    #[serde(default)]
    pub locked: bool,
    #[serde(default = "default_confidence")]
    pub confidence: u8,
}

fn default_confidence() -> u8 {
    DEFAULT_CONFIDENCE
}

impl Default for FeatureMeta {
    fn default() -> Self {
        Self {
            locked: false,
            confidence: DEFAULT_CONFIDENCE,
        }
    }
}

impl FeatureMeta {
    pub fn band(&self) -> ConfidenceBand {
        ConfidenceBand::from_score(self.confidence)
    }
}

/// Metadata for the features the investigator has touched.
///
/// Keys without an entry behave as unlocked, medium confidence.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FeatureMetadata {
    entries: BTreeMap<FeatureKey, FeatureMeta>,
}

impl FeatureMetadata {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, key: FeatureKey, meta: FeatureMeta) {
        self.entries.insert(key, meta);
    }

    /// Builder form of [`FeatureMetadata::insert`].
    pub fn with(mut self, key: FeatureKey, locked: bool, confidence: u8) -> Self {
        self.insert(key, FeatureMeta { locked, confidence });
        self
    }

    /// Metadata for `key`, falling back to the defaults.
    pub fn get(&self, key: FeatureKey) -> FeatureMeta {
        self.entries.get(&key).copied().unwrap_or_default()
    }

    /// Reject confidence scores above [`MAX_CONFIDENCE`].
    pub fn validate(&self) -> Result<(), CoreError> {
        for (key, meta) in &self.entries {
            if meta.confidence > MAX_CONFIDENCE {
                return Err(CoreError::Validation(format!(
                    "Confidence for '{key}' must be between 0 and {MAX_CONFIDENCE} (got {})",
                    meta.confidence
                )));
            }
        }
        Ok(())
    }

    /// Full lock/confidence snapshot across every schema key, defaults filled in.
    ///
    /// Returns `(featureLocks, featureConfidence)` JSON objects.
    pub fn snapshot(&self) -> (Value, Value) {
        let mut locks = Map::new();
        let mut confidence = Map::new();
        for key in features::all_keys() {
            let meta = self.get(key);
            locks.insert(key.as_str().to_string(), json!(meta.locked));
            confidence.insert(key.as_str().to_string(), json!(meta.confidence));
        }
        (Value::Object(locks), Value::Object(confidence))
    }

    /// Rebuild metadata from a persisted `(featureLocks, featureConfidence)` snapshot.
    ///
    /// Unknown keys and malformed entries are ignored.
    pub fn from_snapshot(locks: Option<&Value>, confidence: Option<&Value>) -> Self {
        let mut metadata = Self::new();
        for key in features::all_keys() {
            let locked = locks
                .and_then(|v| v.get(key.as_str()))
                .and_then(Value::as_bool)
                .unwrap_or(false);
            let score = confidence
                .and_then(|v| v.get(key.as_str()))
                .and_then(Value::as_u64)
                .and_then(|n| u8::try_from(n).ok())
                .unwrap_or(DEFAULT_CONFIDENCE);
            metadata.insert(
                key,
                FeatureMeta {
                    locked,
                    confidence: score,
                },
            );
        }
        metadata
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn band_boundaries() {
        assert_eq!(ConfidenceBand::from_score(0), ConfidenceBand::Low);
        assert_eq!(ConfidenceBand::from_score(33), ConfidenceBand::Low);
        assert_eq!(ConfidenceBand::from_score(34), ConfidenceBand::Medium);
        assert_eq!(ConfidenceBand::from_score(66), ConfidenceBand::Medium);
        assert_eq!(ConfidenceBand::from_score(67), ConfidenceBand::High);
        assert_eq!(ConfidenceBand::from_score(100), ConfidenceBand::High);
    }

    #[test]
    fn missing_entry_defaults_to_unlocked_medium() {
        let meta = FeatureMetadata::new().get(FeatureKey::EyeColor);
        assert!(!meta.locked);
        assert_eq!(meta.band(), ConfidenceBand::Medium);
    }

    #[test]
    fn deserializes_partial_entries_with_defaults() {
        let metadata: FeatureMetadata = serde_json::from_value(json!({
            "gender": { "locked": true },
            "age": { "confidence": 90, "value": "30" },
        }))
        .unwrap();
        assert_eq!(metadata.get(FeatureKey::Gender), FeatureMeta { locked: true, confidence: 50 });
        assert_eq!(metadata.get(FeatureKey::Age).band(), ConfidenceBand::High);
    }

    #[test]
    fn confidence_above_100_is_rejected() {
        let metadata = FeatureMetadata::new().with(FeatureKey::NoseShape, false, 150);
        let err = metadata.validate().unwrap_err();
        assert!(err.to_string().contains("between 0 and 100"));
    }

    #[test]
    fn snapshot_covers_every_key() {
        let metadata = FeatureMetadata::new().with(FeatureKey::SkinTone, true, 80);
        let (locks, confidence) = metadata.snapshot();
        assert_eq!(locks.as_object().unwrap().len(), 35);
        assert_eq!(locks["skin_tone"], true);
        assert_eq!(locks["gender"], false);
        assert_eq!(confidence["skin_tone"], 80);
        assert_eq!(confidence["height_feet"], 50);
    }

    #[test]
    fn snapshot_restores_metadata() {
        let original = FeatureMetadata::new().with(FeatureKey::EarSize, true, 12);
        let (locks, confidence) = original.snapshot();
        let restored = FeatureMetadata::from_snapshot(Some(&locks), Some(&confidence));
        assert_eq!(restored.get(FeatureKey::EarSize), FeatureMeta { locked: true, confidence: 12 });
        assert_eq!(restored.get(FeatureKey::Gender), FeatureMeta::default());
    }
}
