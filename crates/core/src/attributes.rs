//! Attribute records: the structured physical description of one suspect.
//!
//! A record only ever holds present values. Blank strings and `null` are
//! dropped while the record is built, so "absent" and "empty" are the same
//! thing everywhere downstream.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize, Serializer};
use serde_json::Value;

use crate::error::CoreError;
use crate::features::{FeatureKey, FeatureKind};

/// A single present feature value.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum AttributeValue {
    Text(String),
    Integer(i32),
    Decimal(f64),
}

impl fmt::Display for AttributeValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Text(s) => f.write_str(s),
            Self::Integer(n) => write!(f, "{n}"),
            Self::Decimal(n) => write!(f, "{n}"),
        }
    }
}

/// Mapping from feature key to its present value, ordered canonically.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(try_from = "BTreeMap<String, Value>")]
pub struct AttributeRecord {
    values: BTreeMap<FeatureKey, AttributeValue>,
}

impl AttributeRecord {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a feature from a raw JSON value, normalising it for the feature's kind.
    ///
    /// `null` and blank strings clear the feature. Integer and decimal features
    /// accept JSON numbers or numeric strings.
    pub fn set(&mut self, key: FeatureKey, raw: &Value) -> Result<(), CoreError> {
        match normalize(key, raw)? {
            Some(value) => {
                self.values.insert(key, value);
            }
            None => {
                self.values.remove(&key);
            }
        }
        Ok(())
    }

    /// Builder form of [`AttributeRecord::set`].
    pub fn with(mut self, key: FeatureKey, raw: impl Into<Value>) -> Result<Self, CoreError> {
        self.set(key, &raw.into())?;
        Ok(self)
    }

    pub fn get(&self, key: FeatureKey) -> Option<&AttributeValue> {
        self.values.get(&key)
    }

    /// The value rendered as prompt/report text.
    pub fn text(&self, key: FeatureKey) -> Option<String> {
        self.get(key).map(ToString::to_string)
    }

    pub fn integer(&self, key: FeatureKey) -> Option<i32> {
        match self.get(key) {
            Some(AttributeValue::Integer(n)) => Some(*n),
            _ => None,
        }
    }

    pub fn decimal(&self, key: FeatureKey) -> Option<f64> {
        match self.get(key) {
            Some(AttributeValue::Decimal(n)) => Some(*n),
            Some(AttributeValue::Integer(n)) => Some(f64::from(*n)),
            _ => None,
        }
    }

    pub fn contains(&self, key: FeatureKey) -> bool {
        self.values.contains_key(&key)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Present values in canonical order.
    pub fn iter(&self) -> impl Iterator<Item = (FeatureKey, &AttributeValue)> {
        self.values.iter().map(|(k, v)| (*k, v))
    }
}

impl TryFrom<BTreeMap<String, Value>> for AttributeRecord {
    type Error = CoreError;

    fn try_from(raw: BTreeMap<String, Value>) -> Result<Self, Self::Error> {
        let mut record = AttributeRecord::new();
        for (name, value) in &raw {
            let key: FeatureKey = name.parse()?;
            record.set(key, value)?;
        }
        Ok(record)
    }
}

impl Serialize for AttributeRecord {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.values.serialize(serializer)
    }
}

fn normalize(key: FeatureKey, raw: &Value) -> Result<Option<AttributeValue>, CoreError> {
    let kind = key.def().kind;
    let value = match raw {
        Value::Null => return Ok(None),
        Value::String(s) => {
            let trimmed = s.trim();
            if trimmed.is_empty() {
                return Ok(None);
            }
            match kind {
                FeatureKind::Text => AttributeValue::Text(trimmed.to_string()),
                FeatureKind::Integer => {
                    let n = trimmed.parse::<i32>().map_err(|_| invalid_number(key, trimmed))?;
                    AttributeValue::Integer(n)
                }
                FeatureKind::Decimal => {
                    let n = trimmed.parse::<f64>().map_err(|_| invalid_number(key, trimmed))?;
                    AttributeValue::Decimal(n)
                }
            }
        }
        Value::Number(n) => match kind {
            FeatureKind::Text => AttributeValue::Text(n.to_string()),
            FeatureKind::Integer => {
                let n = n
                    .as_i64()
                    .and_then(|v| i32::try_from(v).ok())
                    .ok_or_else(|| invalid_number(key, &n.to_string()))?;
                AttributeValue::Integer(n)
            }
            FeatureKind::Decimal => {
                let n = n.as_f64().ok_or_else(|| invalid_number(key, &n.to_string()))?;
                AttributeValue::Decimal(n)
            }
        },
        other => {
            return Err(CoreError::Validation(format!(
                "Feature '{key}' must be a string or number, got {other}"
            )))
        }
    };

    match value {
        AttributeValue::Integer(n) if n < 0 => Err(CoreError::Validation(format!(
            "Feature '{key}' must not be negative (got {n})"
        ))),
        AttributeValue::Decimal(n) if !n.is_finite() || n <= 0.0 => Err(CoreError::Validation(
            format!("Feature '{key}' must be a positive number (got {n})"),
        )),
        value => Ok(Some(value)),
    }
}

fn invalid_number(key: FeatureKey, raw: &str) -> CoreError {
    CoreError::validation(format!("Feature '{key}' expects a number, got '{raw}'"))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
