//! Label encoding of categorical columns.
//!
//! The column value is stringified, looked up in the fitted encoder, and
//! replaced by its training code. What happens to a value outside the
//! vocabulary is decided by [`UnknownCategoryPolicy`].

use crate::coerce::category_text;
use crate::error::{PreprocessError, Result};
use crate::frame::FeatureFrame;
use crate::traits::FeatureStep;
use artifacts::LabelEncoder;
use std::fmt;
use std::str::FromStr;
use tracing::warn;

/// Handling of categories the encoder never saw.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum UnknownCategoryPolicy {
    /// Encode as code 0, the first class of the vocabulary. This is what
    /// the deployed models were served with, so it is the default.
    #[default]
    FirstClass,
    /// Fail the request.
    Reject,
}

impl fmt::Display for UnknownCategoryPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UnknownCategoryPolicy::FirstClass => write!(f, "first-class"),
            UnknownCategoryPolicy::Reject => write!(f, "reject"),
        }
    }
}

impl FromStr for UnknownCategoryPolicy {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "first-class" | "first_class" | "fallback" => Ok(UnknownCategoryPolicy::FirstClass),
            "reject" => Ok(UnknownCategoryPolicy::Reject),
            other => Err(format!(
                "unknown category policy '{}' (expected 'first-class' or 'reject')",
                other
            )),
        }
    }
}

/// Replaces one categorical column with its encoder code.
pub struct CategoricalEncoding {
    column: String,
    default: String,
    encoder: Option<LabelEncoder>,
    policy: UnknownCategoryPolicy,
}

impl CategoricalEncoding {
    /// # Arguments
    /// * `column` - Payload field to encode
    /// * `default` - Text used when the field is absent
    /// * `encoder` - Fitted encoder, if the artifacts provide one
    /// * `policy` - What to do with values outside the vocabulary
    pub fn new(
        column: impl Into<String>,
        default: impl Into<String>,
        encoder: Option<LabelEncoder>,
        policy: UnknownCategoryPolicy,
    ) -> Self {
        Self {
            column: column.into(),
            default: default.into(),
            encoder,
            policy,
        }
    }

    pub fn column(&self) -> &str {
        &self.column
    }

    fn encode(&self, text: &str) -> Result<usize> {
        let Some(encoder) = &self.encoder else {
            return match self.policy {
                UnknownCategoryPolicy::FirstClass => {
                    warn!("No encoder for '{}', encoding as 0", self.column);
                    Ok(0)
                }
                UnknownCategoryPolicy::Reject => Err(PreprocessError::MissingEncoder {
                    column: self.column.clone(),
                }),
            };
        };

        match (encoder.transform(text), self.policy) {
            (Some(code), _) => Ok(code),
            (None, UnknownCategoryPolicy::FirstClass) => {
                warn!(
                    "Unknown {} '{}', aliased to first class '{}'",
                    self.column,
                    text,
                    encoder.classes().first().map(String::as_str).unwrap_or("")
                );
                Ok(0)
            }
            (None, UnknownCategoryPolicy::Reject) => Err(PreprocessError::UnknownCategory {
                column: self.column.clone(),
                value: text.to_string(),
            }),
        }
    }
}

impl FeatureStep for CategoricalEncoding {
    fn name(&self) -> &str {
        "CategoricalEncoding"
    }

    fn apply(&self, frame: &mut FeatureFrame<'_>) -> Result<()> {
        let text = category_text(frame.raw().get(&self.column), &self.default);
        let code = self.encode(&text)?;
        frame.set(&self.column, code as f64);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::frame::RawRecord;
    use serde_json::json;

    fn brands() -> LabelEncoder {
        LabelEncoder::new(
            ["Apple", "Oppo", "Samsung", "Xiaomi"]
                .iter()
                .map(|s| s.to_string())
                .collect(),
        )
        .unwrap()
    }

    fn encode_with(raw: &RawRecord, step: &CategoricalEncoding) -> Result<f64> {
        let mut frame = FeatureFrame::new(raw);
        step.apply(&mut frame)?;
        Ok(frame.get(step.column()).unwrap())
    }

    #[test]
    fn test_known_value() {
        let raw = json!({"device_brand": "Samsung"}).as_object().cloned().unwrap();
        let step = CategoricalEncoding::new(
            "device_brand",
            "Other",
            Some(brands()),
            UnknownCategoryPolicy::FirstClass,
        );
        assert_eq!(encode_with(&raw, &step).unwrap(), 2.0);
    }

    #[test]
    fn test_unknown_value_first_class() {
        let raw = json!({"device_brand": "Nokia"}).as_object().cloned().unwrap();
        let step = CategoricalEncoding::new(
            "device_brand",
            "Other",
            Some(brands()),
            UnknownCategoryPolicy::FirstClass,
        );
        assert_eq!(encode_with(&raw, &step).unwrap(), 0.0);
    }

    #[test]
    fn test_missing_value_uses_default_text() {
        let raw = RawRecord::new();
        let step = CategoricalEncoding::new(
            "device_brand",
            "Xiaomi",
            Some(brands()),
            UnknownCategoryPolicy::Reject,
        );
        assert_eq!(encode_with(&raw, &step).unwrap(), 3.0);
    }

    #[test]
    fn test_unknown_value_rejected() {
        let raw = json!({"device_brand": "Nokia"}).as_object().cloned().unwrap();
        let step = CategoricalEncoding::new(
            "device_brand",
            "Other",
            Some(brands()),
            UnknownCategoryPolicy::Reject,
        );
        assert_eq!(
            encode_with(&raw, &step).unwrap_err(),
            PreprocessError::UnknownCategory {
                column: "device_brand".to_string(),
                value: "Nokia".to_string(),
            }
        );
    }

    #[test]
    fn test_missing_encoder() {
        let raw = json!({"plan_type": "Postpaid"}).as_object().cloned().unwrap();
        let lenient =
            CategoricalEncoding::new("plan_type", "Prepaid", None, UnknownCategoryPolicy::FirstClass);
        assert_eq!(encode_with(&raw, &lenient).unwrap(), 0.0);

        let strict =
            CategoricalEncoding::new("plan_type", "Prepaid", None, UnknownCategoryPolicy::Reject);
        assert!(matches!(
            encode_with(&raw, &strict),
            Err(PreprocessError::MissingEncoder { .. })
        ));
    }

    #[test]
    fn test_policy_parsing() {
        assert_eq!("reject".parse::<UnknownCategoryPolicy>(), Ok(UnknownCategoryPolicy::Reject));
        assert_eq!(
            "First-Class".parse::<UnknownCategoryPolicy>(),
            Ok(UnknownCategoryPolicy::FirstClass)
        );
        assert!("drop".parse::<UnknownCategoryPolicy>().is_err());
        assert_eq!(UnknownCategoryPolicy::default().to_string(), "first-class");
    }
}
