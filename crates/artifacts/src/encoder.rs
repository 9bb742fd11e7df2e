//! Fitted label encoder.
//!
//! A label encoder maps a category string to the integer code it was given
//! at training time. The vocabulary is fixed: codes are positions in
//! `classes`, and a string outside the vocabulary has no code.

use crate::error::{ArtifactError, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Category string <-> integer code mapping with a fixed vocabulary.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(try_from = "LabelEncoderRepr")]
pub struct LabelEncoder {
    classes: Vec<String>,
    #[serde(skip)]
    index: HashMap<String, usize>,
}

#[derive(Deserialize)]
struct LabelEncoderRepr {
    classes: Vec<String>,
}

impl TryFrom<LabelEncoderRepr> for LabelEncoder {
    type Error = ArtifactError;

    fn try_from(repr: LabelEncoderRepr) -> Result<Self> {
        Self::new(repr.classes)
    }
}

impl LabelEncoder {
    /// Build an encoder from its training vocabulary.
    ///
    /// Fails if a class appears twice, since two codes for one string
    /// would make `transform` ambiguous.
    pub fn new(classes: Vec<String>) -> Result<Self> {
        let mut index = HashMap::with_capacity(classes.len());
        for (code, class) in classes.iter().enumerate() {
            if index.insert(class.clone(), code).is_some() {
                return Err(ArtifactError::Invalid(format!(
                    "label encoder class '{}' appears more than once",
                    class
                )));
            }
        }
        Ok(Self { classes, index })
    }

    /// Code for `value`, or `None` when it is outside the vocabulary.
    pub fn transform(&self, value: &str) -> Option<usize> {
        self.index.get(value).copied()
    }

    pub fn contains(&self, value: &str) -> bool {
        self.index.contains_key(value)
    }

    /// Label for a class code produced by a classifier.
    pub fn inverse_transform(&self, code: i64) -> Result<&str> {
        usize::try_from(code)
            .ok()
            .and_then(|i| self.classes.get(i))
            .map(String::as_str)
            .ok_or(ArtifactError::UnknownClassCode {
                code,
                len: self.classes.len(),
            })
    }

    pub fn classes(&self) -> &[String] {
        &self.classes
    }

    pub fn len(&self) -> usize {
        self.classes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.classes.is_empty()
    }
}
