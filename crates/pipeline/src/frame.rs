//! A single preprocessed row.

use crate::coerce::coerce_numeric;
use serde_json::{Map, Value};

/// A request payload as received: arbitrary JSON keys and values.
pub type RawRecord = Map<String, Value>;

/// Named numeric columns computed from one raw record.
///
/// Columns keep the order in which steps first wrote them. Writing an
/// existing column replaces its value in place.
#[derive(Debug, Clone)]
pub struct FeatureFrame<'a> {
    raw: &'a RawRecord,
    columns: Vec<(String, f64)>,
}

impl<'a> FeatureFrame<'a> {
    pub fn new(raw: &'a RawRecord) -> Self {
        Self {
            raw,
            columns: Vec::new(),
        }
    }

    pub fn raw(&self) -> &'a RawRecord {
        self.raw
    }

    pub fn set(&mut self, name: &str, value: f64) {
        match self.columns.iter_mut().find(|(column, _)| column == name) {
            Some((_, existing)) => *existing = value,
            None => self.columns.push((name.to_string(), value)),
        }
    }

    pub fn get(&self, name: &str) -> Option<f64> {
        self.columns
            .iter()
            .find(|(column, _)| column == name)
            .map(|(_, value)| *value)
    }

    /// Computed value for `name`, or the raw value coerced to a number.
    pub fn numeric(&self, name: &str) -> f64 {
        self.get(name)
            .unwrap_or_else(|| coerce_numeric(self.raw.get(name)))
    }

    pub fn column_names(&self) -> impl Iterator<Item = &str> {
        self.columns.iter().map(|(name, _)| name.as_str())
    }

    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    /// Values in the order given by `order`.
    ///
    /// A name no step produced is read from the raw record with numeric
    /// coercion, so absent columns contribute 0.0.
    pub fn select(&self, order: &[String]) -> Vec<f64> {
        order.iter().map(|name| self.numeric(name)).collect()
    }

    /// Values in column order.
    pub fn values(&self) -> Vec<f64> {
        self.columns.iter().map(|(_, value)| *value).collect()
    }

    pub fn into_columns(self) -> Vec<(String, f64)> {
        self.columns
    }
}
