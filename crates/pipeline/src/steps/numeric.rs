//! Numeric coercion of raw payload fields.

use crate::coerce::coerce_numeric;
use crate::error::Result;
use crate::frame::FeatureFrame;
use crate::traits::FeatureStep;

/// Writes every listed column as a number, 0.0 when missing or unreadable.
pub struct NumericCoercion {
    columns: Vec<String>,
}

impl NumericCoercion {
    pub fn new<I, S>(columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            columns: columns.into_iter().map(Into::into).collect(),
        }
    }
}

impl FeatureStep for NumericCoercion {
    fn name(&self) -> &str {
        "NumericCoercion"
    }

    fn apply(&self, frame: &mut FeatureFrame<'_>) -> Result<()> {
        let raw = frame.raw();
        for column in &self.columns {
            frame.set(column, coerce_numeric(raw.get(column)));
        }
        Ok(())
    }
}
