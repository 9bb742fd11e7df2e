//! Preprocessing step implementations.
//!
//! This module contains all the concrete steps that can be composed
//! into a FeaturePipeline.

pub mod categorical;
pub mod derived;
pub mod numeric;

// Re-export for convenience
pub use categorical::{CategoricalEncoding, UnknownCategoryPolicy};
pub use derived::DerivedFeatures;
pub use numeric::NumericCoercion;
