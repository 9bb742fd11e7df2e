//! Engineered features for the plan recommender.

use crate::error::Result;
use crate::frame::FeatureFrame;
use crate::traits::FeatureStep;

pub const VIDEO_DATA_INTENSITY: &str = "video_data_intensity";
pub const SPEND_PER_CALL_UNIT: &str = "spend_per_call_unit";

/// Adds the two engineered columns the recommender was trained with:
///
/// - `video_data_intensity = avg_data_usage_gb * pct_video_usage`
/// - `spend_per_call_unit = monthly_spend / (avg_call_duration + 1.0)`
///
/// Inputs are read from already coerced columns when present. A duration
/// of exactly -1 yields a non-finite ratio, which the model rejects.
pub struct DerivedFeatures;

impl FeatureStep for DerivedFeatures {
    fn name(&self) -> &str {
        "DerivedFeatures"
    }

    fn apply(&self, frame: &mut FeatureFrame<'_>) -> Result<()> {
        let intensity = frame.numeric("avg_data_usage_gb") * frame.numeric("pct_video_usage");
        let spend_per_call =
            frame.numeric("monthly_spend") / (frame.numeric("avg_call_duration") + 1.0);

        frame.set(VIDEO_DATA_INTENSITY, intensity);
        frame.set(SPEND_PER_CALL_UNIT, spend_per_call);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_derived_features() {
        let raw = json!({
            "avg_data_usage_gb": 6.5,
            "pct_video_usage": 0.8,
            "monthly_spend": 90000,
            "avg_call_duration": 8
        })
        .as_object()
        .cloned()
        .unwrap();
        let mut frame = FeatureFrame::new(&raw);
        DerivedFeatures.apply(&mut frame).unwrap();

        assert!((frame.get(VIDEO_DATA_INTENSITY).unwrap() - 5.2).abs() < 1e-9);
        assert_eq!(frame.get(SPEND_PER_CALL_UNIT), Some(10000.0));
    }

    #[test]
    fn test_zero_duration_and_missing_inputs() {
        let raw = json!({"monthly_spend": 50000}).as_object().cloned().unwrap();
        let mut frame = FeatureFrame::new(&raw);
        DerivedFeatures.apply(&mut frame).unwrap();

        assert_eq!(frame.get(VIDEO_DATA_INTENSITY), Some(0.0));
        assert_eq!(frame.get(SPEND_PER_CALL_UNIT), Some(50000.0));
    }

    #[test]
    fn test_uses_coerced_columns_first() {
        let raw = json!({"monthly_spend": "not a number"}).as_object().cloned().unwrap();
        let mut frame = FeatureFrame::new(&raw);
        frame.set("monthly_spend", 30.0);
        frame.set("avg_call_duration", 2.0);
        DerivedFeatures.apply(&mut frame).unwrap();

        assert_eq!(frame.get(SPEND_PER_CALL_UNIT), Some(10.0));
    }

    #[test]
    fn test_minus_one_duration_is_not_finite() {
        let raw = json!({"monthly_spend": 10, "avg_call_duration": -1})
            .as_object()
            .cloned()
            .unwrap();
        let mut frame = FeatureFrame::new(&raw);
        DerivedFeatures.apply(&mut frame).unwrap();

        assert!(!frame.get(SPEND_PER_CALL_UNIT).unwrap().is_finite());
    }
}
