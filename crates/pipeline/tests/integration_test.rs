//! Integration tests for the pipeline.
//!
//! These tests verify that coercion, engineered features, encoding and
//! reordering work together on realistic payloads.

use artifacts::LabelEncoder;
use pipeline::*;
use serde_json::{json, Value};

fn encoder(classes: &[&str]) -> LabelEncoder {
    LabelEncoder::new(classes.iter().map(|s| s.to_string()).collect()).unwrap()
}

fn record(value: Value) -> RawRecord {
    value.as_object().cloned().unwrap()
}

/// Training order deliberately differs from the order steps produce.
fn training_order() -> Vec<String> {
    [
        "plan_type",
        "device_brand",
        "avg_data_usage_gb",
        "pct_video_usage",
        "avg_call_duration",
        "sms_freq",
        "monthly_spend",
        "topup_freq",
        "travel_score",
        "complaint_count",
        "video_data_intensity",
        "spend_per_call_unit",
    ]
    .iter()
    .map(|s| s.to_string())
    .collect()
}

fn recommender(policy: UnknownCategoryPolicy) -> Preprocessor {
    recommendation_preprocessor(
        Some(encoder(&["Postpaid", "Prepaid"])),
        Some(encoder(&["Apple", "Oppo", "Realme", "Samsung", "Xiaomi"])),
        Some(training_order()),
        policy,
    )
}

#[test]
fn test_heavy_video_streamer_vector() {
    let pre = recommender(UnknownCategoryPolicy::FirstClass);
    let payload = record(json!({
        "avg_data_usage_gb": 6.5,
        "pct_video_usage": 0.75,
        "avg_call_duration": 8,
        "sms_freq": 5,
        "monthly_spend": 95000,
        "topup_freq": 3,
        "travel_score": 0.2,
        "complaint_count": 0,
        "plan_type": "Postpaid",
        "device_brand": "Samsung"
    }));

    let vector = pre.transform(&payload).unwrap();
    let expected = [
        0.0,
        3.0,
        6.5,
        0.75,
        8.0,
        5.0,
        95000.0,
        3.0,
        0.2,
        0.0,
        6.5 * 0.75,
        95000.0 / 9.0,
    ];
    assert_eq!(vector.len(), expected.len());
    for (got, want) in vector.iter().zip(expected) {
        assert!((got - want).abs() < 1e-9, "got {got}, want {want}");
    }
}

#[test]
fn test_sparse_payload_fills_defaults() {
    let pre = recommender(UnknownCategoryPolicy::FirstClass);
    let vector = pre.transform(&record(json!({"monthly_spend": 10000}))).unwrap();

    // plan_type defaults to "Prepaid" (code 1); device "Other" is unknown (code 0)
    assert_eq!(vector[0], 1.0);
    assert_eq!(vector[1], 0.0);
    assert_eq!(vector[6], 10000.0);
    assert_eq!(vector[11], 10000.0);
    assert_eq!(vector.iter().filter(|v| **v != 0.0).count(), 3);
}

#[test]
fn test_string_numbers_match_native_numbers() {
    let pre = recommender(UnknownCategoryPolicy::FirstClass);
    let native = pre
        .transform(&record(json!({"monthly_spend": 58000, "avg_call_duration": 15, "device_brand": "Realme"})))
        .unwrap();
    let textual = pre
        .transform(&record(json!({"monthly_spend": "58000", "avg_call_duration": "15", "device_brand": "Realme"})))
        .unwrap();
    assert_eq!(native, textual);
}

#[test]
fn test_reject_policy_propagates() {
    let pre = recommender(UnknownCategoryPolicy::Reject);
    let err = pre
        .transform(&record(json!({"plan_type": "Postpaid", "device_brand": "Nokia"})))
        .unwrap_err();
    assert_eq!(
        err,
        PreprocessError::UnknownCategory {
            column: "device_brand".to_string(),
            value: "Nokia".to_string(),
        }
    );
}

#[test]
fn test_feature_list_with_unproduced_column() {
    let mut order = training_order();
    order.push("tenure_months".to_string());
    let pre = recommendation_preprocessor(None, None, Some(order), UnknownCategoryPolicy::FirstClass);

    let with_value = pre.transform(&record(json!({"tenure_months": "12"}))).unwrap();
    let without = pre.transform(&record(json!({}))).unwrap();
    assert_eq!(*with_value.last().unwrap(), 12.0);
    assert_eq!(*without.last().unwrap(), 0.0);
}

#[test]
fn test_churn_unknown_defaults() {
    let mut encoders = std::collections::HashMap::new();
    encoders.insert("plan_type".to_string(), encoder(&["Postpaid", "Prepaid"]));
    let pre = churn_preprocessor(encoders, UnknownCategoryPolicy::FirstClass);

    // No device encoder and no plan value: both encode to 0
    let vector = pre.transform(&record(json!({"monthly_spend": 1}))).unwrap();
    assert_eq!(vector, vec![0.0, 0.0, 0.0, 1.0, 0.0, 0.0]);
    assert_eq!(pre.order().unwrap().len(), CHURN_FEATURE_ORDER.len());
}
