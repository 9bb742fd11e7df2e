//! Prediction outputs.

use serde::Serialize;
use std::fmt;

/// Probability above which a customer is classified as churning.
pub const CHURN_DECISION_THRESHOLD: f64 = 0.5;
pub const HIGH_RISK_THRESHOLD: f64 = 0.7;
pub const MEDIUM_RISK_THRESHOLD: f64 = 0.4;

/// Plan recommended for one customer.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Recommendation {
    /// Decoded plan name
    pub recommendation: String,
    /// Probability of the chosen class, 0.0 - 1.0
    pub confidence_raw: f64,
    /// `confidence_raw` as a percentage with two decimals, e.g. "87.50%"
    pub confidence_score: String,
}

impl Recommendation {
    pub fn new(recommendation: impl Into<String>, confidence_raw: f64) -> Self {
        Self {
            recommendation: recommendation.into(),
            confidence_raw,
            confidence_score: format!("{:.2}%", confidence_raw * 100.0),
        }
    }
}

/// Risk bucket over the churn probability.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum RiskCategory {
    Low,
    Medium,
    High,
}

impl RiskCategory {
    /// `High` above 0.7, `Medium` above 0.4, otherwise `Low`. Both bounds
    /// are exclusive: exactly 0.7 is `Medium`.
    pub fn from_probability(probability: f64) -> Self {
        if probability > HIGH_RISK_THRESHOLD {
            RiskCategory::High
        } else if probability > MEDIUM_RISK_THRESHOLD {
            RiskCategory::Medium
        } else {
            RiskCategory::Low
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            RiskCategory::Low => "Low",
            RiskCategory::Medium => "Medium",
            RiskCategory::High => "High",
        }
    }
}

impl fmt::Display for RiskCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Churn risk for one customer.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ChurnAssessment {
    /// Probability of churn, 0.0 - 1.0
    pub risk_score: f64,
    pub risk_category: RiskCategory,
    /// 1 when `risk_score` exceeds 0.5
    pub prediction: u8,
}

impl ChurnAssessment {
    pub fn from_probability(risk_score: f64) -> Self {
        Self {
            risk_score,
            risk_category: RiskCategory::from_probability(risk_score),
            prediction: u8::from(risk_score > CHURN_DECISION_THRESHOLD),
        }
    }
}
