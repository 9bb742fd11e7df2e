//! JSON response shapes.
//!
//! Field names are what the Node backend reads; keep them stable.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use predictors::{ChurnAssessment, PredictionError, Recommendation, RiskCategory};
use serde::Serialize;
use thiserror::Error;

pub const STATUS_SUCCESS: &str = "success";
pub const STATUS_ERROR: &str = "error";
pub const OFFER_TYPE_AUTO_MAPPED: &str = "AUTO_MAPPED";

#[derive(Debug, Clone, Serialize)]
pub struct ErrorBody {
    pub status: &'static str,
    pub message: String,
}

impl ErrorBody {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            status: STATUS_ERROR,
            message: message.into(),
        }
    }
}

/// `POST /recommend` success body.
#[derive(Debug, Clone, Serialize)]
pub struct RecommendResponse {
    pub status: &'static str,
    pub offer_name: String,
    pub confidence: f64,
    pub offer_type: &'static str,
}

impl From<Recommendation> for RecommendResponse {
    fn from(rec: Recommendation) -> Self {
        Self {
            status: STATUS_SUCCESS,
            offer_name: rec.recommendation,
            confidence: rec.confidence_raw,
            offer_type: OFFER_TYPE_AUTO_MAPPED,
        }
    }
}

/// One entry of a batch response.
#[derive(Debug, Clone, Serialize)]
#[serde(untagged)]
pub enum BatchItem {
    Success(RecommendResponse),
    Error(ErrorBody),
}

#[derive(Debug, Clone, Serialize)]
pub struct BatchResponse {
    pub status: &'static str,
    pub results: Vec<BatchItem>,
}

/// The churn predictor's own result, echoed under `result`.
#[derive(Debug, Clone, Serialize)]
pub struct ChurnResult {
    pub status: &'static str,
    pub risk_score: f64,
    pub risk_category: RiskCategory,
    pub prediction: u8,
}

/// `POST /predict` success body.
#[derive(Debug, Clone, Serialize)]
pub struct ChurnResponse {
    pub status: &'static str,
    pub prediction: u8,
    pub risk_score: f64,
    pub risk_category: RiskCategory,
    pub result: ChurnResult,
}

impl From<ChurnAssessment> for ChurnResponse {
    fn from(assessment: ChurnAssessment) -> Self {
        Self {
            status: STATUS_SUCCESS,
            prediction: assessment.prediction,
            risk_score: assessment.risk_score,
            risk_category: assessment.risk_category,
            result: ChurnResult {
                status: STATUS_SUCCESS,
                risk_score: assessment.risk_score,
                risk_category: assessment.risk_category,
                prediction: assessment.prediction,
            },
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ModelStatus {
    pub recommendation: bool,
    pub churn: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub models: ModelStatus,
}

/// Errors returned by handlers, rendered as `{"status":"error","message":...}`.
#[derive(Error, Debug)]
pub enum ApiError {
    /// Body is not JSON of the expected shape
    #[error("{0}")]
    BadRequest(String),

    /// Well-formed request the model refuses to score
    #[error("{0}")]
    Unprocessable(String),

    /// Model missing, model failure, or a panicked worker
    #[error("{0}")]
    Internal(String),
}

impl ApiError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::Unprocessable(_) => StatusCode::UNPROCESSABLE_ENTITY,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<PredictionError> for ApiError {
    fn from(e: PredictionError) -> Self {
        if e.is_input_error() {
            ApiError::Unprocessable(e.to_string())
        } else {
            ApiError::Internal(e.to_string())
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status_code(), Json(ErrorBody::new(self.to_string()))).into_response()
    }
}
