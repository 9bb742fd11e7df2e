//! HTTP routes.
//!
//! Handlers parse the body themselves so malformed input gets the same
//! `{"status":"error"}` shape as a failed prediction. Scoring is CPU-bound
//! and runs on the blocking pool.

use crate::responses::{
    ApiError, BatchItem, BatchResponse, ChurnResponse, ErrorBody, HealthResponse, ModelStatus,
    RecommendResponse, STATUS_SUCCESS,
};
use crate::state::AppState;
use axum::body::Bytes;
use axum::extract::State;
use axum::routing::{get, post};
use axum::{Json, Router};
use pipeline::RawRecord;
use serde_json::Value;
use tracing::{error, info, warn};

/// Build the service router over shared state.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/recommend", post(recommend))
        .route("/recommend/batch", post(recommend_batch))
        .route("/predict", post(predict_churn))
        .route("/health", get(health))
        .with_state(state)
}

fn parse_body(body: &[u8]) -> Result<Value, ApiError> {
    serde_json::from_slice(body).map_err(|e| {
        warn!("Rejected request body: {}", e);
        ApiError::BadRequest(format!("Invalid JSON body: {}", e))
    })
}

fn parse_record(body: &[u8]) -> Result<RawRecord, ApiError> {
    match parse_body(body)? {
        Value::Object(record) => Ok(record),
        _ => Err(ApiError::BadRequest("Request body must be a JSON object".to_string())),
    }
}

fn parse_records(body: &[u8]) -> Result<Vec<RawRecord>, ApiError> {
    let Value::Array(items) = parse_body(body)? else {
        return Err(ApiError::BadRequest(
            "Request body must be a JSON array of objects".to_string(),
        ));
    };

    items
        .into_iter()
        .enumerate()
        .map(|(i, item)| match item {
            Value::Object(record) => Ok(record),
            _ => Err(ApiError::BadRequest(format!("Item {} is not a JSON object", i))),
        })
        .collect()
}

async fn run_blocking<T, F>(task: F) -> Result<T, ApiError>
where
    F: FnOnce() -> Result<T, ApiError> + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(task).await.map_err(|e| {
        error!("Prediction task failed: {}", e);
        ApiError::Internal("Prediction task failed".to_string())
    })?
}

async fn recommend(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<Json<RecommendResponse>, ApiError> {
    let record = parse_record(&body)?;
    let predictor = state
        .recommender()
        .ok_or_else(|| ApiError::Internal("Recommendation model not loaded".to_string()))?;

    let recommendation = run_blocking(move || {
        predictor.predict(&record).map_err(|e| {
            error!("Recommendation failed: {}", e);
            ApiError::from(e)
        })
    })
    .await?;

    info!(
        "Recommended {} ({})",
        recommendation.recommendation, recommendation.confidence_score
    );
    Ok(Json(recommendation.into()))
}

async fn recommend_batch(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<Json<BatchResponse>, ApiError> {
    let records = parse_records(&body)?;
    let predictor = state
        .recommender()
        .ok_or_else(|| ApiError::Internal("Recommendation model not loaded".to_string()))?;

    let outcomes = run_blocking(move || Ok(predictor.predict_batch(&records))).await?;

    let results: Vec<BatchItem> = outcomes
        .into_iter()
        .map(|outcome| match outcome {
            Ok(rec) => BatchItem::Success(rec.into()),
            Err(e) => BatchItem::Error(ErrorBody::new(e.to_string())),
        })
        .collect();

    let failed = results
        .iter()
        .filter(|item| matches!(item, BatchItem::Error(_)))
        .count();
    info!("Scored batch of {} records ({} failed)", results.len(), failed);

    Ok(Json(BatchResponse {
        status: STATUS_SUCCESS,
        results,
    }))
}

async fn predict_churn(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<Json<ChurnResponse>, ApiError> {
    let record = parse_record(&body)?;
    let username = record
        .get("username")
        .and_then(Value::as_str)
        .unwrap_or("Unknown")
        .to_string();
    info!("Churn prediction requested for user: {}", username);

    let predictor = state
        .churn()
        .ok_or_else(|| ApiError::Internal("Churn model not loaded".to_string()))?;

    let assessment = run_blocking(move || {
        predictor.predict(&record).map_err(|e| {
            error!("Churn prediction failed: {}", e);
            ApiError::from(e)
        })
    })
    .await?;

    info!(
        "Churn risk for {}: {:.4} ({})",
        username, assessment.risk_score, assessment.risk_category
    );
    Ok(Json(assessment.into()))
}

async fn health(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        models: ModelStatus {
            recommendation: state.recommender().is_some(),
            churn: state.churn().is_some(),
        },
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use artifacts::{
        ChurnArtifacts, ClassifierPipeline, DecisionTree, LabelEncoder, Node,
        RecommendationBundle, StandardScaler, TreeEnsemble,
    };
    use pipeline::UnknownCategoryPolicy;
    use predictors::{ChurnPredictor, RecommendationPredictor};
    use reqwest::StatusCode;
    use serde_json::json;
    use std::collections::HashMap;
    use tokio::net::TcpListener;

    // ============================================================================
    // Test Models
    // ============================================================================

    fn encoder(classes: &[&str]) -> LabelEncoder {
        LabelEncoder::new(classes.iter().map(|s| s.to_string()).collect()).unwrap()
    }

    /// Splits on travel_score only: above 0.5 is Roaming, otherwise Basic.
    fn recommender(policy: UnknownCategoryPolicy) -> RecommendationPredictor {
        let features: Vec<String> = [
            "plan_type",
            "device_brand",
            "monthly_spend",
            "travel_score",
        ]
        .iter()
        .map(|s| s.to_string())
        .collect();

        let tree = DecisionTree::new(vec![
            Node::split(3, 0.5, 1, 2),
            Node::leaf(vec![3.0, 1.0]),
            Node::leaf(vec![0.0, 4.0]),
        ]);
        let bundle = RecommendationBundle {
            model: ClassifierPipeline::new(None, TreeEnsemble::new(4, vec![0, 1], vec![tree]).unwrap())
                .unwrap(),
            le_plan: Some(encoder(&["Postpaid", "Prepaid"])),
            le_device: Some(encoder(&["Apple", "Samsung"])),
            le_target: Some(encoder(&["Basic", "Roaming"])),
            features: Some(features),
        };
        RecommendationPredictor::new(bundle, policy).unwrap()
    }

    /// More than two complaints is a likely churner.
    fn churn() -> ChurnPredictor {
        let tree = DecisionTree::new(vec![
            Node::split(5, 2.0, 1, 2),
            Node::leaf(vec![4.0, 1.0]),
            Node::leaf(vec![1.0, 9.0]),
        ]);
        let mut encoders = HashMap::new();
        encoders.insert("plan_type".to_string(), encoder(&["Postpaid", "Prepaid"]));
        encoders.insert("device_brand".to_string(), encoder(&["Apple", "Samsung"]));

        ChurnPredictor::new(
            ChurnArtifacts {
                model: TreeEnsemble::new(6, vec![0, 1], vec![tree]).unwrap(),
                scaler: StandardScaler::new(None, None).unwrap(),
                encoders,
            },
            UnknownCategoryPolicy::FirstClass,
        )
        .unwrap()
    }

    /// Serve `state` on a random local port.
    async fn start_server(state: AppState) -> (String, tokio::task::JoinHandle<()>) {
        let listener = TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind test server");
        let addr = listener.local_addr().expect("Failed to get local address");

        let handle = tokio::spawn(async move {
            axum::serve(listener, router(state))
                .await
                .expect("Test server failed");
        });

        (format!("http://{}", addr), handle)
    }

    async fn start_full_server() -> (String, tokio::task::JoinHandle<()>) {
        start_server(AppState::new(
            Some(recommender(UnknownCategoryPolicy::FirstClass)),
            Some(churn()),
        ))
        .await
    }

    async fn post(url: String, body: impl Into<reqwest::Body>) -> (StatusCode, Value) {
        let response = reqwest::Client::new()
            .post(url)
            .header("content-type", "application/json")
            .body(body)
            .send()
            .await
            .expect("Request failed");
        let status = response.status();
        let body = response.json::<Value>().await.expect("Response is not JSON");
        (status, body)
    }

    // ============================================================================
    // /recommend
    // ============================================================================

    #[tokio::test]
    async fn test_recommend_success_shape() {
        let (base, handle) = start_full_server().await;

        let payload = json!({"travel_score": "0.9", "plan_type": "Prepaid", "device_brand": "Samsung"});
        let (status, body) = post(format!("{}/recommend", base), payload.to_string()).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "success");
        assert_eq!(body["offer_name"], "Roaming");
        assert_eq!(body["confidence"], 1.0);
        assert_eq!(body["offer_type"], "AUTO_MAPPED");

        handle.abort();
    }

    #[tokio::test]
    async fn test_recommend_empty_object_still_scores() {
        let (base, handle) = start_full_server().await;

        let (status, body) = post(format!("{}/recommend", base), "{}").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["offer_name"], "Basic");
        assert_eq!(body["confidence"], 0.75);

        handle.abort();
    }

    #[tokio::test]
    async fn test_recommend_rejects_non_object_body() {
        let (base, handle) = start_full_server().await;

        let (status, body) = post(format!("{}/recommend", base), "[1, 2, 3]").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["status"], "error");

        let (status, body) = post(format!("{}/recommend", base), "not json").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body["message"].as_str().unwrap().contains("Invalid JSON"));

        handle.abort();
    }

    #[tokio::test]
    async fn test_recommend_model_failure_is_500() {
        let (base, handle) = start_full_server().await;

        // "inf" coerces to infinity, which the model refuses
        let (status, body) = post(format!("{}/recommend", base), r#"{"travel_score": "inf"}"#).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["status"], "error");
        assert!(body["message"].is_string());

        handle.abort();
    }

    #[tokio::test]
    async fn test_reject_policy_returns_422() {
        let (base, handle) = start_server(AppState::new(
            Some(recommender(UnknownCategoryPolicy::Reject)),
            None,
        ))
        .await;

        let payload = json!({"plan_type": "Prepaid", "device_brand": "Nokia"});
        let (status, body) = post(format!("{}/recommend", base), payload.to_string()).await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert!(body["message"].as_str().unwrap().contains("Nokia"));

        handle.abort();
    }

    // ============================================================================
    // /recommend/batch
    // ============================================================================

    #[tokio::test]
    async fn test_batch_mixes_successes_and_errors() {
        let (base, handle) = start_full_server().await;

        let payload = json!([
            {"travel_score": 0.9},
            {"travel_score": "inf"},
            {"travel_score": 0.1}
        ]);
        let (status, body) = post(format!("{}/recommend/batch", base), payload.to_string()).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "success");
        let results = body["results"].as_array().unwrap();
        assert_eq!(results.len(), 3);
        assert_eq!(results[0]["offer_name"], "Roaming");
        assert_eq!(results[1]["status"], "error");
        assert_eq!(results[2]["offer_name"], "Basic");

        handle.abort();
    }

    #[tokio::test]
    async fn test_batch_requires_array_of_objects() {
        let (base, handle) = start_full_server().await;

        let (status, _) = post(format!("{}/recommend/batch", base), "{}").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        let (status, body) = post(format!("{}/recommend/batch", base), r#"[{}, 7]"#).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body["message"].as_str().unwrap().contains("Item 1"));

        handle.abort();
    }

    // ============================================================================
    // /predict
    // ============================================================================

    #[tokio::test]
    async fn test_predict_churn_success_shape() {
        let (base, handle) = start_full_server().await;

        let payload = json!({"username": "dewi", "complaint_count": 5, "plan_type": "Prepaid"});
        let (status, body) = post(format!("{}/predict", base), payload.to_string()).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "success");
        assert_eq!(body["prediction"], 1);
        assert_eq!(body["risk_score"], 0.9);
        assert_eq!(body["risk_category"], "High");
        assert_eq!(body["result"]["status"], "success");
        assert_eq!(body["result"]["risk_score"], 0.9);
        assert_eq!(body["result"]["risk_category"], "High");
        assert_eq!(body["result"]["prediction"], 1);

        handle.abort();
    }

    #[tokio::test]
    async fn test_predict_churn_low_risk() {
        let (base, handle) = start_full_server().await;

        let (status, body) = post(format!("{}/predict", base), r#"{"complaint_count": "1"}"#).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["prediction"], 0);
        assert_eq!(body["risk_category"], "Low");

        handle.abort();
    }

    // ============================================================================
    // Missing models and /health
    // ============================================================================

    #[tokio::test]
    async fn test_unloaded_models_answer_500() {
        let (base, handle) = start_server(AppState::default()).await;

        let (status, body) = post(format!("{}/recommend", base), "{}").await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["message"], "Recommendation model not loaded");

        let (status, body) = post(format!("{}/predict", base), "{}").await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["message"], "Churn model not loaded");

        handle.abort();
    }

    #[tokio::test]
    async fn test_health_reports_loaded_models() {
        let (base, handle) = start_server(AppState::new(None, Some(churn()))).await;

        let body = reqwest::get(format!("{}/health", base))
            .await
            .expect("Request failed")
            .json::<Value>()
            .await
            .expect("Response is not JSON");

        assert_eq!(body["status"], "ok");
        assert_eq!(body["models"]["recommendation"], false);
        assert_eq!(body["models"]["churn"], true);

        handle.abort();
    }
}
