use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, State},
    response::{Html, IntoResponse},
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::api::html::page;
use crate::api::response;
use crate::error::{AppError, Result};
use crate::sentiment::{KeywordModel, ModelInfo, Prediction, SentimentModel, MAX_BATCH_SIZE};

#[derive(Clone)]
pub struct SentimentState {
    pub model: Arc<dyn SentimentModel>,
}

impl SentimentState {
    pub fn new(model: impl SentimentModel + 'static) -> Self {
        Self { model: Arc::new(model) }
    }
}

impl Default for SentimentState {
    fn default() -> Self {
        Self::new(KeywordModel::default())
    }
}

#[derive(Debug, Deserialize)]
pub struct PredictRequest {
    #[serde(default)]
    pub text: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct BatchRequest {
    #[serde(default)]
    pub texts: Option<Vec<String>>,
}

#[derive(Debug, Serialize)]
pub struct PredictResponse {
    pub text: String,
    #[serde(flatten)]
    pub prediction: Prediction,
    pub timestamp: String,
}

#[derive(Debug, Serialize)]
pub struct BatchItem {
    pub index: usize,
    pub text: String,
    #[serde(flatten)]
    pub prediction: Prediction,
}

#[derive(Debug, Serialize)]
pub struct BatchResponse {
    pub results: Vec<BatchItem>,
    pub total_processed: usize,
    pub timestamp: String,
}

#[derive(Debug, Serialize)]
pub struct SentimentHealthResponse {
    pub status: String,
    pub model_loaded: bool,
    pub model: String,
    pub version: String,
    pub timestamp: String,
}

pub fn create_router(state: SentimentState) -> Router {
    Router::new()
        .route("/", get(index))
        .route("/api/predict", post(predict))
        .route("/api/batch", post(batch))
        .route("/api/model-info", get(model_info))
        .route("/health", get(health))
        .route("/api/health", get(health))
        .with_state(state)
}

async fn index() -> Html<String> {
    let body = format!(
        "<h1>Sentiment Analyzer</h1>\n\
<p>Keyword-based sentiment classification over HTTP.</p>\n\
<ul>\n\
<li><code>POST /api/predict</code> with <code>{{\"text\": \"...\"}}</code></li>\n\
<li><code>POST /api/batch</code> with <code>{{\"texts\": [\"...\"]}}</code> (max {})</li>\n\
<li><code>GET /api/model-info</code></li>\n\
<li><code>GET /api/health</code></li>\n\
</ul>",
        MAX_BATCH_SIZE
    );
    page("Sentiment Analyzer", &body)
}

async fn predict(
    State(state): State<SentimentState>,
    payload: std::result::Result<Json<PredictRequest>, JsonRejection>,
) -> Result<impl IntoResponse> {
    let Json(req) = payload?;
    let text = req
        .text
        .filter(|t| !t.trim().is_empty())
        .ok_or_else(|| AppError::bad_request("No text provided"))?;

    let prediction = state.model.predict(&text);
    debug!(sentiment = ?prediction.sentiment, confidence = prediction.confidence, "Prediction made");

    Ok(response::success(PredictResponse {
        text,
        prediction,
        timestamp: response::timestamp(),
    }))
}

async fn batch(
    State(state): State<SentimentState>,
    payload: std::result::Result<Json<BatchRequest>, JsonRejection>,
) -> Result<impl IntoResponse> {
    let Json(req) = payload?;
    let texts = req
        .texts
        .filter(|texts| !texts.is_empty())
        .ok_or_else(|| AppError::bad_request("No texts provided"))?;

    if texts.len() > MAX_BATCH_SIZE {
        return Err(AppError::bad_request(format!(
            "Maximum {} texts allowed per batch, got {}",
            MAX_BATCH_SIZE,
            texts.len()
        )));
    }

    let results: Vec<BatchItem> = texts
        .into_iter()
        .enumerate()
        .filter(|(_, text)| !text.trim().is_empty())
        .map(|(index, text)| {
            let prediction = state.model.predict(&text);
            BatchItem {
                index,
                text,
                prediction,
            }
        })
        .collect();

    info!(processed = results.len(), "Batch prediction completed");

    Ok(response::success(BatchResponse {
        total_processed: results.len(),
        results,
        timestamp: response::timestamp(),
    }))
}

async fn model_info(State(state): State<SentimentState>) -> Json<ModelInfo> {
    Json(state.model.info())
}

async fn health(State(state): State<SentimentState>) -> impl IntoResponse {
    let info = state.model.info();
    response::success(SentimentHealthResponse {
        status: "healthy".to_string(),
        model_loaded: true,
        model: info.model_name,
        version: info.version,
        timestamp: response::timestamp(),
    })
}
