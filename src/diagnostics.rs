//! Deployment smoke-test app: static liveness page plus an OCR engine probe.

use std::sync::Arc;

use axum::{extract::State, response::Html, routing::get, Router};

use crate::api::html::{escape, page};
use crate::ocr::{OcrEngine, OcrError};

#[derive(Clone)]
pub struct DiagnosticsState {
    pub engine: Arc<dyn OcrEngine>,
}

impl DiagnosticsState {
    pub fn new(engine: impl OcrEngine + 'static) -> Self {
        Self {
            engine: Arc::new(engine),
        }
    }
}

pub fn create_router(state: DiagnosticsState) -> Router {
    Router::new()
        .route("/", get(home))
        .route("/test-ocr", get(test_ocr))
        .route("/health", get(health))
        .with_state(state)
}

async fn home() -> Html<String> {
    page(
        "App is working",
        "<h1>&#x2705; App is working!</h1>\n<p>Deployment successful</p>",
    )
}

async fn test_ocr(State(state): State<DiagnosticsState>) -> Html<String> {
    let body = match state.engine.version().await {
        Ok(version) => format!(
            "<h2>&#x1F389; OCR Working!</h2>\n<p>Tesseract version: {}</p>",
            escape(&version)
        ),
        Err(OcrError::Unavailable(msg)) => {
            tracing::warn!("OCR engine unavailable: {}", msg);
            format!("<h2>&#x274C; OCR Unavailable:</h2>\n<p>{}</p>", escape(&msg))
        }
        Err(e) => {
            tracing::warn!("OCR engine probe failed: {}", e);
            format!("<h2>&#x26A0;&#xFE0F; OCR Error:</h2>\n<p>{}</p>", escape(&e.to_string()))
        }
    };
    page("OCR Test", &body)
}

async fn health() -> &'static str {
    "OK"
}
