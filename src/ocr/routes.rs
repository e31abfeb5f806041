use std::sync::Arc;

use axum::{
    body::Bytes,
    extract::{multipart::MultipartRejection, DefaultBodyLimit, Multipart, State},
    http::StatusCode,
    response::{Html, IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::Serialize;
use tracing::info;

use crate::api::html::{escape, page, HtmlError};
use crate::api::response;
use crate::error::{AppError, Result};
use crate::ocr::service::{validate_upload, ExtractionResult, OcrService, ValidatedUpload};
use crate::ocr::upload::ALLOWED_EXTENSIONS;

#[derive(Clone)]
pub struct OcrState {
    pub service: Arc<OcrService>,
    pub max_upload_bytes: usize,
}

impl OcrState {
    pub fn new(service: OcrService, max_upload_bytes: usize) -> Self {
        Self {
            service: Arc::new(service),
            max_upload_bytes,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ExtractResponse {
    #[serde(flatten)]
    pub result: ExtractionResult,
    pub filename: String,
    pub timestamp: String,
    pub file_size: usize,
}

#[derive(Debug, Serialize)]
pub struct OcrHealthResponse {
    pub status: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tesseract_version: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    pub timestamp: String,
}

pub fn create_router(state: OcrState) -> Router {
    let limit = state.max_upload_bytes;
    Router::new()
        .route("/", get(upload_form))
        .route("/extract", post(extract_html))
        .route("/api/extract", post(extract_json))
        .route("/health", get(health))
        .route("/api/health", get(health))
        .layer(DefaultBodyLimit::max(limit))
        .with_state(state)
}

struct ReceivedImage {
    upload: ValidatedUpload,
    bytes: Bytes,
}

/// Pulls the `image` field out of the form and validates it in memory.
async fn receive_image(
    multipart: std::result::Result<Multipart, MultipartRejection>,
) -> Result<ReceivedImage> {
    let mut multipart =
        multipart.map_err(|e| AppError::bad_request(format!("No image file provided: {}", e.body_text())))?;

    while let Some(field) = multipart.next_field().await? {
        if field.name() != Some("image") {
            continue;
        }
        let filename = field.file_name().unwrap_or_default().to_string();
        let bytes = field.bytes().await?;
        let upload = validate_upload(&filename, bytes.len())?;
        return Ok(ReceivedImage { upload, bytes });
    }

    Err(AppError::bad_request("No image file provided"))
}

async fn upload_form() -> Html<String> {
    let body = format!(
        "<h1>Image to Text (OCR)</h1>\n\
<form action=\"/extract\" method=\"post\" enctype=\"multipart/form-data\">\n\
<input type=\"file\" name=\"image\" accept=\"image/*\" required>\n\
<button type=\"submit\">Extract text</button>\n\
</form>\n\
<p>Allowed types: {}</p>",
        ALLOWED_EXTENSIONS.join(", ")
    );
    page("OCR Service", &body)
}

async fn extract_html(
    State(state): State<OcrState>,
    multipart: std::result::Result<Multipart, MultipartRejection>,
) -> std::result::Result<Html<String>, HtmlError> {
    let ReceivedImage { upload, bytes } = receive_image(multipart).await?;
    let result = state.service.extract(&upload, bytes).await?;

    let body = if result.success {
        format!(
            "<h1>Extracted Text</h1>\n<p>{} &mdash; {}</p>\n<pre>{}</pre>\n<p><a href=\"/\">Upload another image</a></p>",
            escape(&upload.filename),
            escape(&result.message),
            escape(&result.text)
        )
    } else {
        format!(
            "<h1>Extraction Failed</h1>\n<p class=\"error\">{}</p>\n<p><a href=\"/\">Try again</a></p>",
            escape(&result.message)
        )
    };
    Ok(page("OCR Result", &body))
}

async fn extract_json(
    State(state): State<OcrState>,
    multipart: std::result::Result<Multipart, MultipartRejection>,
) -> Result<impl IntoResponse> {
    let ReceivedImage { upload, bytes } = receive_image(multipart).await?;
    let file_size = bytes.len();
    info!(filename = %upload.filename, file_size, "Received image for extraction");

    let result = state.service.extract(&upload, bytes).await?;
    Ok(response::success(ExtractResponse {
        result,
        filename: upload.filename,
        timestamp: response::timestamp(),
        file_size,
    }))
}

async fn health(State(state): State<OcrState>) -> Response {
    match state.service.engine().version().await {
        Ok(version) => response::success(OcrHealthResponse {
            status: "healthy".to_string(),
            tesseract_version: Some(version),
            error: None,
            timestamp: response::timestamp(),
        })
        .into_response(),
        Err(e) => {
            tracing::warn!("OCR engine health check failed: {}", e);
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(OcrHealthResponse {
                    status: "unhealthy".to_string(),
                    tesseract_version: None,
                    error: Some(e.to_string()),
                    timestamp: response::timestamp(),
                }),
            )
                .into_response()
        }
    }
}
