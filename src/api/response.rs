use axum::http::StatusCode;
use axum::Json;
use chrono::Utc;
use serde::Serialize;

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    pub status_code: u16,
    pub timestamp: String,
}

/// RFC 3339 timestamp attached to every JSON payload.
pub fn timestamp() -> String {
    Utc::now().to_rfc3339()
}

pub fn success<T: Serialize>(data: T) -> (StatusCode, Json<T>) {
    (StatusCode::OK, Json(data))
}

pub fn error(status: StatusCode, message: String) -> (StatusCode, Json<ErrorResponse>) {
    (
        status,
        Json(ErrorResponse {
            error: message,
            status_code: status.as_u16(),
            timestamp: timestamp(),
        }),
    )
}
