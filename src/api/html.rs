//! Minimal inline HTML rendering shared by the landing and result pages.

use axum::http::StatusCode;
use axum::response::{Html, IntoResponse, Response};

use crate::error::AppError;

const STYLE: &str = "body{font-family:sans-serif;max-width:760px;margin:40px auto;padding:0 16px;color:#222}\
blockquote{font-size:1.3em;border-left:4px solid #888;margin:24px 0;padding-left:16px}\
pre{background:#f4f4f4;padding:12px;white-space:pre-wrap}\
.error{color:#b00020}";

pub fn escape(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for c in input.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#x27;"),
            _ => out.push(c),
        }
    }
    out
}

/// Wraps an already-escaped body fragment in a full document.
pub fn page(title: &str, body: &str) -> Html<String> {
    Html(format!(
        "<!DOCTYPE html>\n<html><head><meta charset=\"utf-8\"><title>{}</title><style>{}</style></head>\n<body>\n{}\n</body></html>",
        escape(title),
        STYLE,
        body
    ))
}

/// Error rendered as an HTML page instead of the JSON error body.
#[derive(Debug)]
pub struct HtmlError(pub AppError);

impl From<AppError> for HtmlError {
    fn from(err: AppError) -> Self {
        HtmlError(err)
    }
}

impl IntoResponse for HtmlError {
    fn into_response(self) -> Response {
        let status: StatusCode = self.0.status_code();
        tracing::warn!(status = status.as_u16(), "HTML request failed: {}", self.0);
        let body = format!(
            "<h2 class=\"error\">Error</h2>\n<p>{}</p>\n<p><a href=\"/\">Back</a></p>",
            escape(&self.0.to_string())
        );
        (status, page("Error", &body)).into_response()
    }
}
