use std::sync::Arc;

use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::{Html, IntoResponse},
    routing::get,
    Json, Router,
};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::api::html::{escape, page, HtmlError};
use crate::api::response;
use crate::error::{AppError, Result};
use crate::quotes::{today_key, Quote, QuoteBook};

#[derive(Clone)]
pub struct QuoteState {
    pub book: Arc<QuoteBook>,
}

impl QuoteState {
    pub fn new(book: QuoteBook) -> Self {
        Self { book: Arc::new(book) }
    }
}

#[derive(Debug, Deserialize)]
pub struct DailyQuery {
    pub date: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct DailyQuoteResponse {
    pub text: String,
    pub author: String,
    pub date: String,
}

#[derive(Debug, Serialize)]
pub struct AllQuotesResponse {
    pub quotes: Vec<Quote>,
    pub total: usize,
}

#[derive(Debug, Serialize)]
pub struct QuoteHealthResponse {
    pub status: String,
    pub quotes_loaded: usize,
    pub timestamp: String,
}

pub fn create_router(state: QuoteState) -> Router {
    Router::new()
        .route("/", get(index))
        .route("/daily", get(daily_page))
        .route("/random", get(random_page))
        .route("/api/quote", get(daily_quote))
        .route("/api/random", get(random_quote))
        .route("/api/all", get(all_quotes))
        .route("/health", get(health))
        .with_state(state)
}

fn quote_block(quote: &Quote) -> String {
    format!(
        "<blockquote>&ldquo;{}&rdquo;<br><small>&mdash; {}</small></blockquote>",
        escape(&quote.text),
        escape(&quote.author)
    )
}

const NAV: &str = "<p><a href=\"/\">Home</a> | <a href=\"/daily\">Quote of the day</a> | \
<a href=\"/random\">Random quote</a> | <a href=\"/api/all\">All quotes (JSON)</a></p>";

async fn index(State(state): State<QuoteState>) -> std::result::Result<Html<String>, HtmlError> {
    let quote = state.book.random()?;
    let body = format!(
        "<h1>Quote Server</h1>\n{}\n{}\n<p>{} quotes available.</p>",
        quote_block(quote),
        NAV,
        state.book.len()
    );
    Ok(page("Quote Server", &body))
}

async fn daily_page(State(state): State<QuoteState>) -> std::result::Result<Html<String>, HtmlError> {
    let date = today_key();
    let quote = state.book.daily(&date)?;
    debug!(%date, author = %quote.author, "Serving daily quote page");
    let body = format!(
        "<h1>Quote of the Day</h1>\n<p>{}</p>\n{}\n{}",
        escape(&date),
        quote_block(quote),
        NAV
    );
    Ok(page("Quote of the Day", &body))
}

async fn random_page(State(state): State<QuoteState>) -> std::result::Result<Html<String>, HtmlError> {
    let quote = state.book.random()?;
    let body = format!("<h1>Random Quote</h1>\n{}\n{}", quote_block(quote), NAV);
    Ok(page("Random Quote", &body))
}

async fn daily_quote(
    State(state): State<QuoteState>,
    Query(query): Query<DailyQuery>,
) -> Result<impl IntoResponse> {
    let date = match query.date {
        Some(raw) => NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d")
            .map(|d| d.format("%Y-%m-%d").to_string())
            .map_err(|_| AppError::bad_request(format!("Invalid date '{}', expected YYYY-MM-DD", raw)))?,
        None => today_key(),
    };

    let quote = state.book.daily(&date)?;
    info!(%date, author = %quote.author, "Daily quote selected");
    Ok(response::success(DailyQuoteResponse {
        text: quote.text.clone(),
        author: quote.author.clone(),
        date,
    }))
}

async fn random_quote(State(state): State<QuoteState>) -> Result<Json<Quote>> {
    Ok(Json(state.book.random()?.clone()))
}

async fn all_quotes(State(state): State<QuoteState>) -> impl IntoResponse {
    response::success(AllQuotesResponse {
        quotes: state.book.all().to_vec(),
        total: state.book.len(),
    })
}

async fn health(State(state): State<QuoteState>) -> impl IntoResponse {
    let (status, label) = if state.book.is_empty() {
        (StatusCode::SERVICE_UNAVAILABLE, "unhealthy")
    } else {
        (StatusCode::OK, "healthy")
    };
    (
        status,
        Json(QuoteHealthResponse {
            status: label.to_string(),
            quotes_loaded: state.book.len(),
            timestamp: response::timestamp(),
        }),
    )
}
