//! HTTP routes and handlers

use axum::{
    extract::{rejection::JsonRejection, Query, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use chrono::{DateTime, Utc};
use moodring_core::{AnalysisResult, Backend};
use moodring_history::{excerpt, HistoryEntry, MAX_RECENT};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::time::Instant;
use tracing::{error, info};

use crate::state::AppState;

/// `POST /analyze` request body
#[derive(Debug, Deserialize)]
pub struct AnalyzeRequest {
    #[serde(default)]
    pub text: String,

    /// Backend name; unrecognized names and non-string values resolve to the
    /// lexicon scorer
    #[serde(default)]
    pub model: Option<Value>,
}

impl AnalyzeRequest {
    /// Requested backend, or `default` when `model` is absent or null
    pub fn backend(&self, default: Backend) -> Backend {
        match &self.model {
            None | Some(Value::Null) => default,
            Some(Value::String(name)) => Backend::from_name(name),
            Some(_) => Backend::Lexicon,
        }
    }
}

/// Analysis result as returned to clients
#[derive(Debug, Serialize)]
pub struct AnalyzeResponse {
    pub text: String,

    #[serde(flatten)]
    pub result: AnalysisResult,

    pub timestamp: DateTime<Utc>,
}

impl AnalyzeResponse {
    pub fn new(text: String, result: AnalysisResult, timestamp: DateTime<Utc>) -> Self {
        Self {
            text,
            result,
            timestamp,
        }
    }
}

pub async fn index() -> impl IntoResponse {
    metrics::counter!("moodring_requests_total", "endpoint" => "index").increment(1);

    Json(json!({
        "message": "Moodring Sentiment Analysis API",
        "version": env!("CARGO_PKG_VERSION"),
        "endpoints": {
            "/analyze": "POST - Analyze sentiment of feedback text",
            "/history": "GET - Get analysis history, DELETE - Clear it",
            "/stats": "GET - Get sentiment statistics",
            "/health": "GET - Health check",
            "/metrics": "GET - Prometheus metrics",
        },
    }))
}

pub async fn health(State(state): State<AppState>) -> impl IntoResponse {
    metrics::counter!("moodring_requests_total", "endpoint" => "health").increment(1);

    Json(json!({
        "status": "healthy",
        "timestamp": Utc::now(),
        "pretrained_available": state.engine.pretrained_available(),
    }))
}

pub async fn analyze(
    State(state): State<AppState>,
    payload: Result<Json<AnalyzeRequest>, JsonRejection>,
) -> Result<Json<AnalyzeResponse>, AppError> {
    metrics::counter!("moodring_requests_total", "endpoint" => "analyze").increment(1);

    let Json(req) = payload?;
    let text = req.text.trim().to_string();
    if text.is_empty() {
        return Err(AppError::InvalidRequest {
            error: "Empty text provided",
            message: "Please provide text to analyze".to_string(),
        });
    }

    let backend = req.backend(state.config.default_backend);

    info!("Analyzing text with {}: {}...", backend, excerpt(&text, 50));

    let start = Instant::now();
    let engine = state.engine.clone();
    let input = text.clone();
    let result = tokio::task::spawn_blocking(move || engine.analyze(&input, backend)).await?;
    metrics::histogram!("moodring_analysis_latency_us").record(start.elapsed().as_micros() as f64);
    metrics::counter!(
        "moodring_analyses_total",
        "sentiment" => result.sentiment.as_str(),
        "backend" => result.backend_used().as_str()
    )
    .increment(1);

    let timestamp = Utc::now();
    state.history.record(HistoryEntry::with_excerpt_len(
        &text,
        &result,
        timestamp,
        state.config.history.excerpt_chars,
    ));

    info!(
        "Analysis complete: {} ({:.2}%) via {}",
        result.sentiment,
        result.confidence,
        result.backend_used()
    );

    Ok(Json(AnalyzeResponse::new(text, result, timestamp)))
}

#[derive(Debug, Deserialize)]
pub struct HistoryQuery {
    pub limit: Option<String>,
}

pub async fn history(
    State(state): State<AppState>,
    Query(query): Query<HistoryQuery>,
) -> impl IntoResponse {
    metrics::counter!("moodring_requests_total", "endpoint" => "history").increment(1);

    // Unparseable limits fall back to the default
    let limit = query
        .limit
        .and_then(|raw| raw.trim().parse::<i64>().ok())
        .map(|n| n.clamp(0, MAX_RECENT as i64) as usize)
        .unwrap_or(state.config.history.default_limit);

    let (count, history) = state.history.snapshot(limit);
    Json(json!({ "count": count, "history": history }))
}

pub async fn clear_history(State(state): State<AppState>) -> impl IntoResponse {
    metrics::counter!("moodring_requests_total", "endpoint" => "clear_history").increment(1);

    let removed = state.history.clear();
    Json(json!({ "status": "cleared", "removed": removed }))
}

pub async fn stats(State(state): State<AppState>) -> impl IntoResponse {
    metrics::counter!("moodring_requests_total", "endpoint" => "stats").increment(1);

    let stats = state.history.statistics();
    if stats.is_empty() {
        Json(json!({ "message": "No analysis history available", "stats": stats }))
    } else {
        Json(json!({ "stats": stats }))
    }
}

pub async fn prometheus_metrics(State(state): State<AppState>) -> impl IntoResponse {
    (
        [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
        state.render_metrics(),
    )
}

pub async fn fallback() -> AppError {
    AppError::NotFound
}

/// Request failures, rendered as `{"error", "message"}` JSON bodies
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("{error}: {message}")]
    InvalidRequest {
        error: &'static str,
        message: String,
    },

    #[error("Not found")]
    NotFound,

    #[error("Internal server error: {0}")]
    Internal(String),
}

impl AppError {
    fn kind(&self) -> &'static str {
        match self {
            AppError::InvalidRequest { .. } => "invalid_request",
            AppError::NotFound => "not_found",
            AppError::Internal(_) => "internal",
        }
    }
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        AppError::InvalidRequest {
            error: "No JSON data provided",
            message: format!("Please send JSON data with 'text' field ({})", rejection.body_text()),
        }
    }
}

impl From<tokio::task::JoinError> for AppError {
    fn from(err: tokio::task::JoinError) -> Self {
        AppError::Internal(err.to_string())
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        metrics::counter!("moodring_errors_total", "kind" => self.kind()).increment(1);

        let (status, error, message) = match self {
            AppError::InvalidRequest { error, message } => (StatusCode::BAD_REQUEST, error, message),
            AppError::NotFound => (
                StatusCode::NOT_FOUND,
                "Not found",
                "The requested endpoint does not exist".to_string(),
            ),
            AppError::Internal(detail) => {
                error!("Request failed: {}", detail);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal server error",
                    "An unexpected error occurred".to_string(),
                )
            }
        };

        (status, Json(json!({ "error": error, "message": message }))).into_response()
    }
}
