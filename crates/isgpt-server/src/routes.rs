//! HTTP routes and handlers

use axum::{
    extract::{rejection::JsonRejection, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::time::Instant;
use tracing::{debug, error, info};

use crate::state::AppState;

pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(root))
        .route("/health", get(health_check))
        .route("/metrics", get(metrics))
        .route("/infer", post(infer))
        .fallback(fallback)
        .with_state(state)
}

async fn root() -> Json<serde_json::Value> {
    Json(json!({
        "service": "isgpt API",
        "version": env!("CARGO_PKG_VERSION"),
        "endpoints": {
            "POST /infer": "Inference with JSON body",
            "GET /health": "Service health",
            "GET /metrics": "Prometheus metrics",
        }
    }))
}

async fn health_check() -> Json<serde_json::Value> {
    Json(json!({
        "status": "healthy",
        "model_loaded": true,
    }))
}

async fn metrics(State(state): State<AppState>) -> String {
    state
        .metrics_handle
        .as_ref()
        .map(|handle| handle.render())
        .unwrap_or_default()
}

/// Body of `POST /infer`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InferRequest {
    pub sentence: String,

    /// Accepted for compatibility; the per-sentence analysis always runs
    #[serde(default)]
    pub detailed: bool,

    /// Answer with the full JSON result instead of plain text
    #[serde(default)]
    pub verbose: bool,
}

async fn infer(
    State(state): State<AppState>,
    payload: Result<Json<InferRequest>, JsonRejection>,
) -> Result<Response, AppError> {
    metrics::counter!("isgpt_requests_total").increment(1);

    let Json(req) = payload.map_err(|rejection| {
        metrics::counter!("isgpt_errors_total", "type" => "invalid_request").increment(1);
        AppError::InvalidRequest(format!("Invalid JSON: {}", rejection.body_text()))
    })?;
    debug!(
        chars = req.sentence.len(),
        detailed = req.detailed,
        verbose = req.verbose,
        "Received inference request"
    );

    let detector = state.detector.clone();
    let sentence = req.sentence;
    let start = Instant::now();

    // Scoring is CPU-bound and waits on the model lock.
    let result = tokio::task::spawn_blocking(move || detector.detect(&sentence, true))
        .await
        .map_err(|e| AppError::Internal(format!("Detection task failed: {}", e)))?
        .map_err(|e| {
            error!(error = %e, "Detection failed");
            metrics::counter!("isgpt_errors_total", "type" => "detection").increment(1);
            AppError::Internal(e.to_string())
        })?;

    metrics::histogram!("isgpt_inference_latency_us").record(start.elapsed().as_micros() as f64);
    if result.is_soft_failure() {
        metrics::counter!("isgpt_soft_failures_total").increment(1);
    }
    if result.skipped_sentences > 0 {
        metrics::counter!("isgpt_sentence_failures_total")
            .increment(result.skipped_sentences as u64);
    }

    info!(
        soft_failure = result.is_soft_failure(),
        sentences = result.sentences.len(),
        elapsed_ms = start.elapsed().as_millis() as u64,
        "Inference request complete"
    );

    if req.verbose {
        Ok(Json(result).into_response())
    } else {
        Ok((
            [(header::CONTENT_TYPE, "text/plain; charset=utf-8")],
            result.to_plain_text(),
        )
            .into_response())
    }
}

async fn fallback() -> Response {
    AppError::NotFound.into_response()
}

/// Request failures surfaced to clients
#[derive(Debug)]
pub enum AppError {
    InvalidRequest(String),
    NotFound,
    Internal(String),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error_type, message) = match self {
            AppError::InvalidRequest(msg) => {
                (StatusCode::BAD_REQUEST, "invalid_request_error", msg)
            }
            AppError::NotFound => (StatusCode::NOT_FOUND, "not_found", "Not found".to_string()),
            AppError::Internal(msg) => (StatusCode::INTERNAL_SERVER_ERROR, "internal_error", msg),
        };

        let body = json!({
            "error": {
                "message": message,
                "type": error_type,
            }
        });

        (status, Json(body)).into_response()
    }
}
