//! HTTP routes for signal ingress

use std::sync::Arc;

use axum::{
    body::Bytes,
    extract::State,
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use serde::Serialize;
use tracing::{error, info, warn};

use crate::common::errors::{PipelineError, SignalError};
use crate::common::types::{NotificationMessage, RawSignal};
use crate::notification::escape_html;
use crate::pipeline::{PipelineOutcome, SignalPipeline};

/// Shared state for the HTTP server
#[derive(Clone)]
pub struct AppState {
    pipeline: Arc<SignalPipeline>,
}

impl AppState {
    pub fn new(pipeline: SignalPipeline) -> Self {
        Self {
            pipeline: Arc::new(pipeline),
        }
    }
}

/// Create the router with all endpoints
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(health_check))
        .route("/webhook", post(webhook))
        .route("/send", post(relay))
        .with_state(state)
}

async fn health_check() -> &'static str {
    "Signal bridge active 🎯"
}

/// Body returned for an accepted signal
#[derive(Debug, Serialize)]
pub struct SignalResponse {
    pub status: &'static str,
    #[serde(flatten)]
    pub outcome: PipelineOutcome,
}

/// Run a signal through the pipeline
async fn webhook(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<Json<SignalResponse>, ApiError> {
    let raw = parse_body(&state, &body)?;
    info!("Webhook payload received: {}", raw.as_value());
    process(&state, raw).await
}

/// Echo the payload to the operator channel, then process it
async fn relay(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<Json<SignalResponse>, ApiError> {
    let raw = parse_body(&state, &body)?;
    let pretty = serde_json::to_string_pretty(raw.as_value())
        .unwrap_or_else(|_| raw.as_value().to_string());
    state.pipeline.notifier().notify(NotificationMessage::new(format!(
        "<b>📡 New signal:</b>\n<pre>{}</pre>",
        escape_html(&pretty)
    )));
    process(&state, raw).await
}

/// Decode the body, reporting undecodable payloads like any other rejection
fn parse_body(state: &AppState, body: &Bytes) -> Result<RawSignal, ApiError> {
    RawSignal::from_slice(body).map_err(|e| {
        let err = PipelineError::Signal(SignalError::Malformed("payload"));
        warn!(code = err.code(), "Body is not JSON: {}", e);
        state.pipeline.notifier().notify(NotificationMessage::new(format!(
            "❌ Signal rejected ({}): {}",
            err.code(),
            err
        )));
        ApiError(err)
    })
}

/// Run the pipeline on its own task so a panicking collaborator maps to a 500
async fn process(state: &AppState, raw: RawSignal) -> Result<Json<SignalResponse>, ApiError> {
    let pipeline = state.pipeline.clone();
    let outcome = tokio::spawn(async move { pipeline.process(&raw).await })
        .await
        .map_err(|e| {
            error!("Pipeline task failed: {}", e);
            state.pipeline.notifier().notify(NotificationMessage::new(
                "🔥 Internal error while processing a signal, see logs",
            ));
            ApiError(PipelineError::Internal(e.to_string()))
        })??;

    Ok(Json(SignalResponse {
        status: "ok",
        outcome,
    }))
}

/// Error body
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub status: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub code: Option<&'static str>,
    pub message: String,
}

/// API error wrapping a pipeline failure
#[derive(Debug)]
pub struct ApiError(pub PipelineError);

impl From<PipelineError> for ApiError {
    fn from(error: PipelineError) -> Self {
        Self(error)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> axum::response::Response {
        if self.0.is_client_error() {
            let body = ErrorResponse {
                status: "error",
                code: Some(self.0.code()),
                message: self.0.to_string(),
            };
            (StatusCode::BAD_REQUEST, Json(body)).into_response()
        } else {
            let body = ErrorResponse {
                status: "error",
                code: None,
                message: "internal error".to_string(),
            };
            (StatusCode::INTERNAL_SERVER_ERROR, Json(body)).into_response()
        }
    }
}
