use axum::{
    body::Bytes,
    extract::{rejection::BytesRejection, DefaultBodyLimit, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post, MethodRouter},
    Json, Router,
};
use std::sync::Arc;

use crate::error::AnalysisError;
use crate::handlers::AnalysisGateway;
use crate::models::AnalysisRequest;

pub struct AppState {
    pub gateway: Arc<AnalysisGateway>,
}

/// Routes: `POST /` and `POST /analyze` run an analysis, `GET /health` for probes.
pub fn create_router(gateway: Arc<AnalysisGateway>, max_body_bytes: usize) -> Router {
    let state = Arc::new(AppState { gateway });

    Router::new()
        .route("/", analyze_route())
        .route("/analyze", analyze_route())
        .route("/health", get(health_check))
        .layer(DefaultBodyLimit::max(max_body_bytes))
        .with_state(state)
}

fn analyze_route() -> MethodRouter<Arc<AppState>> {
    post(analyze_handler).fallback(method_not_allowed)
}

async fn analyze_handler(
    State(state): State<Arc<AppState>>,
    body: Result<Bytes, BytesRejection>,
) -> Response {
    let request = match body.map_err(body_rejection).and_then(|body| parse_request(&body)) {
        Ok(request) => request,
        Err(e) => {
            log::warn!("⚠️ Rejected analysis request: {}", e);
            return e.into_response();
        }
    };

    match state.gateway.analyze(request).await {
        Ok(analysis) => Json(analysis).into_response(),
        Err(e) => {
            match &e {
                AnalysisError::Upstream { status: Some(code), .. } => {
                    log::error!("❌ Analysis failed, Gemini returned HTTP {}: {}", code, e)
                }
                _ => log::error!("❌ Analysis failed: {}", e),
            }
            e.into_response()
        }
    }
}

fn body_rejection(rejection: BytesRejection) -> AnalysisError {
    if rejection.status() == StatusCode::PAYLOAD_TOO_LARGE {
        AnalysisError::PayloadTooLarge(rejection.body_text())
    } else {
        AnalysisError::MalformedRequest(rejection.body_text())
    }
}

/// Empty bodies count as a missing image; anything else must be a JSON object.
fn parse_request(body: &[u8]) -> Result<AnalysisRequest, AnalysisError> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return Err(AnalysisError::InvalidInput);
    }

    serde_json::from_slice(body).map_err(|e| AnalysisError::MalformedRequest(e.to_string()))
}

async fn method_not_allowed() -> AnalysisError {
    AnalysisError::InvalidMethod
}

async fn health_check() -> &'static str {
    "OK"
}
