use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use thiserror::Error;

use crate::models::ErrorBody;

/// Why a completion could not be reduced to a JSON object
#[derive(Debug, Error)]
pub enum ExtractionError {
    #[error("Could not find JSON in response")]
    NotFound,
    #[error("Failed to parse response JSON: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Every way a single analysis request can fail
#[derive(Debug, Error)]
pub enum AnalysisError {
    #[error("Method not allowed")]
    InvalidMethod,
    #[error("Image data is required")]
    InvalidInput,
    #[error("Invalid request body: {0}")]
    MalformedRequest(String),
    #[error("Request body too large: {0}")]
    PayloadTooLarge(String),
    #[error("{message}")]
    Upstream {
        status: Option<u16>,
        message: String,
    },
    #[error("Invalid response format from Gemini API")]
    MalformedUpstreamResponse,
    #[error(transparent)]
    Extraction(#[from] ExtractionError),
    #[error("Unexpected analysis format: {0}")]
    Schema(String),
}

impl AnalysisError {
    pub fn upstream_status(status: reqwest::StatusCode, body: &str) -> Self {
        Self::Upstream {
            status: Some(status.as_u16()),
            message: format!("Gemini API error ({}): {}", status, body),
        }
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::InvalidMethod => StatusCode::METHOD_NOT_ALLOWED,
            Self::InvalidInput | Self::MalformedRequest(_) => StatusCode::BAD_REQUEST,
            Self::PayloadTooLarge(_) => StatusCode::PAYLOAD_TOO_LARGE,
            Self::Upstream { .. }
            | Self::MalformedUpstreamResponse
            | Self::Extraction(_)
            | Self::Schema(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<reqwest::Error> for AnalysisError {
    fn from(err: reqwest::Error) -> Self {
        let message = if err.is_timeout() {
            format!("Gemini API request timed out: {}", err)
        } else {
            format!("Gemini API request failed: {}", err)
        };
        Self::Upstream {
            status: err.status().map(|s| s.as_u16()),
            message,
        }
    }
}

impl IntoResponse for AnalysisError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        match self {
            // Guard failures stay plain text
            Self::InvalidMethod | Self::InvalidInput => (status, self.to_string()).into_response(),
            _ => (
                status,
                Json(ErrorBody {
                    error: self.to_string(),
                }),
            )
                .into_response(),
        }
    }
}
