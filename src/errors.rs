// src/errors.rs
use actix_web::{HttpResponse, ResponseError, http::StatusCode};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AnalyzerError {
    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Upstream AI service error: {detail}")]
    Upstream { status: Option<u16>, detail: String },

    #[error("Validation error: {0}")]
    Validation(String),
}

impl AnalyzerError {
    pub fn upstream(status: Option<u16>, detail: impl Into<String>) -> Self {
        AnalyzerError::Upstream {
            status,
            detail: detail.into(),
        }
    }
}

impl ResponseError for AnalyzerError {
    fn status_code(&self) -> StatusCode {
        match self {
            AnalyzerError::Configuration(_) => StatusCode::SERVICE_UNAVAILABLE,
            AnalyzerError::Upstream { .. } => StatusCode::BAD_GATEWAY,
            AnalyzerError::Validation(_) => StatusCode::BAD_REQUEST,
        }
    }

    fn error_response(&self) -> HttpResponse {
        match self {
            AnalyzerError::Configuration(_) => {
                HttpResponse::ServiceUnavailable().json(serde_json::json!({
                    "error": "Service not configured",
                    "message": self.to_string()
                }))
            }
            AnalyzerError::Upstream { status, .. } => {
                HttpResponse::BadGateway().json(serde_json::json!({
                    "error": "AI service error",
                    "message": self.to_string(),
                    "upstream_status": status
                }))
            }
            AnalyzerError::Validation(_) => HttpResponse::BadRequest().json(serde_json::json!({
                "error": "Validation error",
                "message": self.to_string()
            })),
        }
    }
}

/// Reasons a received reply could not be turned into a diagnosis.
#[derive(Error, Debug)]
pub enum ReplyError {
    #[error("reply body is not JSON: {0}")]
    NotJson(#[from] serde_json::Error),

    #[error("no text content in choices[0].message.content")]
    MissingContent,
}
