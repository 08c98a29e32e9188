use actix_web::error::ResponseError;
use actix_web::http::{header, StatusCode};
use actix_web::HttpResponse;
use serde::Serialize;
use thiserror::Error;
use tracing::error;

use crate::trace_ctx;

/// Body of every failed response: `{"status":"fail","message":"..."}`.
#[derive(Debug, Serialize)]
pub struct FailEnvelope {
    pub status: &'static str,
    pub message: String,
}

impl FailEnvelope {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            status: "fail",
            message: message.into(),
        }
    }
}

#[derive(Error, Debug)]
pub enum AppError {
    /// The identity provider reported an error, the callback could not be
    /// correlated with a login, or the resulting profile was rejected.
    #[error("Provider denied: {detail}")]
    ProviderDenied { detail: String },
    #[error("No authorization header")]
    MissingHeader,
    #[error("Invalid token")]
    InvalidToken,
    #[error("Configuration error: {detail}")]
    Config { detail: String },
    #[error("Internal error: {detail}")]
    Internal { detail: String },
}

impl AppError {
    /// Message placed in the response envelope. Internal details stay in logs.
    fn message(&self) -> String {
        match self {
            AppError::ProviderDenied { .. } => "Authentication failed".to_string(),
            AppError::MissingHeader => "No authorization header".to_string(),
            AppError::InvalidToken => "Invalid token".to_string(),
            AppError::Config { detail } => detail.clone(),
            AppError::Internal { .. } => "Internal server error".to_string(),
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            AppError::ProviderDenied { .. } => StatusCode::UNAUTHORIZED,
            AppError::MissingHeader => StatusCode::UNAUTHORIZED,
            AppError::InvalidToken => StatusCode::UNAUTHORIZED,
            AppError::Config { .. } => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::Internal { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn provider_denied(detail: impl Into<String>) -> Self {
        Self::ProviderDenied {
            detail: detail.into(),
        }
    }

    pub fn missing_header() -> Self {
        Self::MissingHeader
    }

    pub fn invalid_token() -> Self {
        Self::InvalidToken
    }

    pub fn config(detail: impl Into<String>) -> Self {
        Self::Config {
            detail: detail.into(),
        }
    }

    pub fn internal(detail: impl Into<String>) -> Self {
        Self::Internal {
            detail: detail.into(),
        }
    }
}

impl ResponseError for AppError {
    fn status_code(&self) -> StatusCode {
        self.status()
    }

    fn error_response(&self) -> HttpResponse {
        let status = self.status();
        let trace_id = trace_ctx::trace_id();

        if status.is_server_error() {
            error!(%trace_id, error = %self, "request failed");
        }

        let mut builder = HttpResponse::build(status);
        builder.insert_header(("x-trace-id", trace_id));
        if status == StatusCode::UNAUTHORIZED {
            builder.insert_header((header::WWW_AUTHENTICATE, "Bearer"));
        }

        builder.json(FailEnvelope::new(self.message()))
    }
}
