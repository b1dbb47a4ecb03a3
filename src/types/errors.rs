//! Error types

use axum::{
    http::StatusCode,
    response::{Html, IntoResponse, Response},
};
use std::time::Duration;
use thiserror::Error;

/// Failure of the text-generation collaborator.
#[derive(Debug, Clone, Error)]
pub enum GenerationError {
    /// The model or tokenizer could not be constructed or reached.
    #[error("model unavailable: {0}")]
    ResourceUnavailable(String),

    #[error("generation timed out after {0:?}")]
    Timeout(Duration),

    /// The generator returned nothing usable.
    #[error("malformed generator output: {0}")]
    MalformedOutput(String),

    /// Runtime failure inside tokenization or the forward pass.
    #[error("inference failed: {0}")]
    Inference(String),
}

impl GenerationError {
    /// Whether trying the same turn again could plausibly succeed.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::ResourceUnavailable(_) | Self::Timeout(_))
    }

    pub fn kind(&self) -> &'static str {
        match self {
            Self::ResourceUnavailable(_) => "resource_unavailable",
            Self::Timeout(_) => "timeout",
            Self::MalformedOutput(_) => "malformed_output",
            Self::Inference(_) => "inference",
        }
    }
}

impl From<candle_core::Error> for GenerationError {
    fn from(e: candle_core::Error) -> Self {
        Self::Inference(e.to_string())
    }
}

/// Errors surfaced by HTTP handlers.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("session not found: {0}")]
    SessionNotFound(String),

    #[error("invalid settings: {0}")]
    InvalidSettings(String),

    #[error("template error: {0}")]
    Template(#[from] minijinja::Error),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = match &self {
            AppError::SessionNotFound(_) => StatusCode::NOT_FOUND,
            AppError::InvalidSettings(_) => StatusCode::BAD_REQUEST,
            AppError::Template(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };

        if status.is_server_error() {
            tracing::error!("Request failed: {}", self);
        } else {
            tracing::warn!("Request rejected: {}", self);
        }

        // The message may echo user input
        let body = html_escape::encode_text(&self.to_string()).to_string();
        (status, Html(format!("<div class=\"notice error\">{}</div>", body))).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_retry_policy_by_kind() {
        assert!(GenerationError::ResourceUnavailable("gone".into()).is_retryable());
        assert!(GenerationError::Timeout(Duration::from_secs(5)).is_retryable());
        assert!(!GenerationError::MalformedOutput("empty".into()).is_retryable());
        assert!(!GenerationError::Inference("nan".into()).is_retryable());
    }

    #[test]
    fn test_timeout_message() {
        let err = GenerationError::Timeout(Duration::from_secs(30));
        assert_eq!(err.to_string(), "generation timed out after 30s");
        assert_eq!(err.kind(), "timeout");

        let err = GenerationError::Timeout(Duration::from_millis(20));
        assert_eq!(err.to_string(), "generation timed out after 20ms");
    }

    #[tokio::test]
    async fn test_app_error_body_is_escaped() {
        use http_body_util::BodyExt;

        let resp = AppError::SessionNotFound("<script>x</script>".into()).into_response();
        let bytes = resp.into_body().collect().await.unwrap().to_bytes();
        let body = String::from_utf8(bytes.to_vec()).unwrap();

        assert!(body.contains("&lt;script&gt;x&lt;/script&gt;"));
        assert!(!body.contains("<script>"));
    }

    #[test]
    fn test_app_error_status() {
        let resp = AppError::SessionNotFound("abc".into()).into_response();
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);

        let resp = AppError::InvalidSettings("temperature".into()).into_response();
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    }
}
