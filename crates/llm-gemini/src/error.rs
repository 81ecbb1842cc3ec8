//! Error types for llm-gemini

use thiserror::Error;

/// Result type alias
pub type Result<T> = std::result::Result<T, GeminiError>;

/// Everything that can go wrong with a generation call
#[derive(Debug, Error)]
pub enum GeminiError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Gemini API {status}: {message}")]
    Api { status: u16, message: String },

    #[error("Prompt blocked: {0}")]
    Blocked(String),

    #[error("No text in response (finish reason: {0})")]
    EmptyResponse(String),
}

impl GeminiError {
    /// Whether another attempt could plausibly succeed.
    pub fn is_retryable(&self) -> bool {
        match self {
            GeminiError::Http(e) => e.is_timeout() || e.is_connect() || e.is_request(),
            GeminiError::Api { status, .. } => *status == 429 || *status >= 500,
            GeminiError::Blocked(_) | GeminiError::EmptyResponse(_) => false,
        }
    }
}
