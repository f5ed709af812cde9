//! Error types for the Get Notes RAG service.
//!
//! One enum covers every failure category. The three pipeline kinds are
//! `Config` (fatal at startup), `Retrieval` (recovered by the retriever) and
//! `Generation` (surfaced to the caller).

use thiserror::Error;

/// Unified error type for the workspace.
///
/// Library and transport errors are mapped into one of these variants at the
/// call site; nothing untyped crosses a crate boundary.
#[derive(Error, Debug)]
pub enum AppError {
    /// Missing credentials, unreadable config file, invalid settings
    #[error("Configuration error: {0}")]
    Config(String),

    /// Failure talking to the knowledge-base search endpoint
    #[error("Retrieval error{}: {message}", status_suffix(.status))]
    Retrieval {
        /// Upstream HTTP status, when a response was received
        status: Option<u16>,
        /// Transport error or upstream response body
        message: String,
    },

    /// Answer generation failed; no answer was produced
    #[error("Generation error: {0}")]
    Generation(String),

    /// LLM provider errors
    #[error("LLM error: {0}")]
    Llm(String),

    /// Prompt system errors
    #[error("Prompt error: {0}")]
    Prompt(String),

    /// I/O and filesystem errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization/deserialization errors
    #[error("Serialization error: {0}")]
    Serialization(String),
}

fn status_suffix(status: &Option<u16>) -> String {
    status.map(|s| format!(" (HTTP {})", s)).unwrap_or_default()
}

impl AppError {
    /// Build a retrieval error without an upstream status.
    pub fn retrieval(message: impl Into<String>) -> Self {
        AppError::Retrieval {
            status: None,
            message: message.into(),
        }
    }

    /// Build a retrieval error carrying the upstream status and body.
    pub fn retrieval_status(status: u16, body: impl Into<String>) -> Self {
        AppError::Retrieval {
            status: Some(status),
            message: body.into(),
        }
    }

    /// Whether this error means the user got no answer at all.
    pub fn is_generation(&self) -> bool {
        matches!(self, AppError::Generation(_))
    }
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        AppError::Serialization(err.to_string())
    }
}

/// Convenience type alias for Results with AppError.
pub type AppResult<T> = Result<T, AppError>;
