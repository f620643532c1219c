//! Application-wide error types.

use thiserror::Error;

use crate::validation::ValidationError;

#[derive(Debug, Error)]
pub enum RegistrationError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("{0}")]
    Validation(#[from] ValidationError),

    #[error("Unsupported receipt media type: {0}")]
    UnsupportedMediaType(String),

    #[error("Preview error: {0}")]
    Preview(String),

    #[error("A registration is already being submitted")]
    SubmissionInFlight,

    /// The backend answered with a non-2xx status.
    #[error("Backend rejected registration ({status}): {}", .message.as_deref().unwrap_or("no details"))]
    Rejected {
        status: u16,
        message: Option<String>,
    },
}

impl RegistrationError {
    /// Best-effort, user-facing detail carried by the backend response.
    pub fn backend_message(&self) -> Option<&str> {
        match self {
            Self::Rejected { message, .. } => message.as_deref(),
            _ => None,
        }
    }
}

pub type Result<T> = std::result::Result<T, RegistrationError>;
