//! Error types for the triage pipeline.

use thiserror::Error;

use crate::models::ImportFormat;

/// Result type alias using triage's Error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Core error type for triage operations.
///
/// Every failure the pipeline itself can produce originates from
/// caller-supplied data, so the HTTP layer maps these to 4xx responses.
#[derive(Error, Debug)]
pub enum Error {
    /// One or more field constraints violated. Carries every violation,
    /// in field order, not just the first.
    #[error("Validation failed: {}", .0.join("; "))]
    Validation(Vec<String>),

    /// Raw content could not be parsed as the declared import format.
    /// Aborts the whole call; no partial record set is produced.
    #[error("Malformed {format} input: {message}")]
    MalformedInput {
        format: ImportFormat,
        message: String,
    },

    /// Import format tag outside the supported set.
    #[error("Unsupported import format: {0} (expected one of: csv, json, xml)")]
    UnsupportedFormat(String),

    /// Ticket not found
    #[error("Ticket not found: {0}")]
    TicketNotFound(uuid::Uuid),

    /// Invalid input
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Serialization/deserialization error
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// Internal error
    #[error("Internal error: {0}")]
    Internal(String),
}

impl Error {
    /// Per-message detail list for structured error responses.
    ///
    /// Validation errors expose each violated-field message; parse errors
    /// expose the underlying parser message.
    pub fn details(&self) -> Vec<String> {
        match self {
            Error::Validation(violations) => violations.clone(),
            Error::MalformedInput { message, .. } => vec![message.clone()],
            _ => Vec::new(),
        }
    }
}

impl From<serde_json::Error> for Error {
    fn from(e: serde_json::Error) -> Self {
        Error::Serialization(e.to_string())
    }
}
