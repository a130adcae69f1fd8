//! Error types for the wire protocol.

use thiserror::Error;

/// Errors raised while reading or writing protocol messages.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ProtoError {
    /// The line is not a JSON object.
    #[error("Invalid JSON format: {0}")]
    InvalidJson(String),

    /// A field required by the action is absent.
    #[error("Missing field: {0}")]
    MissingField(&'static str),

    /// A field is present but has the wrong shape.
    #[error("Invalid field {field}: {reason}")]
    InvalidField {
        /// Field name.
        field: &'static str,
        /// What was wrong with it.
        reason: String,
    },

    /// The action tag is not one of the recognized actions.
    #[error("Unknown action: {0}")]
    UnknownAction(String),

    /// The job status is not part of the lifecycle vocabulary.
    #[error("Unknown job status: {0}")]
    UnknownStatus(String),

    /// Serialization error.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Result type for protocol operations.
pub type ProtoResult<T> = Result<T, ProtoError>;
