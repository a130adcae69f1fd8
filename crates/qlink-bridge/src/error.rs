//! Error types for the bridge.

use qlink_proto::{JobStatus, ProtoError};
use thiserror::Error;

/// Errors that can occur while answering a request.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum BridgeError {
    /// The request line could not be understood.
    #[error(transparent)]
    Protocol(#[from] ProtoError),

    /// Job not found.
    #[error("Job not found: {0}")]
    JobNotFound(String),

    /// Result requested before the job finished.
    #[error("Job {id} is not finished (status: {status})")]
    JobNotFinished {
        /// Job id.
        id: String,
        /// Current status.
        status: JobStatus,
    },

    /// Job finished with an error.
    #[error("Job failed: {0}")]
    JobFailed(String),

    /// More qubits requested than the backend offers.
    #[error("Job requires {required} qubits but backend only has {available}")]
    TooManyQubits {
        /// Qubits requested.
        required: u32,
        /// Qubits available.
        available: u32,
    },

    /// Submission needs an IBM token and none has been configured.
    #[error("IBM Quantum token not configured. Send configure_ibm first.")]
    MissingToken,

    /// Token persistence failed.
    #[error("Token store error: {0}")]
    TokenStore(String),

    /// I/O error on the link.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization error.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Result type for bridge operations.
pub type BridgeResult<T> = Result<T, BridgeError>;
