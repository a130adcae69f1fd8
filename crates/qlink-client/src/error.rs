//! Error types for the exchange client.

use thiserror::Error;

/// Errors that can occur during a single request/response exchange.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ExchangeError {
    /// No inbound data arrived within the configured timeout.
    #[error("No response received from the quantum backend within {waited_ms} ms")]
    Timeout {
        /// Milliseconds spent polling.
        waited_ms: u64,
    },

    /// The channel failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The request could not be encoded.
    #[error("Encoding error: {0}")]
    Encoding(#[from] qlink_proto::ProtoError),

    /// An argument was rejected before anything was sent.
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// The serial port could not be opened.
    #[cfg(feature = "serial")]
    #[error("Serial port error: {0}")]
    Serial(#[from] serialport::Error),
}

/// Result type for exchange operations.
pub type ExchangeResult<T> = Result<T, ExchangeError>;
