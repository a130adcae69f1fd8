//! Host-to-device replies.

use serde::{Deserialize, Serialize};

use crate::Bits;
use crate::error::ProtoResult;
use crate::extract::TOKEN_ACK_STATUS;
use crate::format::to_spaced_string;
use crate::status::JobStatus;

/// Error text sent back for a line that is not JSON.
pub const INVALID_JSON_MESSAGE: &str = "Invalid JSON format";

/// A single reply line.
///
/// Each variant serializes to a one-field object whose key is the marker the
/// device searches for.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Reply {
    /// `{"job_result": [0, 1, ...]}`
    JobResult {
        /// Measured bits.
        job_result: Bits,
    },
    /// `{"job_id": "..."}`
    JobId {
        /// Submitted job.
        job_id: String,
    },
    /// `{"job_status": "..."}`
    JobStatus {
        /// Current status.
        job_status: JobStatus,
    },
    /// `{"status": "..."}`
    Status {
        /// Free-form status text.
        status: String,
    },
    /// `{"error": "..."}`
    Error {
        /// What went wrong.
        error: String,
    },
}

impl Reply {
    /// Reply carrying measured bits.
    pub fn job_result(bits: Bits) -> Self {
        Reply::JobResult { job_result: bits }
    }

    /// Reply carrying a job id.
    pub fn job_id(id: impl Into<String>) -> Self {
        Reply::JobId { job_id: id.into() }
    }

    /// Reply carrying a job status.
    pub fn job_status(status: JobStatus) -> Self {
        Reply::JobStatus { job_status: status }
    }

    /// Acknowledgment for `configure_ibm`.
    pub fn token_configured() -> Self {
        Reply::Status {
            status: TOKEN_ACK_STATUS.to_string(),
        }
    }

    /// Reply for a line that could not be parsed.
    pub fn invalid_json() -> Self {
        Reply::error(INVALID_JSON_MESSAGE)
    }

    /// Error reply.
    pub fn error(message: impl Into<String>) -> Self {
        Reply::Error {
            error: message.into(),
        }
    }

    /// Check if this is an error reply.
    pub fn is_error(&self) -> bool {
        matches!(self, Reply::Error { .. })
    }

    /// Serialize to a single wire line, without the trailing `\n`.
    pub fn to_line(&self) -> ProtoResult<String> {
        Ok(to_spaced_string(self)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::extract::{
        JOB_ID_FIELD, JOB_STATUS_FIELD, TOKEN_ACK, extract_bits, extract_field, is_token_ack,
    };

    #[test]
    fn test_reply_lines() {
        assert_eq!(
            Reply::job_result(vec![0, 1, 1]).to_line().unwrap(),
            r#"{"job_result": [0, 1, 1]}"#
        );
        assert_eq!(
            Reply::job_id("abc123").to_line().unwrap(),
            r#"{"job_id": "abc123"}"#
        );
        assert_eq!(
            Reply::job_status(JobStatus::Running).to_line().unwrap(),
            r#"{"job_status": "running"}"#
        );
        assert_eq!(
            Reply::invalid_json().to_line().unwrap(),
            r#"{"error": "Invalid JSON format"}"#
        );
    }

    #[test]
    fn test_token_ack_line_contains_exact_marker() {
        let line = Reply::token_configured().to_line().unwrap();
        assert!(line.contains(TOKEN_ACK));
        assert!(is_token_ack(&line));
    }

    #[test]
    fn test_replies_are_readable_by_extractors() {
        let bits = Reply::job_result(vec![1, 0, 1]).to_line().unwrap();
        assert_eq!(extract_bits(&bits, Some(3)), Some(vec![1, 0, 1]));

        let id = Reply::job_id("j-1").to_line().unwrap();
        assert_eq!(extract_field(&id, JOB_ID_FIELD).as_deref(), Some("j-1"));

        let status = Reply::job_status(JobStatus::Done).to_line().unwrap();
        assert_eq!(
            extract_field(&status, JOB_STATUS_FIELD).as_deref(),
            Some("done")
        );
    }

    #[test]
    fn test_error_reply_has_no_bits() {
        let line = Reply::error("Job not found: x").to_line().unwrap();
        assert!(Reply::error("x").is_error());
        assert_eq!(extract_bits(&line, None), None);
    }
}
