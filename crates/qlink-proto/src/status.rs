//! Job lifecycle vocabulary.
//!
//! ```text
//!   submit ──→ queued ──→ running ──→ done
//!                 │           │
//!                 └───────────┴──→ error
//! ```
//!
//! Transitions are monotonic and `done`/`error` are terminal.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ProtoError;

/// Status of a job as reported on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum JobStatus {
    /// Waiting in the backend queue.
    Queued,
    /// Executing.
    Running,
    /// Finished; results are available.
    Done,
    /// Failed or cancelled.
    Error,
}

impl JobStatus {
    /// Wire name of the status.
    pub fn as_str(self) -> &'static str {
        match self {
            JobStatus::Queued => "queued",
            JobStatus::Running => "running",
            JobStatus::Done => "done",
            JobStatus::Error => "error",
        }
    }

    /// Check if this is a terminal state.
    pub fn is_terminal(self) -> bool {
        matches!(self, JobStatus::Done | JobStatus::Error)
    }

    /// Check if the job is still pending (queued or running).
    pub fn is_pending(self) -> bool {
        matches!(self, JobStatus::Queued | JobStatus::Running)
    }

    /// The next state on the success path; terminal states stay put.
    pub fn advance(self) -> Self {
        match self {
            JobStatus::Queued => JobStatus::Running,
            JobStatus::Running | JobStatus::Done => JobStatus::Done,
            JobStatus::Error => JobStatus::Error,
        }
    }
}

impl fmt::Display for JobStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for JobStatus {
    type Err = ProtoError;

    /// Accepts the wire names case-insensitively, plus the upper-case names
    /// IBM Quantum reports (`QUEUED`, `RUNNING`, `DONE`, `ERROR`,
    /// `CANCELLED`, `COMPLETED`, `FAILED`).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "queued" | "initializing" | "validating" => Ok(JobStatus::Queued),
            "running" => Ok(JobStatus::Running),
            "done" | "completed" => Ok(JobStatus::Done),
            "error" | "failed" | "cancelled" => Ok(JobStatus::Error),
            _ => Err(ProtoError::UnknownStatus(s.to_string())),
        }
    }
}
