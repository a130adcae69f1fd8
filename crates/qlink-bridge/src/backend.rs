//! Job backend trait and job records.
//!
//! ```text
//!   run_immediate()                       (one-shot, no job id)
//!
//!   submit() ──→ status() ... status() ──→ result()
//!               queued → running → done
//! ```

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use qlink_proto::{Bits, JobStatus};

use crate::error::BridgeResult;

/// Backend that executes measurement jobs for the bridge.
///
/// Every job prepares each qubit in an equal superposition and measures it
/// once, so a result is one bit per qubit.
#[async_trait]
pub trait JobBackend: Send + Sync {
    /// Name of this backend.
    fn name(&self) -> &str;

    /// Largest qubit count a job may request.
    fn max_qubits(&self) -> u32;

    /// Measure `num_qubits` qubits and return the bits directly.
    async fn run_immediate(&self, num_qubits: u32) -> BridgeResult<Bits>;

    /// Submit a job and return its id. The job starts `queued`.
    async fn submit(&self, num_qubits: u32, token: Option<&str>) -> BridgeResult<String>;

    /// Current status of a job.
    async fn status(&self, job_id: &str) -> BridgeResult<JobStatus>;

    /// Bits of a job whose status is `done`.
    async fn result(&self, job_id: &str) -> BridgeResult<Bits>;
}

/// A submitted job.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Job {
    /// The job identifier.
    pub id: String,
    /// Qubits measured.
    pub num_qubits: u32,
    /// Current status.
    pub status: JobStatus,
    /// Backend the job was submitted to.
    pub backend: String,
    /// Time the job was created.
    pub created_at: DateTime<Utc>,
    /// Time the job reached a terminal state.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub finished_at: Option<DateTime<Utc>>,
}

impl Job {
    /// Create a queued job.
    pub fn new(id: impl Into<String>, num_qubits: u32, backend: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            num_qubits,
            status: JobStatus::Queued,
            backend: backend.into(),
            created_at: Utc::now(),
            finished_at: None,
        }
    }

    /// Update the status, stamping `finished_at` on the first terminal state.
    pub fn with_status(mut self, status: JobStatus) -> Self {
        self.set_status(status);
        self
    }

    /// In-place form of [`Job::with_status`].
    pub fn set_status(&mut self, status: JobStatus) {
        self.status = status;
        if self.status.is_terminal() && self.finished_at.is_none() {
            self.finished_at = Some(Utc::now());
        }
    }
}
