//! Simulated job backend.

use std::sync::Mutex;

use async_trait::async_trait;
use rand::Rng;
use rustc_hash::FxHashMap;
use tracing::{debug, info, instrument};
use uuid::Uuid;

use qlink_proto::{Bits, JobStatus};

use crate::backend::{Job, JobBackend};
use crate::error::{BridgeError, BridgeResult};

/// Default qubit limit of the simulator.
pub const DEFAULT_MAX_QUBITS: u32 = 20;

/// Measure `num_qubits` qubits each prepared with a Hadamard gate.
///
/// Every outcome is an independent fair coin.
pub fn sample_superposition<R: Rng + ?Sized>(num_qubits: u32, rng: &mut R) -> Bits {
    (0..num_qubits).map(|_| u8::from(rng.gen_bool(0.5))).collect()
}

/// Job data for the simulator.
struct SimJob {
    job: Job,
    bits: Bits,
}

/// Local backend that samples superposition measurements.
///
/// Submitted jobs are sampled up front; each `status` query reports the
/// current state and then moves the job one step along
/// `queued → running → done`, mimicking a remote queue being polled.
pub struct SimulatedBackend {
    name: String,
    jobs: Mutex<FxHashMap<String, SimJob>>,
    max_qubits: u32,
    require_token: bool,
}

impl SimulatedBackend {
    /// Create a simulator with default settings.
    pub fn new() -> Self {
        Self {
            name: "simulator".to_string(),
            jobs: Mutex::new(FxHashMap::default()),
            max_qubits: DEFAULT_MAX_QUBITS,
            require_token: false,
        }
    }

    /// Set the qubit limit.
    pub fn with_max_qubits(mut self, max_qubits: u32) -> Self {
        self.max_qubits = max_qubits;
        self
    }

    /// Refuse `submit` until an IBM token has been configured.
    pub fn with_require_token(mut self, require_token: bool) -> Self {
        self.require_token = require_token;
        self
    }

    /// Number of jobs submitted so far.
    pub fn job_count(&self) -> usize {
        self.lock_jobs().len()
    }

    /// Snapshot of a job record.
    pub fn job(&self, job_id: &str) -> Option<Job> {
        self.lock_jobs().get(job_id).map(|sim| sim.job.clone())
    }

    fn lock_jobs(&self) -> std::sync::MutexGuard<'_, FxHashMap<String, SimJob>> {
        // A poisoned table still holds consistent records; keep serving.
        self.jobs
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
    }

    fn check_size(&self, num_qubits: u32) -> BridgeResult<()> {
        if num_qubits > self.max_qubits {
            return Err(BridgeError::TooManyQubits {
                required: num_qubits,
                available: self.max_qubits,
            });
        }
        Ok(())
    }
}

impl Default for SimulatedBackend {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl JobBackend for SimulatedBackend {
    fn name(&self) -> &str {
        &self.name
    }

    fn max_qubits(&self) -> u32 {
        self.max_qubits
    }

    #[instrument(skip(self))]
    async fn run_immediate(&self, num_qubits: u32) -> BridgeResult<Bits> {
        self.check_size(num_qubits)?;
        let bits = sample_superposition(num_qubits, &mut rand::thread_rng());
        debug!(?bits, "sampled superposition");
        Ok(bits)
    }

    #[instrument(skip(self, token))]
    async fn submit(&self, num_qubits: u32, token: Option<&str>) -> BridgeResult<String> {
        self.check_size(num_qubits)?;
        if self.require_token && token.is_none_or(str::is_empty) {
            return Err(BridgeError::MissingToken);
        }

        let id = Uuid::new_v4().to_string();
        let bits = sample_superposition(num_qubits, &mut rand::thread_rng());
        let job = Job::new(id.clone(), num_qubits, self.name.clone());

        self.lock_jobs().insert(id.clone(), SimJob { job, bits });
        info!(job_id = %id, num_qubits, "job submitted");
        Ok(id)
    }

    async fn status(&self, job_id: &str) -> BridgeResult<JobStatus> {
        let mut jobs = self.lock_jobs();
        let sim = jobs
            .get_mut(job_id)
            .ok_or_else(|| BridgeError::JobNotFound(job_id.to_string()))?;

        let current = sim.job.status;
        sim.job.set_status(current.advance());
        debug!(job_id, status = %current, "status queried");
        Ok(current)
    }

    async fn result(&self, job_id: &str) -> BridgeResult<Bits> {
        let jobs = self.lock_jobs();
        let sim = jobs
            .get(job_id)
            .ok_or_else(|| BridgeError::JobNotFound(job_id.to_string()))?;

        match sim.job.status {
            JobStatus::Done => Ok(sim.bits.clone()),
            JobStatus::Error => Err(BridgeError::JobFailed(job_id.to_string())),
            status => Err(BridgeError::JobNotFinished {
                id: job_id.to_string(),
                status,
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    #[test]
    fn test_sample_superposition_shape() {
        let mut rng = StdRng::seed_from_u64(7);
        let bits = sample_superposition(64, &mut rng);
        assert_eq!(bits.len(), 64);
        assert!(bits.iter().all(|&b| b <= 1));
        // 64 fair coins all landing the same way would be a broken sampler.
        assert!(bits.contains(&0) && bits.contains(&1));
    }

    #[test]
    fn test_sample_zero_qubits() {
        let mut rng = StdRng::seed_from_u64(1);
        assert!(sample_superposition(0, &mut rng).is_empty());
    }

    #[tokio::test]
    async fn test_run_immediate() {
        let backend = SimulatedBackend::new();
        let bits = backend.run_immediate(5).await.unwrap();
        assert_eq!(bits.len(), 5);
    }

    #[tokio::test]
    async fn test_too_many_qubits() {
        let backend = SimulatedBackend::new().with_max_qubits(4);
        assert!(matches!(
            backend.run_immediate(5).await,
            Err(BridgeError::TooManyQubits {
                required: 5,
                available: 4
            })
        ));
        assert!(backend.submit(5, None).await.is_err());
        assert_eq!(backend.job_count(), 0);
    }

    #[tokio::test]
    async fn test_job_lifecycle() {
        let backend = SimulatedBackend::new();
        let id = backend.submit(3, None).await.unwrap();

        assert!(matches!(
            backend.result(&id).await,
            Err(BridgeError::JobNotFinished {
                status: JobStatus::Queued,
                ..
            })
        ));
        assert_eq!(backend.status(&id).await.unwrap(), JobStatus::Queued);
        assert_eq!(backend.status(&id).await.unwrap(), JobStatus::Running);
        assert_eq!(backend.status(&id).await.unwrap(), JobStatus::Done);
        assert_eq!(backend.status(&id).await.unwrap(), JobStatus::Done);

        let bits = backend.result(&id).await.unwrap();
        assert_eq!(bits.len(), 3);
        assert_eq!(backend.result(&id).await.unwrap(), bits);
        assert!(backend.job(&id).unwrap().finished_at.is_some());
    }

    #[tokio::test]
    async fn test_unknown_job() {
        let backend = SimulatedBackend::new();
        assert!(matches!(
            backend.status("nope").await,
            Err(BridgeError::JobNotFound(id)) if id == "nope"
        ));
        assert!(backend.result("nope").await.is_err());
    }

    #[tokio::test]
    async fn test_require_token() {
        let backend = SimulatedBackend::new().with_require_token(true);
        assert!(matches!(
            backend.submit(1, None).await,
            Err(BridgeError::MissingToken)
        ));
        assert!(matches!(
            backend.submit(1, Some("")).await,
            Err(BridgeError::MissingToken)
        ));
        assert!(backend.submit(1, Some("tok")).await.is_ok());
    }

    #[tokio::test]
    async fn test_job_ids_are_unique() {
        let backend = SimulatedBackend::new();
        let a = backend.submit(1, None).await.unwrap();
        let b = backend.submit(1, None).await.unwrap();
        assert_ne!(a, b);
        assert_eq!(backend.job_count(), 2);
    }
}
