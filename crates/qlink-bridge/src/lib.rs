//! qlink host bridge
//!
//! The host side of the serial link: reads request lines from a device,
//! runs the requested jobs on a [`JobBackend`] and writes one reply line per
//! request.
//!
//! | Action | Reply |
//! |--------|-------|
//! | `start_job` | `{"job_result": [...]}` |
//! | `start_real_ibm_job` | `{"job_id": "..."}` |
//! | `get_job_status` | `{"job_status": "queued" \| "running" \| "done" \| "error"}` |
//! | `get_job_result` | `{"job_result": [...]}` |
//! | `configure_ibm` | `{"status": "IBM token configured"}` |
//! | anything unparseable | `{"error": "Invalid JSON format"}` |
//!
//! # Example
//!
//! ```ignore
//! use qlink_bridge::{Bridge, SimulatedBackend, TokenStore};
//! use tokio::io::{BufReader, stdin, stdout};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let bridge = Bridge::new(SimulatedBackend::new(), TokenStore::in_memory());
//!     bridge.serve(BufReader::new(stdin()), stdout()).await?;
//!     Ok(())
//! }
//! ```

pub mod backend;
pub mod bridge;
pub mod error;
pub mod simulated;
pub mod token;

pub use backend::{Job, JobBackend};
pub use bridge::{Bridge, DEFAULT_NUM_QUBITS, MAX_LINE_BYTES};
pub use error::{BridgeError, BridgeResult};
pub use simulated::{DEFAULT_MAX_QUBITS, SimulatedBackend, sample_superposition};
pub use token::TokenStore;
