//! qlink wire protocol
//!
//! This crate defines the line-oriented vocabulary spoken between a small
//! device and the host that runs quantum jobs on its behalf. Every message is
//! a single JSON object terminated by `\n`.
//!
//! # Overview
//!
//! - [`Request`] and [`Action`] describe what the device asks for
//! - [`Reply`] describes what the host answers
//! - [`extract_bits`], [`extract_field`] and [`is_token_ack`] pull typed
//!   values out of a response line without requiring it to be valid JSON
//! - [`JobStatus`] is the job lifecycle vocabulary
//!
//! # Wire format
//!
//! ```text
//!   device ──→ {"action": "start_job", "num_qubits": 3}
//!   host   ──→ {"job_result": [0, 1, 1]}
//!
//!   device ──→ {"action": "start_real_ibm_job", "num_qubits": 2}
//!   host   ──→ {"job_id": "5d0c..."}
//!
//!   device ──→ {"action": "get_job_status", "job_id": "5d0c..."}
//!   host   ──→ {"job_status": "running"}
//!
//!   device ──→ {"action": "get_job_result", "job_id": "5d0c..."}
//!   host   ──→ {"job_result": [1, 0]}
//!
//!   device ──→ {"action": "configure_ibm", "token": "..."}
//!   host   ──→ {"status": "IBM token configured"}
//! ```
//!
//! Both directions use `": "` and `", "` separators (see [`to_spaced_string`])
//! so that devices matching markers byte-for-byte keep working.
//!
//! # Example
//!
//! ```
//! use qlink_proto::{Request, extract_bits};
//!
//! let line = Request::start_job(3).to_line().unwrap();
//! assert_eq!(line, r#"{"action": "start_job", "num_qubits": 3}"#);
//!
//! let bits = extract_bits(r#"{"job_result": [0, 1, 1, 0]}"#, Some(3));
//! assert_eq!(bits, Some(vec![0, 1, 1]));
//! ```

pub mod error;
pub mod extract;
pub mod format;
pub mod reply;
pub mod request;
pub mod status;

pub use error::{ProtoError, ProtoResult};
pub use extract::{
    ERROR_SENTINEL, JOB_ID_FIELD, JOB_RESULT_FIELD, JOB_STATUS_FIELD, TOKEN_ACK, TOKEN_ACK_STATUS,
    extract_bits, extract_field, field_marker, is_token_ack,
};
pub use format::{SpacedFormatter, to_spaced_string};
pub use reply::{INVALID_JSON_MESSAGE, Reply};
pub use request::{Action, Request};
pub use status::JobStatus;

/// An ordered sequence of measured bits; every element is `0` or `1`.
pub type Bits = Vec<u8>;
