//! qlink Line Exchange Client
//!
//! A blocking client that asks a host for quantum jobs over a line-oriented
//! link. Every operation is one round trip:
//!
//! ```text
//!   build line ──→ write_line ──→ poll data_available ──→ read_line ──→ extract
//!                                  (sleep, until timeout)
//! ```
//!
//! # Operations
//!
//! | Operation | Returns | On failure |
//! |-----------|---------|------------|
//! | [`request_qubit_measurement`] | bits, at most `num_qubits` | empty `Vec` |
//! | [`start_real_ibm_job`] | job id | `"ERROR"` |
//! | [`get_job_status`] | status string | `"ERROR"` |
//! | [`get_job_result`] | bits, at most `num_qubits` | empty `Vec` |
//! | [`configure_ibm_token`] | `true` on acknowledgment | `false` |
//!
//! Failures (timeout, I/O error, malformed response) are logged with
//! `tracing::warn!` and collapsed into the sentinel. Use
//! [`LineExchangeClient::exchange`] for the raw response and a typed error.
//!
//! # Example
//!
//! ```ignore
//! use qlink_client::{ExchangeConfig, LineExchangeClient, SerialLineChannel};
//!
//! let channel = SerialLineChannel::open("/dev/ttyACM0", 9600, Default::default())?;
//! let mut client = LineExchangeClient::new(channel, ExchangeConfig::default());
//!
//! let bits = client.request_qubit_measurement(4);
//! println!("measured {:?}", bits);
//!
//! let job = client.start_real_ibm_job(2);
//! while client.get_job_status(&job) != "done" {}
//! let bits = client.get_job_result(&job, 2);
//! ```
//!
//! [`request_qubit_measurement`]: LineExchangeClient::request_qubit_measurement
//! [`start_real_ibm_job`]: LineExchangeClient::start_real_ibm_job
//! [`get_job_status`]: LineExchangeClient::get_job_status
//! [`get_job_result`]: LineExchangeClient::get_job_result
//! [`configure_ibm_token`]: LineExchangeClient::configure_ibm_token

pub mod channel;
pub mod client;
pub mod config;
pub mod error;
#[cfg(feature = "serial")]
pub mod serial;

pub use channel::{Clock, LineChannel, SystemClock};
pub use client::LineExchangeClient;
pub use config::ExchangeConfig;
pub use error::{ExchangeError, ExchangeResult};
#[cfg(feature = "serial")]
pub use serial::SerialLineChannel;

pub use qlink_proto::{Bits, ERROR_SENTINEL};
