//! The line exchange client.

use qlink_proto::{
    Bits, ERROR_SENTINEL, JOB_ID_FIELD, JOB_STATUS_FIELD, Request, extract_bits, extract_field,
    is_token_ack,
};
use tracing::{debug, warn};

use crate::channel::{Clock, LineChannel, SystemClock};
use crate::config::ExchangeConfig;
use crate::error::{ExchangeError, ExchangeResult};

/// Blocking request/response client over a [`LineChannel`].
///
/// Every method takes `&mut self`, so at most one request is ever in flight.
/// No state survives between calls; a failed call leaves the client usable.
pub struct LineExchangeClient<C, K = SystemClock> {
    channel: C,
    clock: K,
    config: ExchangeConfig,
}

impl<C: LineChannel> LineExchangeClient<C, SystemClock> {
    /// Create a client using the system clock.
    pub fn new(channel: C, config: ExchangeConfig) -> Self {
        Self::with_clock(channel, SystemClock::new(), config)
    }
}

impl<C: LineChannel, K: Clock> LineExchangeClient<C, K> {
    /// Create a client with an explicit clock.
    pub fn with_clock(channel: C, clock: K, config: ExchangeConfig) -> Self {
        Self {
            channel,
            clock,
            config,
        }
    }

    /// The timing configuration.
    pub fn config(&self) -> &ExchangeConfig {
        &self.config
    }

    /// Borrow the underlying channel.
    pub fn channel(&self) -> &C {
        &self.channel
    }

    /// Mutably borrow the underlying channel.
    pub fn channel_mut(&mut self) -> &mut C {
        &mut self.channel
    }

    /// Consume the client and return the channel.
    pub fn into_inner(self) -> C {
        self.channel
    }

    /// Send `request` and return the raw response line.
    ///
    /// Unread input is discarded before the request goes out.
    pub fn exchange(&mut self, request: &Request) -> ExchangeResult<String> {
        let line = request.to_line()?;

        // A reply that missed an earlier deadline must not answer this request.
        self.channel.clear_input()?;

        debug!(action = %request.action, "sending request");
        self.channel.write_line(&line)?;

        self.wait_for_response()?;

        let response = self.channel.read_line()?;
        debug!(action = %request.action, response = %response, "received response");
        Ok(response)
    }

    /// Poll `data_available`, sleeping between checks, until data arrives or
    /// more than `timeout_ms` has elapsed.
    fn wait_for_response(&mut self) -> ExchangeResult<()> {
        let start = self.clock.now_ms();
        loop {
            if self.channel.data_available()? {
                return Ok(());
            }
            let waited_ms = self.clock.now_ms().saturating_sub(start);
            if waited_ms > self.config.timeout_ms {
                return Err(ExchangeError::Timeout { waited_ms });
            }
            self.clock.sleep_ms(self.config.poll_interval_ms);
        }
    }

    /// Ask the host to measure `num_qubits` qubits right away.
    ///
    /// Returns at most `num_qubits` bits; empty on timeout or a malformed
    /// response.
    pub fn request_qubit_measurement(&mut self, num_qubits: u32) -> Bits {
        self.fetch_bits(&Request::start_job(num_qubits), num_qubits)
    }

    /// Submit a job to IBM hardware via the host.
    ///
    /// Returns the job id, or `"ERROR"` on timeout or when the response has
    /// no `job_id`.
    pub fn start_real_ibm_job(&mut self, num_qubits: u32) -> String {
        self.fetch_field(&Request::start_real_ibm_job(num_qubits), JOB_ID_FIELD)
    }

    /// Query the status of a submitted job.
    ///
    /// Returns the status text as sent by the host, or `"ERROR"`.
    pub fn get_job_status(&mut self, job_id: &str) -> String {
        if let Err(e) = require_non_empty(job_id, "job id") {
            warn!(error = %e, "not sending get_job_status");
            return ERROR_SENTINEL.to_string();
        }
        self.fetch_field(&Request::get_job_status(job_id), JOB_STATUS_FIELD)
    }

    /// Fetch the bits of a finished job, truncated to `num_qubits`.
    pub fn get_job_result(&mut self, job_id: &str, num_qubits: u32) -> Bits {
        if let Err(e) = require_non_empty(job_id, "job id") {
            warn!(error = %e, "not sending get_job_result");
            return Bits::new();
        }
        self.fetch_bits(&Request::get_job_result(job_id), num_qubits)
    }

    /// Hand an IBM Quantum API token to the host.
    ///
    /// Returns `true` only when the host acknowledges with
    /// `"status": "IBM token configured"`.
    pub fn configure_ibm_token(&mut self, token: &str) -> bool {
        if let Err(e) = require_non_empty(token, "token") {
            warn!(error = %e, "not sending configure_ibm");
            return false;
        }
        match self.exchange(&Request::configure_ibm(token)) {
            Ok(response) if is_token_ack(&response) => true,
            Ok(response) => {
                warn!(response = %response, "IBM token was not acknowledged");
                false
            }
            Err(e) => {
                warn!(error = %e, "configure_ibm failed");
                false
            }
        }
    }

    fn fetch_bits(&mut self, request: &Request, num_qubits: u32) -> Bits {
        let response = match self.exchange(request) {
            Ok(response) => response,
            Err(e) => {
                warn!(action = %request.action, error = %e, "request failed");
                return Bits::new();
            }
        };

        match extract_bits(&response, Some(num_qubits as usize)) {
            Some(bits) => bits,
            None => {
                warn!(
                    action = %request.action,
                    response = %response,
                    "Invalid JSON format: no bracketed bit list in response"
                );
                Bits::new()
            }
        }
    }

    fn fetch_field(&mut self, request: &Request, field: &str) -> String {
        let response = match self.exchange(request) {
            Ok(response) => response,
            Err(e) => {
                warn!(action = %request.action, error = %e, "request failed");
                return ERROR_SENTINEL.to_string();
            }
        };

        extract_field(&response, field).unwrap_or_else(|| {
            warn!(
                action = %request.action,
                response = %response,
                "Invalid {field} format in response"
            );
            ERROR_SENTINEL.to_string()
        })
    }
}

fn require_non_empty(value: &str, what: &str) -> ExchangeResult<()> {
    if value.is_empty() {
        Err(ExchangeError::InvalidInput(format!("{what} must not be empty")))
    } else {
        Ok(())
    }
}
