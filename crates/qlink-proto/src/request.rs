//! Device-to-host requests.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::{ProtoError, ProtoResult};
use crate::format::to_spaced_string;

/// Action tag carried in every request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Action {
    /// Run a measurement immediately and answer with the bits.
    StartJob,
    /// Submit a job to IBM hardware and answer with its id.
    StartRealIbmJob,
    /// Query the status of a submitted job.
    GetJobStatus,
    /// Fetch the bits of a finished job.
    GetJobResult,
    /// Store the IBM Quantum API token on the host.
    ConfigureIbm,
}

impl Action {
    /// All actions, in wire order.
    pub const ALL: [Action; 5] = [
        Action::StartJob,
        Action::StartRealIbmJob,
        Action::GetJobStatus,
        Action::GetJobResult,
        Action::ConfigureIbm,
    ];

    /// Wire name of the action.
    pub fn as_str(self) -> &'static str {
        match self {
            Action::StartJob => "start_job",
            Action::StartRealIbmJob => "start_real_ibm_job",
            Action::GetJobStatus => "get_job_status",
            Action::GetJobResult => "get_job_result",
            Action::ConfigureIbm => "configure_ibm",
        }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Action {
    type Err = ProtoError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Action::ALL
            .into_iter()
            .find(|action| action.as_str() == s)
            .ok_or_else(|| ProtoError::UnknownAction(s.to_string()))
    }
}

/// A single request line.
///
/// Requests are built fresh for every exchange and serialized once with
/// [`Request::to_line`]. Field order on the wire is `action`, `num_qubits`,
/// `job_id`, `token`; absent fields are omitted.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Request {
    /// What the device is asking for.
    pub action: Action,
    /// Number of qubits to measure.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub num_qubits: Option<u32>,
    /// Job the request refers to.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub job_id: Option<String>,
    /// IBM Quantum API token.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub token: Option<String>,
}

impl Request {
    fn bare(action: Action) -> Self {
        Self {
            action,
            num_qubits: None,
            job_id: None,
            token: None,
        }
    }

    /// `start_job` with a qubit count.
    pub fn start_job(num_qubits: u32) -> Self {
        Self {
            num_qubits: Some(num_qubits),
            ..Self::bare(Action::StartJob)
        }
    }

    /// `start_real_ibm_job` with a qubit count.
    pub fn start_real_ibm_job(num_qubits: u32) -> Self {
        Self {
            num_qubits: Some(num_qubits),
            ..Self::bare(Action::StartRealIbmJob)
        }
    }

    /// `get_job_status` for a job.
    pub fn get_job_status(job_id: impl Into<String>) -> Self {
        Self {
            job_id: Some(job_id.into()),
            ..Self::bare(Action::GetJobStatus)
        }
    }

    /// `get_job_result` for a job.
    ///
    /// The qubit count is not sent; the caller truncates the reply itself.
    pub fn get_job_result(job_id: impl Into<String>) -> Self {
        Self {
            job_id: Some(job_id.into()),
            ..Self::bare(Action::GetJobResult)
        }
    }

    /// `configure_ibm` carrying an API token.
    pub fn configure_ibm(token: impl Into<String>) -> Self {
        Self {
            token: Some(token.into()),
            ..Self::bare(Action::ConfigureIbm)
        }
    }

    /// Serialize to a single wire line, without the trailing `\n`.
    pub fn to_line(&self) -> ProtoResult<String> {
        Ok(to_spaced_string(self)?)
    }

    /// Parse a request line received from the device.
    ///
    /// Unknown fields are ignored. `num_qubits` must be a non-negative
    /// integer, `job_id` and `token` must be strings; `null` counts as absent.
    pub fn from_line(line: &str) -> ProtoResult<Self> {
        let value: Value = serde_json::from_str(line.trim())
            .map_err(|e| ProtoError::InvalidJson(e.to_string()))?;
        let object = value
            .as_object()
            .ok_or_else(|| ProtoError::InvalidJson("expected a JSON object".to_string()))?;

        let action = object
            .get("action")
            .and_then(Value::as_str)
            .ok_or(ProtoError::MissingField("action"))?
            .parse()?;

        let num_qubits = match object.get("num_qubits") {
            None | Some(Value::Null) => None,
            Some(v) => Some(
                v.as_u64()
                    .and_then(|n| u32::try_from(n).ok())
                    .ok_or_else(|| ProtoError::InvalidField {
                        field: "num_qubits",
                        reason: format!("expected a non-negative integer, got {v}"),
                    })?,
            ),
        };

        Ok(Self {
            action,
            num_qubits,
            job_id: string_field(object, "job_id")?,
            token: string_field(object, "token")?,
        })
    }

    /// The job id, or an error when it is absent or empty.
    pub fn require_job_id(&self) -> ProtoResult<&str> {
        non_empty(self.job_id.as_deref(), "job_id")
    }

    /// The token, or an error when it is absent or empty.
    pub fn require_token(&self) -> ProtoResult<&str> {
        non_empty(self.token.as_deref(), "token")
    }
}

impl fmt::Debug for Request {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Request")
            .field("action", &self.action)
            .field("num_qubits", &self.num_qubits)
            .field("job_id", &self.job_id)
            .field("token", &self.token.as_ref().map(|_| "[REDACTED]"))
            .finish()
    }
}

fn string_field(object: &Map<String, Value>, field: &'static str) -> ProtoResult<Option<String>> {
    match object.get(field) {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(s)) => Ok(Some(s.clone())),
        Some(other) => Err(ProtoError::InvalidField {
            field,
            reason: format!("expected a string, got {other}"),
        }),
    }
}

fn non_empty<'a>(value: Option<&'a str>, field: &'static str) -> ProtoResult<&'a str> {
    match value {
        Some(v) if !v.is_empty() => Ok(v),
        Some(_) => Err(ProtoError::InvalidField {
            field,
            reason: "must not be empty".to_string(),
        }),
        None => Err(ProtoError::MissingField(field)),
    }
}
