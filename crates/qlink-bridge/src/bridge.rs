//! Request dispatch and the line-serving loop.

use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncReadExt, AsyncWrite, AsyncWriteExt};
use tracing::{debug, info, instrument, warn};

use qlink_proto::{Action, ProtoError, Reply, Request};

use crate::backend::JobBackend;
use crate::error::BridgeResult;
use crate::token::TokenStore;

/// Qubit count used when `start_job` or `start_real_ibm_job` omits it.
pub const DEFAULT_NUM_QUBITS: u32 = 1;

/// Longest request line `serve` buffers, newline included. Longer lines are
/// answered with `Invalid JSON format` and skipped.
pub const MAX_LINE_BYTES: u64 = 4096;

/// Answers device requests, one line in, one line out.
pub struct Bridge<B> {
    backend: B,
    tokens: TokenStore,
}

impl<B: JobBackend> Bridge<B> {
    /// Create a bridge over `backend`, keeping tokens in `tokens`.
    pub fn new(backend: B, tokens: TokenStore) -> Self {
        Self { backend, tokens }
    }

    /// The job backend.
    pub fn backend(&self) -> &B {
        &self.backend
    }

    /// The token store.
    pub fn tokens(&self) -> &TokenStore {
        &self.tokens
    }

    /// Answer one request line. Never fails: problems become error replies.
    #[instrument(skip(self, line), fields(backend = self.backend.name()))]
    pub async fn handle_line(&self, line: &str) -> Reply {
        let request = match Request::from_line(line) {
            Ok(request) => request,
            Err(ProtoError::InvalidJson(detail)) => {
                warn!(%detail, "rejecting malformed request");
                return Reply::invalid_json();
            }
            Err(e) => {
                warn!(error = %e, "rejecting request");
                return Reply::error(e.to_string());
            }
        };

        debug!(?request, "dispatching");
        match self.dispatch(&request).await {
            Ok(reply) => reply,
            Err(e) => {
                warn!(action = %request.action, error = %e, "request failed");
                Reply::error(e.to_string())
            }
        }
    }

    async fn dispatch(&self, request: &Request) -> BridgeResult<Reply> {
        match request.action {
            Action::StartJob => {
                let num_qubits = request.num_qubits.unwrap_or(DEFAULT_NUM_QUBITS);
                let bits = self.backend.run_immediate(num_qubits).await?;
                Ok(Reply::job_result(bits))
            }
            Action::StartRealIbmJob => {
                let num_qubits = request.num_qubits.unwrap_or(DEFAULT_NUM_QUBITS);
                let token = self.tokens.token();
                let job_id = self.backend.submit(num_qubits, token.as_deref()).await?;
                Ok(Reply::job_id(job_id))
            }
            Action::GetJobStatus => {
                let status = self.backend.status(request.require_job_id()?).await?;
                Ok(Reply::job_status(status))
            }
            Action::GetJobResult => {
                let bits = self.backend.result(request.require_job_id()?).await?;
                Ok(Reply::job_result(bits))
            }
            Action::ConfigureIbm => {
                self.tokens.save(request.require_token()?)?;
                Ok(Reply::token_configured())
            }
        }
    }

    /// Serve requests from `reader`, writing one reply line per request to
    /// `writer`, until end of input. Blank lines are skipped and bytes that
    /// are not UTF-8 are replaced. A line longer than [`MAX_LINE_BYTES`] is
    /// dropped unparsed and answered as malformed. Returns the number of
    /// requests answered.
    pub async fn serve<R, W>(&self, mut reader: R, mut writer: W) -> BridgeResult<u64>
    where
        R: AsyncBufRead + Unpin,
        W: AsyncWrite + Unpin,
    {
        info!(backend = self.backend.name(), "bridge serving");
        let mut buf = Vec::with_capacity(256);
        let mut answered = 0_u64;

        loop {
            buf.clear();
            let read = (&mut reader)
                .take(MAX_LINE_BYTES)
                .read_until(b'\n', &mut buf)
                .await?;
            if read == 0 {
                break;
            }

            let reply = if read as u64 == MAX_LINE_BYTES && buf.last() != Some(&b'\n') {
                skip_rest_of_line(&mut reader).await?;
                warn!(limit = MAX_LINE_BYTES, "rejecting overlong request line");
                Reply::invalid_json()
            } else {
                let line = String::from_utf8_lossy(&buf);
                let line = line.trim();
                if line.is_empty() {
                    continue;
                }
                self.handle_line(line).await
            };

            let mut out = reply.to_line()?;
            out.push('\n');
            writer.write_all(out.as_bytes()).await?;
            writer.flush().await?;
            answered += 1;
        }

        info!(answered, "input closed, bridge stopping");
        Ok(answered)
    }
}

/// Consume input up to and including the next newline, or to end of input.
async fn skip_rest_of_line<R: AsyncBufRead + Unpin>(reader: &mut R) -> std::io::Result<()> {
    loop {
        let available = reader.fill_buf().await?;
        if available.is_empty() {
            return Ok(());
        }
        match available.iter().position(|&b| b == b'\n') {
            Some(newline) => {
                reader.consume(newline + 1);
                return Ok(());
            }
            None => {
                let len = available.len();
                reader.consume(len);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::simulated::SimulatedBackend;
    use qlink_proto::{JOB_ID_FIELD, JobStatus, extract_bits, extract_field, is_token_ack};

    fn bridge() -> Bridge<SimulatedBackend> {
        Bridge::new(SimulatedBackend::new(), TokenStore::in_memory())
    }

    #[tokio::test]
    async fn test_start_job() {
        let reply = bridge()
            .handle_line(r#"{"action": "start_job", "num_qubits": 4}"#)
            .await;
        match reply {
            Reply::JobResult { job_result } => assert_eq!(job_result.len(), 4),
            other => panic!("unexpected reply: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_start_job_defaults_to_one_qubit() {
        let reply = bridge().handle_line(r#"{"action": "start_job"}"#).await;
        let line = reply.to_line().unwrap();
        assert_eq!(extract_bits(&line, None).unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_invalid_json() {
        let reply = bridge().handle_line("{not json").await;
        assert_eq!(reply, Reply::invalid_json());
    }

    #[tokio::test]
    async fn test_unknown_action() {
        let reply = bridge().handle_line(r#"{"action": "reboot"}"#).await;
        assert_eq!(reply, Reply::error("Unknown action: reboot"));
    }

    #[tokio::test]
    async fn test_missing_job_id() {
        let reply = bridge().handle_line(r#"{"action": "get_job_status"}"#).await;
        assert_eq!(reply, Reply::error("Missing field: job_id"));
    }

    #[tokio::test]
    async fn test_configure_ibm() {
        let bridge = bridge();
        let reply = bridge
            .handle_line(r#"{"action": "configure_ibm", "token": "tok"}"#)
            .await;
        assert!(is_token_ack(&reply.to_line().unwrap()));
        assert_eq!(bridge.tokens().token().as_deref(), Some("tok"));
    }

    #[tokio::test]
    async fn test_real_job_flow() {
        let bridge = bridge();
        let reply = bridge
            .handle_line(r#"{"action": "start_real_ibm_job", "num_qubits": 2}"#)
            .await;
        let job_id = extract_field(&reply.to_line().unwrap(), JOB_ID_FIELD).unwrap();

        let status_line = format!(r#"{{"action": "get_job_status", "job_id": "{job_id}"}}"#);
        let result_line = format!(r#"{{"action": "get_job_result", "job_id": "{job_id}"}}"#);

        assert!(bridge.handle_line(&result_line).await.is_error());
        for expected in [JobStatus::Queued, JobStatus::Running, JobStatus::Done] {
            assert_eq!(
                bridge.handle_line(&status_line).await,
                Reply::job_status(expected)
            );
        }
        match bridge.handle_line(&result_line).await {
            Reply::JobResult { job_result } => assert_eq!(job_result.len(), 2),
            other => panic!("unexpected reply: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_real_job_requires_token_when_configured() {
        let bridge = Bridge::new(
            SimulatedBackend::new().with_require_token(true),
            TokenStore::in_memory(),
        );
        let submit = r#"{"action": "start_real_ibm_job", "num_qubits": 1}"#;
        assert!(bridge.handle_line(submit).await.is_error());

        bridge
            .handle_line(r#"{"action": "configure_ibm", "token": "tok"}"#)
            .await;
        assert!(matches!(
            bridge.handle_line(submit).await,
            Reply::JobId { .. }
        ));
    }

    #[tokio::test]
    async fn test_serve_answers_each_line() {
        let input = b"{\"action\": \"start_job\", \"num_qubits\": 3}\n\n\
                      garbage\r\n\
                      {\"action\": \"configure_ibm\", \"token\": \"t\"}";
        let mut output = Vec::new();

        let answered = bridge().serve(&input[..], &mut output).await.unwrap();
        assert_eq!(answered, 3);

        let text = String::from_utf8(output).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 3);
        assert_eq!(extract_bits(lines[0], Some(3)).unwrap().len(), 3);
        assert_eq!(lines[1], r#"{"error": "Invalid JSON format"}"#);
        assert_eq!(lines[2], r#"{"status": "IBM token configured"}"#);
        assert!(text.ends_with('\n'));
    }

    #[tokio::test]
    async fn test_serve_rejects_overlong_line() {
        let mut input = vec![b'{'; MAX_LINE_BYTES as usize * 3];
        input.extend_from_slice(b"\n{\"action\": \"start_job\", \"num_qubits\": 2}\n");
        input.extend(std::iter::repeat_n(b'x', MAX_LINE_BYTES as usize + 1));
        let mut output = Vec::new();

        let answered = bridge().serve(&input[..], &mut output).await.unwrap();
        assert_eq!(answered, 3);

        let text = String::from_utf8(output).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[0], r#"{"error": "Invalid JSON format"}"#);
        assert_eq!(extract_bits(lines[1], Some(2)).unwrap().len(), 2);
        assert_eq!(lines[2], r#"{"error": "Invalid JSON format"}"#);
    }

    #[tokio::test]
    async fn test_serve_accepts_line_at_limit() {
        let request = br#"{"action": "start_job", "num_qubits": 1}"#;
        let mut input = request.to_vec();
        input.resize(MAX_LINE_BYTES as usize - 1, b' ');
        input.push(b'\n');
        let mut output = Vec::new();

        assert_eq!(bridge().serve(&input[..], &mut output).await.unwrap(), 1);
        let text = String::from_utf8(output).unwrap();
        assert_eq!(extract_bits(text.trim_end(), Some(1)).unwrap().len(), 1);
    }
}
