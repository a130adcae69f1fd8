//! [`LineChannel`] over a hardware serial port.

use std::io::{self, Read, Write};
use std::time::Duration;

use serialport::SerialPort;
use tracing::debug;

use crate::channel::LineChannel;
use crate::error::ExchangeResult;

/// Default per-read timeout; a line that stalls this long is returned as is.
pub const DEFAULT_READ_TIMEOUT: Duration = Duration::from_millis(1000);

/// A serial port speaking newline-terminated lines.
pub struct SerialLineChannel {
    port: Box<dyn SerialPort>,
    pending: Vec<u8>,
}

impl SerialLineChannel {
    /// Open `path` at `baud_rate` with the given per-read timeout.
    pub fn open(path: &str, baud_rate: u32, read_timeout: Duration) -> ExchangeResult<Self> {
        let port = serialport::new(path, baud_rate)
            .timeout(read_timeout)
            .open()?;
        debug!(path, baud_rate, "opened serial port");
        Ok(Self::from_port(port))
    }

    /// Wrap an already configured port.
    pub fn from_port(port: Box<dyn SerialPort>) -> Self {
        Self {
            port,
            pending: Vec::new(),
        }
    }

    /// Name of the underlying port, if the platform reports one.
    pub fn name(&self) -> Option<String> {
        self.port.name()
    }
}

impl LineChannel for SerialLineChannel {
    fn write_line(&mut self, line: &str) -> io::Result<()> {
        self.port.write_all(line.as_bytes())?;
        self.port.write_all(b"\n")?;
        self.port.flush()
    }

    fn data_available(&mut self) -> io::Result<bool> {
        if !self.pending.is_empty() {
            return Ok(true);
        }
        Ok(self.port.bytes_to_read()? > 0)
    }

    fn read_line(&mut self) -> io::Result<String> {
        let mut chunk = [0_u8; 64];
        loop {
            if let Some(line) = take_line(&mut self.pending) {
                return Ok(line);
            }
            match self.port.read(&mut chunk) {
                Ok(0) => break,
                Ok(n) => self.pending.extend_from_slice(&chunk[..n]),
                Err(e) if e.kind() == io::ErrorKind::TimedOut => break,
                Err(e) if e.kind() == io::ErrorKind::Interrupted => {}
                Err(e) => return Err(e),
            }
        }
        // Read timed out before a newline: hand back whatever arrived.
        let rest = std::mem::take(&mut self.pending);
        Ok(decode_line(&rest))
    }

    fn clear_input(&mut self) -> io::Result<()> {
        if !self.pending.is_empty() {
            debug!(bytes = self.pending.len(), "discarding buffered input");
        }
        self.pending.clear();
        self.port
            .clear(serialport::ClearBuffer::Input)
            .map_err(io::Error::from)
    }
}

/// Remove and decode the first complete line in `buf`, if there is one.
pub(crate) fn take_line(buf: &mut Vec<u8>) -> Option<String> {
    let newline = buf.iter().position(|&b| b == b'\n')?;
    let line: Vec<u8> = buf.drain(..=newline).collect();
    Some(decode_line(&line))
}

/// Decode bytes lossily and strip trailing `\r`/`\n`.
pub(crate) fn decode_line(bytes: &[u8]) -> String {
    String::from_utf8_lossy(bytes)
        .trim_end_matches(['\r', '\n'])
        .to_string()
}
