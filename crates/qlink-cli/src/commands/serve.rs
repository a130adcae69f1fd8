//! Serve command implementation.
//!
//! Run the host bridge on a serial port or on stdin/stdout.

use std::time::Duration;

use anyhow::{Context, Result};
use console::style;
use tokio::io::BufReader;
use tokio::runtime::Handle;
use tracing::{debug, info, warn};

use qlink_bridge::{Bridge, MAX_LINE_BYTES, SimulatedBackend, TokenStore};
use qlink_client::{LineChannel, SerialLineChannel};
use qlink_proto::Reply;

use super::common::resolve_port;
use crate::config::{BridgeConfig, LinkConfig};

/// Execute the serve command.
pub async fn execute(config: &LinkConfig, stdio: bool) -> Result<()> {
    let bridge = build_bridge(&config.bridge)?;

    if stdio {
        // stdout carries replies; keep banners off it.
        let answered = bridge
            .serve(BufReader::new(tokio::io::stdin()), tokio::io::stdout())
            .await?;
        info!(answered, "stdio bridge finished");
        return Ok(());
    }

    let port = resolve_port(&config.serial)?;
    let mut channel = SerialLineChannel::open(
        &port,
        config.serial.baud_rate,
        Duration::from_millis(config.serial.read_timeout_ms),
    )
    .with_context(|| format!("Failed to open serial port {port}"))?;

    println!(
        "{} Serving {} at {} baud (max {} qubits, Ctrl-C to stop)",
        style("→").cyan().bold(),
        style(&port).cyan(),
        config.serial.baud_rate,
        config.bridge.max_qubits
    );

    let handle = Handle::current();
    let poll = config.exchange.poll_interval();
    tokio::task::spawn_blocking(move || serve_channel(&bridge, &mut channel, &handle, poll))
        .await
        .context("Bridge worker panicked")?
}

/// Bridge over the simulator with the configured token store.
pub fn build_bridge(config: &BridgeConfig) -> Result<Bridge<SimulatedBackend>> {
    let backend = SimulatedBackend::new()
        .with_max_qubits(config.max_qubits)
        .with_require_token(config.require_token);

    let tokens = if config.ephemeral_token {
        TokenStore::in_memory()
    } else {
        match config.token_path.clone().or_else(TokenStore::default_path) {
            Some(path) => TokenStore::persistent(&path)
                .with_context(|| format!("Failed to load token store {}", path.display()))?,
            None => {
                warn!("no home directory; IBM token will not be persisted");
                TokenStore::in_memory()
            }
        }
    };

    Ok(Bridge::new(backend, tokens))
}

/// Answer request lines arriving on `channel` until it fails.
fn serve_channel<C: LineChannel>(
    bridge: &Bridge<SimulatedBackend>,
    channel: &mut C,
    handle: &Handle,
    poll: Duration,
) -> Result<()> {
    let mut answered = 0_u64;
    loop {
        if !channel.data_available()? {
            std::thread::sleep(poll);
            continue;
        }

        let line = channel.read_line()?;
        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        // Same cap as the stdio loop; the newline is already stripped.
        let reply = if line.len() as u64 >= MAX_LINE_BYTES {
            warn!(limit = MAX_LINE_BYTES, "rejecting overlong request line");
            Reply::invalid_json()
        } else {
            handle.block_on(bridge.handle_line(line))
        };
        channel.write_line(&reply.to_line()?)?;
        answered += 1;
        debug!(answered, "reply sent");
    }
}
