//! Shared helpers for CLI commands.

use std::time::Duration;

use anyhow::{Context, Result};
use console::style;
use indicatif::{ProgressBar, ProgressStyle};

use qlink_client::{LineExchangeClient, SerialLineChannel};

use crate::config::{LinkConfig, SerialConfig};

/// Client bound to a serial port.
pub type SerialClient = LineExchangeClient<SerialLineChannel>;

/// Device name fragments of USB serial adapters and dev boards.
const USB_SERIAL_HINTS: &[&str] = &["ttyACM", "ttyUSB", "usbmodem", "usbserial"];

/// The configured port, or the first USB serial port found.
pub fn resolve_port(serial: &SerialConfig) -> Result<String> {
    if let Some(ref port) = serial.port {
        return Ok(port.clone());
    }

    let ports = serialport::available_ports().context("Failed to enumerate serial ports")?;
    let names: Vec<String> = ports.into_iter().map(|p| p.port_name).collect();
    pick_usb_port(&names).map(str::to_string).ok_or_else(|| {
        anyhow::anyhow!("No serial port found. Pass --port or set QLINK_PORT (see 'qlink ports').")
    })
}

/// First name that looks like a USB serial device.
pub fn pick_usb_port(names: &[String]) -> Option<&str> {
    names
        .iter()
        .map(String::as_str)
        .find(|name| USB_SERIAL_HINTS.iter().any(|hint| name.contains(hint)))
}

/// Open the serial port and wrap it in a client.
pub fn open_client(config: &LinkConfig) -> Result<SerialClient> {
    let port = resolve_port(&config.serial)?;
    let channel = SerialLineChannel::open(
        &port,
        config.serial.baud_rate,
        Duration::from_millis(config.serial.read_timeout_ms),
    )
    .with_context(|| format!("Failed to open serial port {port}"))?;
    Ok(LineExchangeClient::new(channel, config.exchange))
}

/// Spinner shown while a blocking exchange is in flight.
pub fn spinner(message: impl Into<String>) -> Result<ProgressBar> {
    let spinner = ProgressBar::new_spinner();
    spinner.set_style(ProgressStyle::default_spinner().template("{spinner:.cyan} {msg}")?);
    spinner.set_message(message.into());
    spinner.enable_steady_tick(Duration::from_millis(100));
    Ok(spinner)
}

/// Open a client and run `op` on a blocking thread behind a spinner.
pub async fn with_client<T, F>(config: &LinkConfig, message: &str, op: F) -> Result<T>
where
    F: FnOnce(&mut SerialClient, &ProgressBar) -> Result<T> + Send + 'static,
    T: Send + 'static,
{
    let config = config.clone();
    let spinner = spinner(message)?;
    let worker = spinner.clone();

    let outcome = tokio::task::spawn_blocking(move || {
        let mut client = open_client(&config)?;
        op(&mut client, &worker)
    })
    .await;

    spinner.finish_and_clear();
    outcome.context("Serial worker panicked")?
}

/// Render bits as a compact string, e.g. `0110`.
pub fn format_bits(bits: &[u8]) -> String {
    bits.iter().map(|b| if *b == 0 { '0' } else { '1' }).collect()
}

/// Print measured bits.
pub fn print_bits(bits: &[u8]) {
    println!(
        "\n{} {} bit(s): {}",
        style("✓").green().bold(),
        bits.len(),
        style(format_bits(bits)).cyan().bold()
    );

    let ones = bits.iter().filter(|b| **b == 1).count();
    println!(
        "  ones: {}  zeros: {}",
        style(ones).yellow(),
        style(bits.len() - ones).yellow()
    );
}
