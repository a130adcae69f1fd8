//! Ports command implementation.

use anyhow::{Context, Result};
use console::style;
use serialport::SerialPortType;

/// Execute the ports command.
pub fn execute() -> Result<()> {
    let ports = serialport::available_ports().context("Failed to enumerate serial ports")?;

    if ports.is_empty() {
        println!("No serial ports found.");
        return Ok(());
    }

    println!("{} {} port(s):\n", style("→").cyan().bold(), ports.len());
    for port in ports {
        let kind = match port.port_type {
            SerialPortType::UsbPort(usb) => format!(
                "USB {:04x}:{:04x} {}",
                usb.vid,
                usb.pid,
                usb.product.unwrap_or_default()
            ),
            SerialPortType::PciPort => "PCI".to_string(),
            SerialPortType::BluetoothPort => "Bluetooth".to_string(),
            SerialPortType::Unknown => "unknown".to_string(),
        };
        println!("  {:<24}  {}", style(&port.port_name).cyan(), style(kind).dim());
    }
    Ok(())
}
