//! Measure command implementation.
//!
//! Ask the host for an immediate measurement of `qubits` qubits.

use anyhow::Result;
use console::style;

use super::common::{print_bits, with_client};
use crate::config::LinkConfig;

/// Execute the measure command.
pub async fn execute(config: &LinkConfig, qubits: u32) -> Result<()> {
    println!(
        "{} Measuring {} qubit(s)",
        style("→").cyan().bold(),
        style(qubits).yellow()
    );

    let bits = with_client(config, "Waiting for measurement...", move |client, _| {
        Ok(client.request_qubit_measurement(qubits))
    })
    .await?;

    if bits.is_empty() {
        anyhow::bail!("No measurement received (rerun with -v for details)");
    }
    print_bits(&bits);
    Ok(())
}
