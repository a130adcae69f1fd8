//! Submit command implementation.
//!
//! Start a job on the remote quantum service and optionally wait for it.

use anyhow::Result;
use console::style;

use qlink_client::ERROR_SENTINEL;

use super::common::with_client;
use super::wait;
use crate::config::LinkConfig;

/// Execute the submit command.
pub async fn execute(config: &LinkConfig, qubits: u32, do_wait: bool) -> Result<()> {
    println!(
        "{} Submitting {} qubit job",
        style("→").cyan().bold(),
        style(qubits).yellow()
    );

    let job_id = with_client(config, "Submitting job...", move |client, _| {
        Ok(client.start_real_ibm_job(qubits))
    })
    .await?;

    if job_id == ERROR_SENTINEL {
        anyhow::bail!("Job submission failed (rerun with -v for details)");
    }

    println!(
        "{} Job submitted: {}",
        style("✓").green().bold(),
        style(&job_id).cyan()
    );

    if do_wait {
        wait::execute(config, &job_id, qubits, 1, 300).await
    } else {
        println!(
            "\n  Use {} to check progress.",
            style(format!("qlink status {job_id}")).dim()
        );
        Ok(())
    }
}
