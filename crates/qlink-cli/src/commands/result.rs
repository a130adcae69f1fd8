//! Result command implementation.

use anyhow::Result;
use console::style;

use super::common::{print_bits, with_client};
use crate::config::LinkConfig;

/// Execute the result command.
pub async fn execute(config: &LinkConfig, job_id: &str, qubits: u32) -> Result<()> {
    let id = job_id.to_string();
    let bits = with_client(config, "Fetching result...", move |client, _| {
        Ok(client.get_job_result(&id, qubits))
    })
    .await?;

    if bits.is_empty() {
        anyhow::bail!(
            "No result for job {job_id}. It may still be running; check 'qlink status {job_id}'."
        );
    }

    println!("{} Job {}", style("→").cyan().bold(), style(job_id).dim());
    print_bits(&bits);
    Ok(())
}
