//! Wait command implementation.
//!
//! Poll a job until it reaches a terminal state, then print its result.

use std::time::{Duration, Instant};

use anyhow::Result;
use console::style;

use qlink_client::ERROR_SENTINEL;
use qlink_proto::JobStatus;

use super::common::{print_bits, with_client};
use super::status::styled_status;
use crate::config::LinkConfig;

/// How a wait ended.
enum Outcome {
    Finished(Vec<u8>),
    Failed(String),
}

/// Execute the wait command.
pub async fn execute(
    config: &LinkConfig,
    job_id: &str,
    qubits: u32,
    interval: u64,
    timeout: u64,
) -> Result<()> {
    println!(
        "{} Waiting for job {} (timeout: {}s)",
        style("→").cyan().bold(),
        style(job_id).dim(),
        timeout
    );

    let id = job_id.to_string();
    let outcome = with_client(config, "Waiting for job to complete...", move |client, spinner| {
        let start = Instant::now();
        let timeout_duration = Duration::from_secs(timeout);

        loop {
            let status = client.get_job_status(&id);
            if status == ERROR_SENTINEL {
                anyhow::bail!("Failed to get status of job {id}");
            }
            spinner.set_message(format!("Status: {status} ..."));

            match status.parse::<JobStatus>() {
                Ok(JobStatus::Done) => {
                    let bits = client.get_job_result(&id, qubits);
                    if bits.is_empty() {
                        anyhow::bail!("Job {id} is done but returned no result");
                    }
                    return Ok(Outcome::Finished(bits));
                }
                Ok(JobStatus::Error) => return Ok(Outcome::Failed(status)),
                _ => {}
            }

            if start.elapsed() > timeout_duration {
                anyhow::bail!(
                    "Timeout after {timeout}s. Job {id} is still {status}. Use 'qlink status {id}' to check later."
                );
            }

            std::thread::sleep(Duration::from_secs(interval));
        }
    })
    .await?;

    match outcome {
        Outcome::Finished(bits) => print_bits(&bits),
        Outcome::Failed(status) => println!(
            "{} Job finished with status: {}",
            style("✗").red().bold(),
            styled_status(&status)
        ),
    }
    Ok(())
}
