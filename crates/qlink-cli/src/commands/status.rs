//! Status command implementation.

use anyhow::Result;
use console::style;

use qlink_client::ERROR_SENTINEL;
use qlink_proto::JobStatus;

use super::common::with_client;
use crate::config::LinkConfig;

/// Execute the status command.
pub async fn execute(config: &LinkConfig, job_id: &str) -> Result<()> {
    let id = job_id.to_string();
    let status = with_client(config, "Querying status...", move |client, _| {
        Ok(client.get_job_status(&id))
    })
    .await?;

    if status == ERROR_SENTINEL {
        anyhow::bail!("Could not get status of job {job_id} (rerun with -v for details)");
    }

    println!("{} Job {}", style("→").cyan().bold(), style(job_id).dim());
    println!("  Status: {}", styled_status(&status));
    Ok(())
}

/// Color a status string by its meaning; unknown statuses stay plain.
pub fn styled_status(status: &str) -> String {
    match status.parse::<JobStatus>() {
        Ok(JobStatus::Done) => style(status).green().to_string(),
        Ok(JobStatus::Error) => style(status).red().to_string(),
        Ok(JobStatus::Running) => style(status).cyan().to_string(),
        Ok(JobStatus::Queued) => style(status).yellow().to_string(),
        Err(_) => status.to_string(),
    }
}
