//! Configure-IBM command implementation.

use anyhow::Result;
use console::style;

use super::common::with_client;
use crate::config::LinkConfig;

/// Execute the configure-ibm command.
pub async fn execute(config: &LinkConfig, token: &str) -> Result<()> {
    if token.trim().is_empty() {
        anyhow::bail!("Token must not be empty");
    }

    let token = token.to_string();
    let acknowledged = with_client(config, "Sending token...", move |client, _| {
        Ok(client.configure_ibm_token(&token))
    })
    .await?;

    if !acknowledged {
        anyhow::bail!("Host did not acknowledge the token (rerun with -v for details)");
    }

    println!(
        "{} IBM Quantum token configured on host",
        style("✓").green().bold()
    );
    Ok(())
}
