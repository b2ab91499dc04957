//! Command execution: wires configuration, the GitLab client and the release flow.

mod release;

pub use release::{ReleaseOutcome, compose_description, execute_release};

use crate::cli::{Args, RuntimeConfig};
use crate::error::Result;
use crate::gitlab::GitLabClient;
use crate::ReleaseConfig;

/// Execute the release based on parsed arguments
pub async fn execute_command(args: Args) -> Result<i32> {
    let runtime = RuntimeConfig::from(&args);
    let config = ReleaseConfig::try_from(&args)?;

    log::debug!(
        "Server {}, project {} ({}), tag {}",
        config.server_url,
        config.project_id,
        config.project_url,
        config.tag_name
    );

    let client = GitLabClient::new(&config.server_url, &config.private_token)?;
    execute_release(&config, &client, &runtime).await?;

    Ok(0)
}
