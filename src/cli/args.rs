//! Command line argument parsing and validation.
//!
//! Every required flag falls back to the variable GitLab CI exports, so inside
//! a tag pipeline the tool usually runs with no arguments at all.

use crate::error::ConfigError;
use crate::{ArtifactSource, CiContext, ReleaseConfig, parse_base_url, server_origin};
use clap::Parser;
use std::path::PathBuf;

/// Create a GitLab release for a tag
#[derive(Parser, Debug)]
#[command(
    name = "gitlab_auto_release",
    version,
    about = "Create a GitLab release for a tag",
    long_about = "Create a GitLab release for a tag, optionally with notes from a
keepachangelog file and links to assets or CI job artifacts.

Usage:
  gitlab_auto_release --changelog CHANGELOG.md
  gitlab_auto_release -d \"Release notes\" -a \"binary=https://example.com/app\"
  gitlab_auto_release --artifacts build --artifacts package"
)]
pub struct Args {
    /// Private GitLab token, used to authenticate against the Release API
    #[arg(long, env = "GITLAB_PRIVATE_TOKEN", hide_env_values = true)]
    pub private_token: String,

    /// GitLab server URL, e.g. https://gitlab.com (default: origin of --project-url)
    #[arg(long, env = "CI_SERVER_URL")]
    pub gitlab_url: Option<String>,

    /// Project URL, used to build artifact download links
    #[arg(long, env = "CI_PROJECT_URL")]
    pub project_url: String,

    /// Project ID to create the release for
    #[arg(long, env = "CI_PROJECT_ID")]
    pub project_id: u64,

    /// Tag the release is created from
    #[arg(long, env = "CI_COMMIT_TAG")]
    pub tag_name: String,

    /// Name of the release
    #[arg(long, env = "CI_COMMIT_TAG")]
    pub release_name: String,

    /// Keepachangelog file to take the tag's section from
    #[arg(short = 'c', long, value_name = "PATH")]
    pub changelog: Option<PathBuf>,

    /// Description for the release
    #[arg(short = 'd', long)]
    pub description: Option<String>,

    /// Asset to link, as name=link_to_asset (repeatable)
    #[arg(short = 'a', long = "asset", value_name = "NAME=URL")]
    pub assets: Vec<String>,

    /// Link artifacts of these jobs from the current pipeline (repeatable)
    #[arg(long, value_name = "JOB_NAME", conflicts_with = "link_artifacts")]
    pub artifacts: Vec<String>,

    /// Link the artifacts of the job running this tool
    #[arg(long)]
    pub link_artifacts: bool,

    /// Pipeline the --artifacts jobs belong to
    #[arg(long, env = "CI_PIPELINE_ID")]
    pub pipeline_id: Option<u64>,

    /// Job whose artifacts --link-artifacts links
    #[arg(long, env = "CI_JOB_ID")]
    pub job_id: Option<u64>,

    /// Only print errors
    #[arg(short = 'q', long)]
    pub quiet: bool,
}

impl Args {
    /// Parse command line arguments
    pub fn parse_args() -> Self {
        Self::parse()
    }
}

impl TryFrom<&Args> for ReleaseConfig {
    type Error = ConfigError;

    fn try_from(args: &Args) -> Result<Self, Self::Error> {
        let project = parse_base_url(&args.project_url)?;
        let server_url = match args.gitlab_url.as_deref() {
            Some(raw) => trimmed(&parse_base_url(raw)?),
            None => server_origin(&project),
        };
        let project_url = trimmed(&project);

        let artifacts = if args.link_artifacts {
            ArtifactSource::CurrentJob
        } else if !args.artifacts.is_empty() {
            ArtifactSource::Jobs(args.artifacts.clone())
        } else {
            ArtifactSource::None
        };

        Ok(ReleaseConfig {
            private_token: args.private_token.clone(),
            server_url,
            project_url,
            project_id: args.project_id,
            tag_name: args.tag_name.clone(),
            release_name: args.release_name.clone(),
            changelog: args.changelog.clone(),
            description: args.description.clone().filter(|d| !d.trim().is_empty()),
            assets: args.assets.clone(),
            artifacts,
            ci: CiContext {
                pipeline_id: args.pipeline_id,
                job_id: args.job_id,
            },
        })
    }
}

fn trimmed(url: &url::Url) -> String {
    url.as_str().trim_end_matches('/').to_string()
}

/// Configuration derived from command line arguments
#[derive(Debug, Clone)]
pub struct RuntimeConfig {
    output: super::OutputManager,
}

impl RuntimeConfig {
    /// Create runtime configuration
    pub fn new(quiet: bool) -> Self {
        Self {
            output: super::OutputManager::new(quiet),
        }
    }

    /// Print info message
    pub fn info_println(&self, message: &str) {
        let _ = self.output.info(message);
    }

    /// Print warning message
    pub fn warning_println(&self, message: &str) {
        let _ = self.output.warn(message);
    }

    /// Print success message
    pub fn success_println(&self, message: &str) {
        let _ = self.output.success(message);
    }

    /// Print indented text
    pub fn indent(&self, message: &str) {
        let _ = self.output.indent(message);
    }
}

impl From<&Args> for RuntimeConfig {
    fn from(args: &Args) -> Self {
        Self::new(args.quiet)
    }
}
