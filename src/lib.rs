//! # GitLab Auto Release
//!
//! Create a GitLab release for a tag from inside a CI pipeline.
//!
//! Given a tag, the tool checks whether a release already exists, builds a
//! description (optionally from the matching keepachangelog section), collects
//! asset links (explicit `name=url` pairs and/or CI job artifacts) and issues a
//! single create-release call.
//!
//! ## Usage
//!
//! ```bash
//! gitlab_auto_release --tag-name v0.1.0 --release-name v0.1.0 --changelog CHANGELOG.md
//! gitlab_auto_release -d "Hotfix" -a "binary=https://example.com/app" --artifacts build
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]
#![warn(rust_2018_idioms)]

pub mod assets;
pub mod changelog;
pub mod cli;
pub mod error;
pub mod gitlab;

pub use assets::AssetLink;
pub use cli::Args;
pub use error::{ReleaseError, Result};
pub use gitlab::{GitLabClient, GitLabReleaseManager, ReleaseApi};

use error::ConfigError;
use std::path::PathBuf;
use url::Url;

/// CI job context, captured once at startup
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CiContext {
    /// `CI_PIPELINE_ID` of the running pipeline
    pub pipeline_id: Option<u64>,
    /// `CI_JOB_ID` of the running job
    pub job_id: Option<u64>,
}

/// Where artifact links come from
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum ArtifactSource {
    /// No artifact links
    #[default]
    None,
    /// Jobs of the current pipeline, by name
    Jobs(Vec<String>),
    /// The job running this tool
    CurrentJob,
}

/// Configuration for a release run
#[derive(Debug, Clone, Default)]
pub struct ReleaseConfig {
    /// GitLab private token
    pub private_token: String,
    /// GitLab server URL, e.g. `https://gitlab.com`
    pub server_url: String,
    /// Project URL, used for artifact download links
    pub project_url: String,
    /// Project ID
    pub project_id: u64,
    /// Tag the release is created from
    pub tag_name: String,
    /// Release title
    pub release_name: String,
    /// Path to a keepachangelog file
    pub changelog: Option<PathBuf>,
    /// Explicit description
    pub description: Option<String>,
    /// Raw `name=url` asset tokens
    pub assets: Vec<String>,
    /// Artifact links to add after explicit assets
    pub artifacts: ArtifactSource,
    /// CI job context
    pub ci: CiContext,
}

/// Parse a base URL, requiring an `http`/`https` scheme.
pub fn parse_base_url(raw: &str) -> std::result::Result<Url, ConfigError> {
    match Url::parse(raw) {
        Ok(url) if matches!(url.scheme(), "http" | "https") && url.has_host() => Ok(url),
        Ok(_) | Err(url::ParseError::RelativeUrlWithoutBase) => Err(ConfigError::MissingScheme {
            url: raw.to_string(),
        }),
        Err(e) => Err(ConfigError::InvalidUrl {
            url: raw.to_string(),
            reason: e.to_string(),
        }),
    }
}

/// `scheme://host[:port]` of a URL
pub fn server_origin(url: &Url) -> String {
    url.origin().ascii_serialization()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_base_url_accepts_https() {
        let url = parse_base_url("https://gitlab.com/group/project").unwrap();
        assert_eq!(url.host_str(), Some("gitlab.com"));
    }

    #[test]
    fn test_parse_base_url_missing_scheme() {
        for raw in ["gitlab.com/hmajid2301/gitlab-auto-release", "localhost:8080"] {
            let err = parse_base_url(raw).unwrap_err();
            assert!(matches!(err, ConfigError::MissingScheme { .. }), "{raw}");
        }
    }

    #[test]
    fn test_parse_base_url_invalid() {
        let err = parse_base_url("https://").unwrap_err();
        assert!(matches!(err, ConfigError::InvalidUrl { .. }));
    }

    #[test]
    fn test_server_origin() {
        let url = parse_base_url("https://gitlab.com/group/project").unwrap();
        assert_eq!(server_origin(&url), "https://gitlab.com");

        let url = parse_base_url("http://git.local:8080/a/b/").unwrap();
        assert_eq!(server_origin(&url), "http://git.local:8080");
    }
}
