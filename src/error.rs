//! Error types for gitlab_auto_release operations.
//!
//! Every failure is detected close to its source, carried up as a
//! `ReleaseError` and rendered as a single line by `main`.

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for gitlab_auto_release operations
pub type Result<T> = std::result::Result<T, ReleaseError>;

/// Main error type for all gitlab_auto_release operations
#[derive(Error, Debug)]
pub enum ReleaseError {
    /// CLI argument errors
    #[error("CLI error: {0}")]
    Cli(#[from] CliError),

    /// Configuration errors (URLs, CI context)
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// GitLab API errors
    #[error("GitLab error: {0}")]
    GitLab(#[from] GitLabError),

    /// Changelog errors
    #[error("Changelog error: {0}")]
    Changelog(#[from] ChangelogError),

    /// Asset errors
    #[error("Asset error: {0}")]
    Asset(#[from] AssetError),
}

/// CLI-specific errors
#[derive(Error, Debug)]
pub enum CliError {
    /// Invalid command line arguments
    #[error("Invalid arguments: {reason}")]
    InvalidArguments {
        /// Reason for the error
        reason: String,
    },
}

/// Configuration errors detected before any request is made
#[derive(Error, Debug)]
pub enum ConfigError {
    /// URL given without `http://` or `https://`
    #[error("URL '{url}' is missing a scheme, expected e.g. https://{url}")]
    MissingScheme {
        /// The offending URL
        url: String,
    },

    /// URL could not be parsed
    #[error("Invalid URL '{url}': {reason}")]
    InvalidUrl {
        /// The offending URL
        url: String,
        /// Parser message
        reason: String,
    },

    /// Required CI environment value is absent
    #[error("Missing environment variable {variable}, required for {purpose}")]
    MissingEnvironment {
        /// Variable name
        variable: String,
        /// What needed it
        purpose: String,
    },
}

/// GitLab API errors
#[derive(Error, Debug)]
pub enum GitLabError {
    /// Token rejected
    #[error("Authentication failed (status {status}): {message}")]
    Authentication {
        /// HTTP status code
        status: u16,
        /// Error message from the API
        message: String,
    },

    /// Project lookup returned 404
    #[error("Unable to get project {project_id}: not found")]
    ProjectNotFound {
        /// Project ID
        project_id: u64,
    },

    /// Release lookup failed for a reason other than "not found"
    #[error("Unable to check release for tag '{tag}' (status {status}): {message}")]
    ReleaseLookup {
        /// Tag name
        tag: String,
        /// HTTP status code
        status: u16,
        /// Error message from the API
        message: String,
    },

    /// Pipeline lookup returned 404
    #[error("Pipeline {pipeline_id} not found")]
    PipelineNotFound {
        /// Pipeline ID
        pipeline_id: u64,
    },

    /// Any other non-success status
    #[error("API error (status {status}): {message}")]
    Api {
        /// HTTP status code
        status: u16,
        /// Error message from the API
        message: String,
    },

    /// Transport-level failure
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// Response body did not match the expected shape
    #[error("Failed to parse response: {0}")]
    Parse(String),
}

/// Changelog errors
#[derive(Error, Debug)]
pub enum ChangelogError {
    /// Tag has no embedded semantic version
    #[error("Invalid tag name '{tag}', it doesn't contain a valid semantic version")]
    InvalidTag {
        /// Tag name
        tag: String,
    },

    /// No `## [<version>]` heading in the changelog
    #[error("No changelog section '## [{version}]' found")]
    SectionNotFound {
        /// Version looked up
        version: String,
    },

    /// Changelog file does not exist
    #[error("Unable to find changelog file at {}", path.display())]
    FileNotFound {
        /// Path given on the command line
        path: PathBuf,
    },

    /// Changelog file exists but could not be read
    #[error("Unable to open changelog file at {}: {source}", path.display())]
    FileAccess {
        /// Path given on the command line
        path: PathBuf,
        /// Underlying IO error
        #[source]
        source: std::io::Error,
    },
}

/// Asset errors
#[derive(Error, Debug)]
pub enum AssetError {
    /// Token is not `name=url`
    #[error("Invalid asset '{token}', format should be name=link_to_asset")]
    Malformed {
        /// The offending token
        token: String,
    },

    /// No job with this name in the pipeline
    #[error("Job '{job_name}' not found in pipeline, cannot link its artifacts")]
    JobNotFound {
        /// Requested job name
        job_name: String,
    },
}

impl ReleaseError {
    /// Process exit code for this error: 2 for usage errors, 1 otherwise
    pub fn exit_code(&self) -> i32 {
        match self {
            ReleaseError::Cli(_) => 2,
            _ => 1,
        }
    }

    /// Get actionable recovery suggestions for this error
    pub fn recovery_suggestions(&self) -> Vec<String> {
        match self {
            ReleaseError::GitLab(GitLabError::Authentication { .. }) => vec![
                "Check GITLAB_PRIVATE_TOKEN is set and has not expired".to_string(),
                "Verify the token has the `api` scope".to_string(),
            ],
            ReleaseError::GitLab(GitLabError::ProjectNotFound { .. }) => vec![
                "Verify --project-id (CI_PROJECT_ID) points at an existing project".to_string(),
                "Ensure the token's user can see the project".to_string(),
            ],
            ReleaseError::Config(ConfigError::MissingScheme { .. }) => {
                vec!["Prefix the URL with https:// or http://".to_string()]
            }
            ReleaseError::Config(ConfigError::MissingEnvironment { variable, .. }) => vec![
                format!("Run inside a GitLab CI job, or export {} explicitly", variable),
            ],
            ReleaseError::Asset(AssetError::JobNotFound { .. }) => vec![
                "Job names must match the names in .gitlab-ci.yml exactly".to_string(),
            ],
            ReleaseError::Changelog(ChangelogError::InvalidTag { .. }) => vec![
                "Use a tag containing MAJOR.MINOR.PATCH, e.g. v1.2.3 or release/1.2.3".to_string(),
            ],
            _ => Vec::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_usage_errors_exit_with_two() {
        let err = ReleaseError::from(CliError::InvalidArguments {
            reason: "bad".to_string(),
        });
        assert_eq!(err.exit_code(), 2);
    }

    #[test]
    fn test_operational_errors_exit_with_one() {
        let errors = vec![
            ReleaseError::from(ConfigError::MissingScheme {
                url: "gitlab.com".to_string(),
            }),
            ReleaseError::from(GitLabError::ProjectNotFound { project_id: 1 }),
            ReleaseError::from(AssetError::JobNotFound {
                job_name: "build".to_string(),
            }),
            ReleaseError::from(ChangelogError::FileNotFound {
                path: PathBuf::from("CHANGELOG.md"),
            }),
        ];
        for err in errors {
            assert_eq!(err.exit_code(), 1, "{err}");
        }
    }

    #[test]
    fn test_job_not_found_names_job() {
        let err = ReleaseError::from(AssetError::JobNotFound {
            job_name: "package".to_string(),
        });
        assert!(err.to_string().contains("'package'"));
    }
}
