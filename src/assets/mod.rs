//! Release asset links: explicit `name=url` tokens and CI job artifacts.

use crate::error::AssetError;
use crate::gitlab::Job;
use serde::{Deserialize, Serialize};

/// A named URL surfaced on a release
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssetLink {
    /// Display name
    pub name: String,
    /// Download URL
    pub url: String,
}

impl AssetLink {
    /// Create a new asset link
    pub fn new(name: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            url: url.into(),
        }
    }
}

/// Parse a `name=url` token.
///
/// Splits on the first `=` only, so a URL carrying a query string
/// (`dl=https://x/y?a=b`) keeps its own `=` characters. Both sides must be
/// non-empty.
pub fn parse_asset_token(token: &str) -> Result<AssetLink, AssetError> {
    match token.split_once('=') {
        Some((name, url)) if !name.is_empty() && !url.is_empty() => Ok(AssetLink::new(name, url)),
        _ => Err(AssetError::Malformed {
            token: token.to_string(),
        }),
    }
}

/// Parse every token, keeping caller order. Fails on the first malformed one.
pub fn parse_asset_tokens<S: AsRef<str>>(tokens: &[S]) -> Result<Vec<AssetLink>, AssetError> {
    tokens
        .iter()
        .map(|token| parse_asset_token(token.as_ref()))
        .collect()
}

/// Resolve pipeline job names into artifact download links.
///
/// The first job whose name matches exactly is used. Output order follows
/// `job_names`, not `jobs`.
pub fn resolve_artifacts<S: AsRef<str>>(
    job_names: &[S],
    jobs: &[Job],
    project_url: &str,
) -> Result<Vec<AssetLink>, AssetError> {
    let project_url = project_url.trim_end_matches('/');

    job_names
        .iter()
        .map(|job_name| {
            let job_name = job_name.as_ref();
            let job = jobs
                .iter()
                .find(|job| job.name == job_name)
                .ok_or_else(|| AssetError::JobNotFound {
                    job_name: job_name.to_string(),
                })?;

            Ok(AssetLink::new(
                format!("Artifact: {}", job_name),
                format!("{}/-/jobs/{}/artifacts/download", project_url, job.id),
            ))
        })
        .collect()
}

/// Link the artifacts of the job currently running.
pub fn resolve_current_job_artifact(server_url: &str, project_id: u64, job_id: u64) -> AssetLink {
    AssetLink::new(
        "Artifacts",
        format!(
            "{}/api/v4/projects/{}/jobs/{}/artifacts",
            server_url.trim_end_matches('/'),
            project_id,
            job_id
        ),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn job(name: &str, id: u64) -> Job {
        Job {
            id,
            name: name.to_string(),
        }
    }

    #[test]
    fn test_parse_asset_token() {
        let link = parse_asset_token("binary=https://example.com/app.tar.gz").unwrap();
        assert_eq!(link, AssetLink::new("binary", "https://example.com/app.tar.gz"));
    }

    #[test]
    fn test_parse_asset_token_keeps_equals_in_url() {
        let link = parse_asset_token("dl=https://example.com/get?file=a&v=2").unwrap();
        assert_eq!(link.name, "dl");
        assert_eq!(link.url, "https://example.com/get?file=a&v=2");
    }

    #[test]
    fn test_parse_asset_token_malformed() {
        for token in ["name", "", "=https://example.com", "name="] {
            let err = parse_asset_token(token).unwrap_err();
            assert!(matches!(err, AssetError::Malformed { .. }), "{token}");
        }
    }

    #[test]
    fn test_parse_asset_tokens_stops_on_bad_token() {
        let err = parse_asset_tokens(&["abc=example.com", "name"]).unwrap_err();
        assert!(matches!(err, AssetError::Malformed { token } if token == "name"));
    }

    #[test]
    fn test_resolve_artifacts() {
        let links = resolve_artifacts(&["build"], &[job("build", 42)], "https://x/y").unwrap();
        assert_eq!(
            links,
            vec![AssetLink::new(
                "Artifact: build",
                "https://x/y/-/jobs/42/artifacts/download"
            )]
        );
    }

    #[test]
    fn test_resolve_artifacts_follows_requested_order() {
        let jobs = [job("test", 1), job("build", 2), job("package", 3)];
        let links = resolve_artifacts(&["package", "build"], &jobs, "https://x/y/").unwrap();
        assert_eq!(links[0].name, "Artifact: package");
        assert_eq!(links[0].url, "https://x/y/-/jobs/3/artifacts/download");
        assert_eq!(links[1].name, "Artifact: build");
    }

    #[test]
    fn test_resolve_artifacts_first_match_wins() {
        let jobs = [job("build", 7), job("build", 8)];
        let links = resolve_artifacts(&["build"], &jobs, "https://x/y").unwrap();
        assert_eq!(links[0].url, "https://x/y/-/jobs/7/artifacts/download");
    }

    #[test]
    fn test_resolve_artifacts_missing_job() {
        let err = resolve_artifacts(&["missing"], &[], "https://x/y").unwrap_err();
        assert!(matches!(err, AssetError::JobNotFound { job_name } if job_name == "missing"));
    }

    #[test]
    fn test_resolve_current_job_artifact() {
        let link = resolve_current_job_artifact("https://gitlab.com/", 81236, 555);
        assert_eq!(link.name, "Artifacts");
        assert_eq!(
            link.url,
            "https://gitlab.com/api/v4/projects/81236/jobs/555/artifacts"
        );
    }
}
