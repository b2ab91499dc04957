//! reqwest-backed GitLab v4 client

use crate::error::{CliError, GitLabError, ReleaseError, Result};
use crate::gitlab::{CreateRelease, Job, Pipeline, Project, Release, ReleaseApi};
use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue};
use reqwest::{Client, Response, StatusCode};
use serde::de::DeserializeOwned;
use std::time::Duration;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);
const JOBS_PER_PAGE: u32 = 100;

/// HTTP client for the GitLab v4 API
#[derive(Debug, Clone)]
pub struct GitLabClient {
    /// `<server>/api/v4`
    api_url: String,
    client: Client,
}

impl GitLabClient {
    /// Create a client for `server_url`, authenticating with a private token.
    pub fn new(server_url: &str, private_token: &str) -> Result<Self> {
        let mut token = HeaderValue::from_str(private_token).map_err(|_| {
            ReleaseError::Cli(CliError::InvalidArguments {
                reason: "--private-token contains characters not allowed in an HTTP header"
                    .to_string(),
            })
        })?;
        token.set_sensitive(true);

        let mut headers = HeaderMap::new();
        headers.insert("PRIVATE-TOKEN", token);

        let client = Client::builder()
            .user_agent(concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")))
            .timeout(REQUEST_TIMEOUT)
            .default_headers(headers)
            .build()
            .map_err(GitLabError::Request)?;

        Ok(Self::with_client(server_url, client))
    }

    /// Create a client around a preconfigured reqwest `Client`
    pub fn with_client(server_url: &str, client: Client) -> Self {
        Self {
            api_url: format!("{}/api/v4", server_url.trim_end_matches('/')),
            client,
        }
    }

    /// Base URL of the v4 API
    pub fn api_url(&self) -> &str {
        &self.api_url
    }

    fn project_endpoint(&self, project_id: u64) -> String {
        format!("{}/projects/{}", self.api_url, project_id)
    }

    fn release_endpoint(&self, project_id: u64, tag_name: &str) -> String {
        let tag: String = url::form_urlencoded::byte_serialize(tag_name.as_bytes()).collect();
        format!("{}/releases/{}", self.project_endpoint(project_id), tag)
    }

    async fn get(&self, url: &str) -> Result<Response> {
        log::debug!("GET {}", url);
        let response = self.client.get(url).send().await.map_err(GitLabError::Request)?;
        log::debug!("GET {} -> {}", url, response.status());
        Ok(response)
    }
}

/// Drain a failed response into `(status, message)`
async fn error_body(response: Response) -> (StatusCode, String) {
    let status = response.status();
    let message = response
        .text()
        .await
        .unwrap_or_else(|_| "Unknown error".to_string());
    (status, message)
}

/// Map a non-success status that has no endpoint-specific meaning
fn status_error(status: StatusCode, message: String) -> GitLabError {
    match status {
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => GitLabError::Authentication {
            status: status.as_u16(),
            message,
        },
        _ => GitLabError::Api {
            status: status.as_u16(),
            message,
        },
    }
}

/// Map a failed release lookup; a missing release is not an error
fn release_lookup_outcome(
    status: StatusCode,
    message: String,
    tag_name: &str,
) -> std::result::Result<Option<Release>, GitLabError> {
    match status {
        StatusCode::NOT_FOUND => Ok(None),
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => Err(status_error(status, message)),
        _ => Err(GitLabError::ReleaseLookup {
            tag: tag_name.to_string(),
            status: status.as_u16(),
            message,
        }),
    }
}

/// Page to request after `current`, from the `X-Next-Page` header value.
///
/// GitLab sends an empty header on the last page.
fn next_page(current: u32, header: Option<&str>) -> Option<u32> {
    header
        .and_then(|value| value.trim().parse::<u32>().ok())
        .filter(|&next| next > current)
}

async fn parse_json<T: DeserializeOwned>(response: Response) -> Result<T> {
    let body = response.text().await.map_err(GitLabError::Request)?;
    serde_json::from_str(&body)
        .map_err(|e| GitLabError::Parse(format!("Failed to parse JSON response: {}", e)).into())
}

#[async_trait]
impl ReleaseApi for GitLabClient {
    async fn get_project(&self, project_id: u64) -> Result<Project> {
        let response = self.get(&self.project_endpoint(project_id)).await?;
        if !response.status().is_success() {
            let (status, message) = error_body(response).await;
            return Err(match status {
                StatusCode::NOT_FOUND => GitLabError::ProjectNotFound { project_id },
                _ => status_error(status, message),
            }
            .into());
        }
        parse_json(response).await
    }

    async fn get_release(&self, project: &Project, tag_name: &str) -> Result<Option<Release>> {
        let response = self.get(&self.release_endpoint(project.id, tag_name)).await?;
        if response.status().is_success() {
            return parse_json(response).await.map(Some);
        }
        let (status, message) = error_body(response).await;
        Ok(release_lookup_outcome(status, message, tag_name)?)
    }

    async fn get_pipeline(&self, project: &Project, pipeline_id: u64) -> Result<Pipeline> {
        let url = format!("{}/pipelines/{}", self.project_endpoint(project.id), pipeline_id);
        let response = self.get(&url).await?;
        if !response.status().is_success() {
            let (status, message) = error_body(response).await;
            return Err(match status {
                StatusCode::NOT_FOUND => GitLabError::PipelineNotFound { pipeline_id },
                _ => status_error(status, message),
            }
            .into());
        }
        parse_json(response).await
    }

    async fn list_jobs(&self, project: &Project, pipeline: &Pipeline) -> Result<Vec<Job>> {
        let mut jobs = Vec::new();
        let mut page = 1u32;

        loop {
            let url = format!(
                "{}/pipelines/{}/jobs?per_page={}&page={}",
                self.project_endpoint(project.id),
                pipeline.id,
                JOBS_PER_PAGE,
                page
            );
            let response = self.get(&url).await?;
            if !response.status().is_success() {
                let (status, message) = error_body(response).await;
                return Err(status_error(status, message).into());
            }

            let next = next_page(
                page,
                response
                    .headers()
                    .get("x-next-page")
                    .and_then(|value| value.to_str().ok()),
            );

            let batch: Vec<Job> = parse_json(response).await?;
            jobs.extend(batch);

            match next {
                Some(next) => page = next,
                None => break,
            }
        }

        log::debug!("Pipeline {} has {} job(s)", pipeline.id, jobs.len());
        Ok(jobs)
    }

    async fn create_release(&self, project: &Project, payload: &CreateRelease) -> Result<Release> {
        let url = format!("{}/releases", self.project_endpoint(project.id));
        log::debug!("POST {} ({} asset link(s))", url, payload.assets.links.len());

        let response = self
            .client
            .post(&url)
            .json(payload)
            .send()
            .await
            .map_err(GitLabError::Request)?;

        if !response.status().is_success() {
            let (status, message) = error_body(response).await;
            return Err(status_error(status, message).into());
        }
        parse_json(response).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_api_url_trims_trailing_slash() {
        let client = GitLabClient::new("https://gitlab.com/", "ATOKEN1234").unwrap();
        assert_eq!(client.api_url(), "https://gitlab.com/api/v4");
    }

    #[test]
    fn test_api_url_keeps_path_prefix() {
        let client = GitLabClient::with_client("https://example.com/gitlab", Client::new());
        assert_eq!(client.api_url(), "https://example.com/gitlab/api/v4");
    }

    #[test]
    fn test_release_endpoint_encodes_tag() {
        let client = GitLabClient::with_client("https://gitlab.com", Client::new());
        assert_eq!(
            client.release_endpoint(213145, "release/0.5.0"),
            "https://gitlab.com/api/v4/projects/213145/releases/release%2F0.5.0"
        );
        assert_eq!(
            client.release_endpoint(1, "v1.0.0+build.1"),
            "https://gitlab.com/api/v4/projects/1/releases/v1.0.0%2Bbuild.1"
        );
    }

    #[test]
    fn test_invalid_token_is_usage_error() {
        let err = GitLabClient::new("https://gitlab.com", "bad\ntoken").unwrap_err();
        assert_eq!(err.exit_code(), 2);
    }

    #[test]
    fn test_status_error_mapping() {
        assert!(matches!(
            status_error(StatusCode::UNAUTHORIZED, String::new()),
            GitLabError::Authentication { status: 401, .. }
        ));
        assert!(matches!(
            status_error(StatusCode::INTERNAL_SERVER_ERROR, String::new()),
            GitLabError::Api { status: 500, .. }
        ));
    }

    #[test]
    fn test_missing_release_is_none() {
        let outcome = release_lookup_outcome(StatusCode::NOT_FOUND, "404 Not found".into(), "v1.0.0");
        assert!(matches!(outcome, Ok(None)));
    }

    #[test]
    fn test_release_lookup_server_error() {
        let outcome = release_lookup_outcome(
            StatusCode::INTERNAL_SERVER_ERROR,
            "boom".into(),
            "release/0.5.0",
        );
        assert!(matches!(
            outcome,
            Err(GitLabError::ReleaseLookup { ref tag, status: 500, ref message })
                if tag == "release/0.5.0" && message == "boom"
        ));
    }

    #[test]
    fn test_release_lookup_rejected_token() {
        assert!(matches!(
            release_lookup_outcome(StatusCode::UNAUTHORIZED, String::new(), "v1.0.0"),
            Err(GitLabError::Authentication { status: 401, .. })
        ));
        assert!(matches!(
            release_lookup_outcome(StatusCode::FORBIDDEN, String::new(), "v1.0.0"),
            Err(GitLabError::Authentication { status: 403, .. })
        ));
    }

    #[test]
    fn test_next_page_header() {
        assert_eq!(next_page(1, Some("2")), Some(2));
        assert_eq!(next_page(2, Some(" 3 ")), Some(3));
        assert_eq!(next_page(3, Some("")), None);
        assert_eq!(next_page(1, None), None);
        assert_eq!(next_page(1, Some("abc")), None);
        assert_eq!(next_page(2, Some("2")), None);
        assert_eq!(next_page(2, Some("1")), None);
    }
}
