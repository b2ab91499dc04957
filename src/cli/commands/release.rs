//! Release command: one linear pass from project lookup to create-release.

use crate::assets::{parse_asset_tokens, resolve_artifacts, resolve_current_job_artifact};
use crate::changelog;
use crate::cli::RuntimeConfig;
use crate::error::{ChangelogError, ConfigError, Result};
use crate::gitlab::{CreateRelease, GitLabReleaseManager, ReleaseApi, ReleaseAssets};
use crate::{ArtifactSource, ReleaseConfig};
use chrono::{DateTime, Utc};

/// What a release run did
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReleaseOutcome {
    /// A release for the tag was already there, nothing was sent
    AlreadyExists {
        /// Tag name
        tag_name: String,
        /// When the existing release was created, if known
        created_at: Option<DateTime<Utc>>,
    },
    /// A release was created
    Created {
        /// The submitted payload
        request: CreateRelease,
    },
}

/// Join the explicit description and the changelog section.
///
/// Falls back to `Release for <tag>` when neither is present.
pub fn compose_description(
    description: Option<&str>,
    changelog_section: Option<&str>,
    tag_name: &str,
) -> String {
    let description = description.filter(|d| !d.trim().is_empty());
    let changelog_section = changelog_section.filter(|s| !s.trim().is_empty());

    match (description, changelog_section) {
        (Some(description), Some(section)) => format!("{}\n\n{}", description, section),
        (Some(description), None) => description.to_string(),
        (None, Some(section)) => section.to_string(),
        (None, None) => format!("Release for {}", tag_name),
    }
}

/// Success line printed after the release was created
fn created_summary(tag_name: &str, link_count: usize) -> String {
    match link_count {
        1 => format!("Created a release for tag {} with 1 asset link.", tag_name),
        n => format!("Created a release for tag {} with {} asset links.", tag_name, n),
    }
}

/// Run the release flow against `api`.
///
/// Exits early with `AlreadyExists` when the tag already has a release.
/// Any other failure is returned as soon as it is detected.
pub async fn execute_release<A: ReleaseApi + ?Sized>(
    config: &ReleaseConfig,
    api: &A,
    runtime: &RuntimeConfig,
) -> Result<ReleaseOutcome> {
    let tag_name = config.tag_name.as_str();
    let manager = GitLabReleaseManager::connect(api, config.project_id).await?;

    if let Some(existing) = manager.existing_release(tag_name).await? {
        match existing.created_at {
            Some(created_at) => runtime.info_println(&format!(
                "Release already exists for tag {} (created {}).",
                tag_name,
                created_at.format("%Y-%m-%d %H:%M UTC")
            )),
            None => runtime.info_println(&format!("Release already exists for tag {}.", tag_name)),
        }
        return Ok(ReleaseOutcome::AlreadyExists {
            tag_name: tag_name.to_string(),
            created_at: existing.created_at,
        });
    }

    let mut links = parse_asset_tokens(&config.assets)?;

    match &config.artifacts {
        ArtifactSource::None => {}
        ArtifactSource::Jobs(job_names) => {
            let pipeline_id =
                config
                    .ci
                    .pipeline_id
                    .ok_or_else(|| ConfigError::MissingEnvironment {
                        variable: "CI_PIPELINE_ID".to_string(),
                        purpose: "linking pipeline job artifacts".to_string(),
                    })?;
            let jobs = manager.pipeline_jobs(pipeline_id).await?;
            links.extend(resolve_artifacts(job_names, &jobs, &config.project_url)?);
        }
        ArtifactSource::CurrentJob => {
            let job_id = config
                .ci
                .job_id
                .ok_or_else(|| ConfigError::MissingEnvironment {
                    variable: "CI_JOB_ID".to_string(),
                    purpose: "linking the current job's artifacts".to_string(),
                })?;
            links.push(resolve_current_job_artifact(
                &config.server_url,
                manager.project().id,
                job_id,
            ));
        }
    }

    let section = match &config.changelog {
        Some(path) => match changelog::read_section(path, tag_name).await {
            Ok(section) => Some(section),
            Err(ChangelogError::SectionNotFound { version }) => {
                runtime.warning_println(&format!(
                    "No changelog entry for {} in {}.",
                    version,
                    path.display()
                ));
                None
            }
            Err(e) => return Err(e.into()),
        },
        None => None,
    };

    let request = CreateRelease {
        name: config.release_name.clone(),
        tag_name: tag_name.to_string(),
        description: compose_description(
            config.description.as_deref(),
            section.as_deref(),
            tag_name,
        ),
        assets: ReleaseAssets { links },
    };

    log::info!(
        "Creating release '{}' for tag {} with {} asset link(s)",
        request.name,
        request.tag_name,
        request.assets.links.len()
    );
    manager.create_release(&request).await?;

    runtime.success_println(&created_summary(tag_name, request.assets.links.len()));
    for link in &request.assets.links {
        runtime.indent(&format!("{}: {}", link.name, link.url));
    }

    Ok(ReleaseOutcome::Created { request })
}
