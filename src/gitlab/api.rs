//! The seam between the release flow and the GitLab API

use crate::error::Result;
use crate::gitlab::{CreateRelease, Job, Pipeline, Project, Release};
use async_trait::async_trait;

/// Operations the release flow needs from GitLab.
///
/// `GitLabClient` implements this over HTTP; tests substitute an in-memory
/// implementation.
#[async_trait]
pub trait ReleaseApi: Send + Sync {
    /// Fetch a project by ID
    async fn get_project(&self, project_id: u64) -> Result<Project>;

    /// Fetch the release for `tag_name`, `None` if there is none
    async fn get_release(&self, project: &Project, tag_name: &str) -> Result<Option<Release>>;

    /// Fetch a pipeline by ID
    async fn get_pipeline(&self, project: &Project, pipeline_id: u64) -> Result<Pipeline>;

    /// List every job of a pipeline
    async fn list_jobs(&self, project: &Project, pipeline: &Pipeline) -> Result<Vec<Job>>;

    /// Create a release
    async fn create_release(&self, project: &Project, payload: &CreateRelease) -> Result<Release>;
}
