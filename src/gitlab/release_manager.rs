//! GitLab release management scoped to a single project

use crate::error::Result;
use crate::gitlab::{CreateRelease, Job, Project, Release, ReleaseApi};

/// Release operations against one project
pub struct GitLabReleaseManager<'a, A: ReleaseApi + ?Sized> {
    api: &'a A,
    project: Project,
}

impl<'a, A: ReleaseApi + ?Sized> GitLabReleaseManager<'a, A> {
    /// Fetch the project and bind the manager to it
    pub async fn connect(api: &'a A, project_id: u64) -> Result<Self> {
        let project = api.get_project(project_id).await?;
        log::info!(
            "Using project {} ({})",
            project.id,
            if project.path_with_namespace.is_empty() {
                &project.name
            } else {
                &project.path_with_namespace
            }
        );
        Ok(Self { api, project })
    }

    /// The bound project
    pub fn project(&self) -> &Project {
        &self.project
    }

    /// Look up the release for `tag_name`.
    ///
    /// # Returns
    /// - `Ok(Some(_))` - Release exists
    /// - `Ok(None)` - Release does not exist
    /// - `Err(_)` - Network or authentication error
    pub async fn existing_release(&self, tag_name: &str) -> Result<Option<Release>> {
        self.api.get_release(&self.project, tag_name).await
    }

    /// All jobs of `pipeline_id`
    pub async fn pipeline_jobs(&self, pipeline_id: u64) -> Result<Vec<Job>> {
        let pipeline = self.api.get_pipeline(&self.project, pipeline_id).await?;
        self.api.list_jobs(&self.project, &pipeline).await
    }

    /// Submit the create-release call
    pub async fn create_release(&self, payload: &CreateRelease) -> Result<Release> {
        self.api.create_release(&self.project, payload).await
    }
}
