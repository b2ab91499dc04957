//! GitLab integration for release operations

mod api;
mod client;
mod release_manager;
mod types;

pub use api::ReleaseApi;
pub use client::GitLabClient;
pub use release_manager::GitLabReleaseManager;
pub use types::{CreateRelease, Job, Pipeline, Project, Release, ReleaseAssets};
