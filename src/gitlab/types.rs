//! GitLab v4 REST payloads used by the release flow

use crate::assets::AssetLink;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A GitLab project
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Project {
    /// Numeric project ID
    pub id: u64,
    /// Project name
    #[serde(default)]
    pub name: String,
    /// `group/project` path
    #[serde(default)]
    pub path_with_namespace: String,
    /// Browser URL of the project
    #[serde(default)]
    pub web_url: String,
}

/// An existing release
#[derive(Debug, Clone, Deserialize)]
pub struct Release {
    /// Tag the release points at
    pub tag_name: String,
    /// Release title
    #[serde(default)]
    pub name: Option<String>,
    /// Markdown description
    #[serde(default)]
    pub description: Option<String>,
    /// Creation timestamp
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

/// A CI pipeline
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Pipeline {
    /// Pipeline ID
    pub id: u64,
    /// Pipeline status (`running`, `success`, ...)
    #[serde(default)]
    pub status: Option<String>,
    /// Git ref the pipeline runs for
    #[serde(rename = "ref", default)]
    pub git_ref: Option<String>,
}

/// A job within a pipeline
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Job {
    /// Job ID
    pub id: u64,
    /// Job name as defined in .gitlab-ci.yml
    pub name: String,
}

/// Body of `POST /projects/:id/releases`
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CreateRelease {
    /// Release title
    pub name: String,
    /// Tag to release
    pub tag_name: String,
    /// Markdown description
    pub description: String,
    /// Linked assets
    pub assets: ReleaseAssets,
}

/// Asset block of a release payload
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ReleaseAssets {
    /// Links in caller order
    pub links: Vec<AssetLink>,
}
