//! Traits implemented by API clients.
//!
//! The aggregator and the deletion executor only see these traits, so they
//! can run against the GitLab client or against in-memory doubles.

use crate::Result;
use crate::types::{Job, Listing, Project};

/// Query used to enumerate projects.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectQuery {
    /// Include archived projects.
    pub archived: bool,
    /// Page-size hint.
    pub per_page: u32,
}

impl Default for ProjectQuery {
    fn default() -> Self {
        Self {
            archived: false,
            per_page: 100,
        }
    }
}

/// Enumerates the projects visible to the credential.
#[async_trait::async_trait]
pub trait ProjectSource: Send + Sync {
    /// Lists projects, stopping early (and saying so) if a page fails.
    async fn list_projects(&self, query: &ProjectQuery) -> Listing<Project>;
}

/// Enumerates the jobs of a project.
#[async_trait::async_trait]
pub trait JobSource: Send + Sync {
    /// Lists every job of `project`, stopping early (and saying so) if a page fails.
    async fn list_jobs(&self, project: &Project) -> Listing<Job>;
}

/// Deletes the artifacts of a job.
#[async_trait::async_trait]
pub trait ArtifactRemover: Send + Sync {
    /// Issues a single delete call for the artifacts of `job`.
    async fn delete_artifacts(&self, job: &Job) -> Result<()>;
}
