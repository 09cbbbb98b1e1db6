//! Provider implementations.
//!
//! This module implements the `reaper-core` provider traits for [`GitLabClient`].

use reaper_core::types::{Artifact, Job, Listing, Project};
use reaper_core::{ArtifactRemover, JobSource, ProjectQuery, ProjectSource, Result};
use serde::Deserialize;

use crate::client::GitLabClient;

/// Project as returned by `GET /projects?simple=true`.
#[derive(Debug, Deserialize)]
struct ProjectRecord {
    id: u64,
    path_with_namespace: String,
}

impl From<ProjectRecord> for Project {
    fn from(record: ProjectRecord) -> Self {
        Project::new(record.id, record.path_with_namespace)
    }
}

/// Job as returned by `GET /projects/:id/jobs`.
#[derive(Debug, Deserialize)]
struct JobRecord {
    id: u64,
    #[serde(default)]
    finished_at: Option<String>,
    #[serde(default)]
    artifacts: Option<Vec<Artifact>>,
}

impl JobRecord {
    fn into_job(self, project_id: u64) -> Job {
        Job::new(self.id, project_id, self.finished_at)
            .with_artifacts(self.artifacts.unwrap_or_default())
    }
}

#[async_trait::async_trait]
impl ProjectSource for GitLabClient {
    async fn list_projects(&self, query: &ProjectQuery) -> Listing<Project> {
        let params = [
            ("simple", "true".to_owned()),
            ("archived", query.archived.to_string()),
            ("per_page", query.per_page.to_string()),
        ];

        self.read::<ProjectRecord>("/projects", &params)
            .await
            .map(Project::from)
    }
}

#[async_trait::async_trait]
impl JobSource for GitLabClient {
    async fn list_jobs(&self, project: &Project) -> Listing<Job> {
        let path = format!("/projects/{}/jobs", project.id);
        let params = [("per_page", self.endpoint().per_page().to_string())];

        self.read::<JobRecord>(&path, &params)
            .await
            .map(|record| record.into_job(project.id))
    }
}

#[async_trait::async_trait]
impl ArtifactRemover for GitLabClient {
    async fn delete_artifacts(&self, job: &Job) -> Result<()> {
        let path = format!("/projects/{}/jobs/{}/artifacts", job.project_id, job.id);
        self.delete(&path).await
    }
}

#[cfg(test)]
mod tests {
    use reaper_core::ErrorKind;

    use super::*;
    use crate::client::ApiEndpoint;
    use crate::connect::RawResponse;
    use crate::connect::testing::ScriptedTransport;
    use crate::method::ApiMethod;

    fn client(transport: ScriptedTransport) -> GitLabClient {
        let endpoint = ApiEndpoint::new("https://gitlab.test", "secret")
            .unwrap()
            .with_per_page(50);
        GitLabClient::with_transport(endpoint, transport)
    }

    #[tokio::test]
    async fn projects_use_namespaced_path() {
        let transport = ScriptedTransport::default().json(
            200,
            r#"[{"id": 4, "name": "api", "path_with_namespace": "platform/api"}]"#,
            None,
        );
        let requests = transport.requests();

        let listing = client(transport)
            .list_projects(&ProjectQuery {
                archived: false,
                per_page: 100,
            })
            .await;

        assert!(listing.is_complete());
        assert_eq!(listing.items, vec![Project::new(4, "platform/api")]);

        let requests = requests.lock().unwrap();
        let query = requests[0].1.query().unwrap();
        assert!(query.contains("simple=true"));
        assert!(query.contains("archived=false"));
        assert!(query.contains("per_page=100"));
    }

    #[tokio::test]
    async fn jobs_decode_null_sizes_and_missing_artifacts() {
        let transport = ScriptedTransport::default().json(
            200,
            r#"[
                {"id": 1, "status": "success", "finished_at": "2024-01-01T10:00:00.123Z",
                 "artifacts": [{"file_type": "archive", "size": 2048, "filename": "a.zip"},
                               {"file_type": "trace", "size": null, "filename": "job.log"}]},
                {"id": 2, "status": "running", "finished_at": null, "artifacts": []},
                {"id": 3, "status": "manual"}
            ]"#,
            None,
        );
        let requests = transport.requests();

        let listing = client(transport)
            .list_jobs(&Project::new(9, "platform/api"))
            .await;

        assert!(listing.is_complete());
        let jobs = listing.items;
        assert_eq!(jobs.len(), 3);
        assert_eq!(jobs[0].project_id, 9);
        assert_eq!(jobs[0].byte_total(), 2048);
        assert_eq!(jobs[1].finished_at, None);
        assert!(jobs[2].artifacts.is_empty());

        let requests = requests.lock().unwrap();
        assert_eq!(requests[0].1.path(), "/api/v4/projects/9/jobs");
        assert!(requests[0].1.query().unwrap().contains("per_page=50"));
    }

    #[tokio::test]
    async fn delete_targets_job_artifacts() {
        let transport = ScriptedTransport::default().respond(RawResponse::new(204, ""));
        let requests = transport.requests();

        let job = Job::new(77, 9, None);
        client(transport).delete_artifacts(&job).await.unwrap();

        let requests = requests.lock().unwrap();
        assert_eq!(requests.len(), 1);
        assert_eq!(requests[0].0, ApiMethod::Delete);
        assert_eq!(requests[0].1.path(), "/api/v4/projects/9/jobs/77/artifacts");
    }

    #[tokio::test]
    async fn delete_of_missing_artifacts_is_not_found() {
        let transport = ScriptedTransport::default().respond(RawResponse::new(404, ""));

        let error = client(transport)
            .delete_artifacts(&Job::new(1, 1, None))
            .await
            .unwrap_err();
        assert_eq!(error.kind(), ErrorKind::NotFound);
    }
}
