//! Per-project artifact summaries.

use super::{Job, Listing, Project, ProjectId};

/// All jobs of one project together with their combined artifact size.
///
/// `total_size` covers every job regardless of the retention cutoff; it
/// reports how much storage exists, not how much will be removed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectSummary {
    /// Project identifier.
    pub project_id: ProjectId,
    /// Namespaced project path.
    pub project_name: String,
    /// Sum of all artifact sizes over all jobs.
    pub total_size: u64,
    /// Jobs in server order.
    pub jobs: Vec<Job>,
    /// `false` if the job listing was cut short.
    pub complete: bool,
}

impl ProjectSummary {
    /// Builds a summary from a project and its job listing.
    pub fn new(project: &Project, jobs: Listing<Job>) -> Self {
        let complete = jobs.is_complete();
        let jobs = jobs.items;
        let total_size = jobs.iter().map(Job::byte_total).sum();

        Self {
            project_id: project.id,
            project_name: project.name.clone(),
            total_size,
            jobs,
            complete,
        }
    }

    /// Returns the number of jobs that carry artifacts.
    #[must_use]
    pub fn jobs_with_artifacts(&self) -> usize {
        self.jobs.iter().filter(|job| job.has_artifacts()).count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Error;
    use crate::types::Artifact;

    #[test]
    fn total_covers_every_job() {
        let project = Project::new(7, "group/app");
        let jobs = vec![
            Job::new(1, 7, Some("2020-01-01T00:00:00.000Z".into()))
                .with_artifacts(vec![Artifact::sized(10), Artifact::default()]),
            Job::new(2, 7, None).with_artifacts(vec![Artifact::sized(5)]),
            Job::new(3, 7, Some("not a date".into())),
        ];

        let summary = ProjectSummary::new(&project, Listing::exhausted(jobs));
        assert_eq!(summary.total_size, 15);
        assert_eq!(summary.jobs.len(), 3);
        assert_eq!(summary.jobs_with_artifacts(), 2);
        assert!(summary.complete);
    }

    #[test]
    fn truncated_listing_marks_summary_incomplete() {
        let project = Project::new(7, "group/app");
        let jobs = vec![Job::new(1, 7, None).with_artifacts(vec![Artifact::sized(1)])];

        let summary = ProjectSummary::new(&project, Listing::truncated(jobs, Error::timeout()));
        assert!(!summary.complete);
        assert_eq!(summary.total_size, 1);
    }
}
