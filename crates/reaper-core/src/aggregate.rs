//! Folding projects and their jobs into size-ordered summaries.

use std::cmp::Reverse;

use crate::provider::JobSource;
use crate::types::{Project, ProjectSummary};

/// Tracing target for aggregation.
pub const TRACING_TARGET: &str = "reaper_core::aggregate";

/// Fetches every project's jobs and returns summaries, largest first.
///
/// Each project's jobs are listed exactly once. The whole result is
/// materialized before returning so a complete report can be shown before
/// anything is deleted. Projects with equal totals keep their input order.
pub async fn aggregate<S>(projects: &[Project], source: &S) -> Vec<ProjectSummary>
where
    S: JobSource + ?Sized,
{
    let total = projects.len();
    let mut summaries = Vec::with_capacity(total);

    for (index, project) in projects.iter().enumerate() {
        tracing::info!(
            target: TRACING_TARGET,
            project = %project.name,
            "fetching jobs [{}/{}]",
            index + 1,
            total
        );

        let jobs = source.list_jobs(project).await;
        if let Some(error) = jobs.error() {
            tracing::warn!(
                target: TRACING_TARGET,
                project = %project.name,
                fetched = jobs.items.len(),
                error = %error,
                "job listing stopped early, summary is partial"
            );
        }

        let summary = ProjectSummary::new(project, jobs);
        tracing::debug!(
            target: TRACING_TARGET,
            project = %summary.project_name,
            jobs = summary.jobs.len(),
            total_size = summary.total_size,
            "project summarized"
        );
        summaries.push(summary);
    }

    summaries.sort_by_key(|summary| Reverse(summary.total_size));
    summaries
}

/// Sums `total_size` over all summaries.
#[must_use]
pub fn grand_total(summaries: &[ProjectSummary]) -> u64 {
    summaries.iter().map(|summary| summary.total_size).sum()
}
