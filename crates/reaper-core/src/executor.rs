//! Deleting the artifacts of eligible jobs.
//!
//! The executor walks one project summary at a time. Each eligible job gets
//! exactly one delete call (none in dry-run mode); a failed call is logged
//! and the walk moves on to the next job.

use std::ops::AddAssign;

use jiff::Timestamp;

use crate::provider::ArtifactRemover;
use crate::retention::{Decision, evaluate};
use crate::types::{ProjectId, ProjectSummary};

/// Tracing target for deletion.
pub const TRACING_TARGET: &str = "reaper_core::executor";

/// Outcome of processing one project.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DeletionReport {
    /// Project identifier.
    pub project_id: ProjectId,
    /// Namespaced project path.
    pub project_name: String,
    /// Bytes held by eligible jobs, whether or not their delete call succeeded.
    pub deleted_bytes: u64,
    /// Jobs that fell before the cutoff.
    pub eligible_jobs: usize,
    /// Eligible jobs whose delete call succeeded.
    pub deleted_jobs: usize,
    /// Eligible jobs whose delete call failed.
    pub failed_jobs: usize,
    /// Jobs kept because they are empty, unfinished or recent.
    pub skipped_jobs: usize,
    /// Jobs excluded because their completion time could not be parsed.
    pub malformed_jobs: usize,
    /// Whether the run only counted.
    pub dry_run: bool,
}

/// Processes every job of `summary` against `cutoff`.
///
/// In dry-run mode no call reaches `remover`. Otherwise each eligible job
/// triggers one delete call; a failure is logged and counted, never
/// propagated. The returned `deleted_bytes` is identical in both modes.
pub async fn execute<R>(
    summary: &ProjectSummary,
    cutoff: Timestamp,
    dry_run: bool,
    remover: &R,
) -> DeletionReport
where
    R: ArtifactRemover + ?Sized,
{
    let mut report = DeletionReport {
        project_id: summary.project_id,
        project_name: summary.project_name.clone(),
        dry_run,
        ..DeletionReport::default()
    };

    let total = summary.jobs.len();
    for (index, job) in summary.jobs.iter().enumerate() {
        let evaluation = match evaluate(job, cutoff) {
            Ok(evaluation) => evaluation,
            Err(error) => {
                tracing::warn!(
                    target: TRACING_TARGET,
                    project = %summary.project_name,
                    job_id = job.id,
                    error = %error,
                    "skipping job with unparseable completion time"
                );
                report.malformed_jobs += 1;
                continue;
            }
        };

        if let Decision::Skipped(reason) = evaluation.decision {
            tracing::trace!(
                target: TRACING_TARGET,
                job_id = job.id,
                reason = %reason,
                "job kept"
            );
            report.skipped_jobs += 1;
            continue;
        }

        report.eligible_jobs += 1;
        report.deleted_bytes += evaluation.byte_total;

        if dry_run {
            tracing::debug!(
                target: TRACING_TARGET,
                job_id = job.id,
                bytes = evaluation.byte_total,
                "dry run, artifacts would be deleted"
            );
            continue;
        }

        tracing::info!(
            target: TRACING_TARGET,
            project = %summary.project_name,
            job_id = job.id,
            "deleting job artifacts [{}/{}]",
            index + 1,
            total
        );

        match remover.delete_artifacts(job).await {
            Ok(()) => report.deleted_jobs += 1,
            Err(error) if error.is_not_found() => {
                tracing::debug!(
                    target: TRACING_TARGET,
                    job_id = job.id,
                    "artifacts already gone"
                );
                report.deleted_jobs += 1;
            }
            Err(error) => {
                tracing::error!(
                    target: TRACING_TARGET,
                    project = %summary.project_name,
                    job_id = job.id,
                    error = %error,
                    "failed to delete job artifacts"
                );
                report.failed_jobs += 1;
            }
        }
    }

    report
}

/// Totals across all processed projects.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunTotals {
    /// Projects processed.
    pub projects: usize,
    /// Sum of `deleted_bytes`.
    pub deleted_bytes: u64,
    /// Sum of `eligible_jobs`.
    pub eligible_jobs: usize,
    /// Sum of `deleted_jobs`.
    pub deleted_jobs: usize,
    /// Sum of `failed_jobs`.
    pub failed_jobs: usize,
    /// Sum of `malformed_jobs`.
    pub malformed_jobs: usize,
}

impl AddAssign<&DeletionReport> for RunTotals {
    fn add_assign(&mut self, report: &DeletionReport) {
        self.projects += 1;
        self.deleted_bytes += report.deleted_bytes;
        self.eligible_jobs += report.eligible_jobs;
        self.deleted_jobs += report.deleted_jobs;
        self.failed_jobs += report.failed_jobs;
        self.malformed_jobs += report.malformed_jobs;
    }
}
