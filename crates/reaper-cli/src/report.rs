//! Run reporting.

use reaper_core::types::ProjectSummary;
use reaper_core::{DeletionReport, RunTotals, grand_total};

use crate::format::format_bytes;

/// Tracing target for reports.
pub const TRACING_TARGET: &str = "reaper_cli::report";

/// Returns at most `limit` summaries from the front of a size-ordered list.
pub fn largest(summaries: &[ProjectSummary], limit: usize) -> &[ProjectSummary] {
    &summaries[..limit.min(summaries.len())]
}

/// Logs the largest projects and the overall artifact volume.
pub fn log_largest(summaries: &[ProjectSummary], limit: usize) {
    tracing::info!(
        target: TRACING_TARGET,
        projects = summaries.len(),
        total = %format_bytes(grand_total(summaries)),
        "artifact storage by project"
    );

    for (rank, summary) in largest(summaries, limit).iter().enumerate() {
        tracing::info!(
            target: TRACING_TARGET,
            rank = rank + 1,
            project = %summary.project_name,
            project_id = summary.project_id,
            size = %format_bytes(summary.total_size),
            jobs = summary.jobs_with_artifacts(),
            complete = summary.complete,
            "largest projects"
        );
    }
}

/// Logs the outcome for one project.
pub fn log_deletion(report: &DeletionReport) {
    let verb = if report.dry_run { "would delete" } else { "deleted" };

    if report.eligible_jobs == 0 {
        tracing::debug!(
            target: TRACING_TARGET,
            project = %report.project_name,
            "nothing to delete"
        );
        return;
    }

    tracing::info!(
        target: TRACING_TARGET,
        project = %report.project_name,
        size = %format_bytes(report.deleted_bytes),
        eligible = report.eligible_jobs,
        deleted = report.deleted_jobs,
        failed = report.failed_jobs,
        malformed = report.malformed_jobs,
        "{verb}"
    );
}

/// Logs totals across all projects.
pub fn log_totals(totals: &RunTotals, dry_run: bool) {
    tracing::info!(
        target: TRACING_TARGET,
        dry_run,
        projects = totals.projects,
        size = %format_bytes(totals.deleted_bytes),
        eligible = totals.eligible_jobs,
        deleted = totals.deleted_jobs,
        failed = totals.failed_jobs,
        malformed = totals.malformed_jobs,
        "run finished"
    );

    if totals.failed_jobs > 0 {
        tracing::warn!(
            target: TRACING_TARGET,
            failed = totals.failed_jobs,
            "some artifacts could not be deleted"
        );
    }
}
