//! Run orchestration: enumerate, aggregate, report, delete.

use anyhow::Context;
use jiff::Timestamp;
use reaper_core::types::{Completion, ProjectFilter};
use reaper_core::{
    ArtifactRemover, JobSource, ProjectQuery, ProjectSource, RunTotals, aggregate, execute,
};
use reaper_reqwest::GitLabClient;

use crate::cache::ProjectCache;
use crate::config::Cli;
use crate::report;

/// Tracing target for run orchestration.
pub const TRACING_TARGET: &str = "reaper_cli::run";

/// Validated settings for one run.
#[derive(Debug, Clone)]
pub struct RunPlan {
    /// Jobs finished before this instant are eligible.
    pub cutoff: Timestamp,
    /// Count instead of delete.
    pub dry_run: bool,
    /// Project selection.
    pub filter: ProjectFilter,
    /// Enumeration parameters.
    pub query: ProjectQuery,
    /// Ignore the project snapshot.
    pub refresh: bool,
    /// Number of projects in the size report.
    pub report_limit: usize,
}

impl RunPlan {
    /// Builds the plan from the parsed command line.
    pub fn from_cli(cli: &Cli, now: Timestamp) -> reaper_core::Result<Self> {
        Ok(Self {
            cutoff: cli.retention.cutoff(now)?,
            dry_run: cli.retention.dry_run,
            filter: cli.retention.filter(),
            query: ProjectQuery {
                archived: false,
                per_page: cli.gitlab.per_page,
            },
            refresh: cli.cache.refresh_projects,
            report_limit: cli.retention.report_limit,
        })
    }
}

/// Validates the configuration, connects and runs.
///
/// Every configuration error surfaces before the first request.
pub async fn run(cli: &Cli) -> anyhow::Result<RunTotals> {
    let endpoint = cli
        .gitlab
        .endpoint()
        .context("invalid GitLab configuration")?;
    let plan = RunPlan::from_cli(cli, Timestamp::now()).context("invalid retention window")?;
    let client =
        GitLabClient::new(endpoint, cli.http.clone()).context("failed to create GitLab client")?;
    let cache = ProjectCache::new(&cli.cache.project_cache);

    Ok(reap(&client, &cache, &plan).await)
}

/// Runs the pipeline against any provider.
pub async fn reap<C>(client: &C, cache: &ProjectCache, plan: &RunPlan) -> RunTotals
where
    C: ProjectSource + JobSource + ArtifactRemover,
{
    tracing::info!(
        target: TRACING_TARGET,
        cutoff = %plan.cutoff,
        dry_run = plan.dry_run,
        project_cache = %cache.path().display(),
        "starting run"
    );

    let (projects, completion) = cache
        .resolve(client, &plan.query, plan.refresh)
        .await
        .into_parts();

    if let Completion::Truncated(error) = &completion {
        tracing::error!(
            target: TRACING_TARGET,
            error = %error,
            projects = projects.len(),
            "project enumeration stopped early, continuing with the projects found"
        );
    }

    let projects = plan.filter.apply(projects);
    if projects.is_empty() {
        tracing::warn!(target: TRACING_TARGET, "no project matches the selection");
        return RunTotals::default();
    }

    let summaries = aggregate(&projects, client).await;
    report::log_largest(&summaries, plan.report_limit);

    let mut totals = RunTotals::default();
    for summary in &summaries {
        let deletion = execute(summary, plan.cutoff, plan.dry_run, client).await;
        report::log_deletion(&deletion);
        totals += &deletion;
    }

    report::log_totals(&totals, plan.dry_run);
    totals
}
