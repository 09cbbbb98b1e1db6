//! Two-project dry run: one project with an old artifact, one with none.

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};

use jiff::{Span, Timestamp, ToSpan};
use reaper_core::types::{Artifact, Job, Listing, Project, ProjectId};
use reaper_core::{ArtifactRemover, JobSource, RetentionWindow, RunTotals, aggregate, execute};

struct Fixture {
    jobs: HashMap<ProjectId, Vec<Job>>,
}

#[async_trait::async_trait]
impl JobSource for Fixture {
    async fn list_jobs(&self, project: &Project) -> Listing<Job> {
        Listing::exhausted(self.jobs.get(&project.id).cloned().unwrap_or_default())
    }
}

#[derive(Default)]
struct CountingRemover {
    calls: AtomicUsize,
}

#[async_trait::async_trait]
impl ArtifactRemover for CountingRemover {
    async fn delete_artifacts(&self, _job: &Job) -> reaper_core::Result<()> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}

fn weeks_ago(now: Timestamp, weeks: i64) -> Timestamp {
    now.checked_sub(Span::new().hours(weeks * 7 * 24)).unwrap()
}

#[tokio::test]
async fn dry_run_reports_without_deleting() {
    let now: Timestamp = "2024-06-01T08:30:00Z".parse().unwrap();
    let finished = weeks_ago(now, 5).to_string();

    let fixture = Fixture {
        jobs: HashMap::from([
            (
                1,
                vec![Job::new(11, 1, Some(finished.clone()))
                    .with_artifacts(vec![Artifact::sized(1000)])],
            ),
            (2, vec![Job::new(21, 2, Some(finished))]),
        ]),
    };
    let projects = vec![Project::new(2, "group/b"), Project::new(1, "group/a")];

    let summaries = aggregate(&projects, &fixture).await;
    assert_eq!(summaries.len(), 2);
    assert_eq!(summaries[0].project_name, "group/a");
    assert_eq!(summaries[0].total_size, 1000);
    assert_eq!(summaries[1].project_name, "group/b");
    assert_eq!(summaries[1].total_size, 0);

    let cutoff = RetentionWindow::new(4.weeks())
        .unwrap()
        .cutoff_from(now)
        .unwrap();
    assert_eq!(cutoff, weeks_ago(now, 4));

    let remover = CountingRemover::default();
    let mut totals = RunTotals::default();
    let mut deleted = Vec::new();
    for summary in &summaries {
        let report = execute(summary, cutoff, true, &remover).await;
        deleted.push((report.project_name.clone(), report.deleted_bytes));
        totals += &report;
    }

    assert_eq!(
        deleted,
        vec![("group/a".to_string(), 1000), ("group/b".to_string(), 0)]
    );
    assert_eq!(totals.deleted_bytes, 1000);
    assert_eq!(remover.calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn real_run_deletes_only_old_artifacts() {
    let now: Timestamp = "2024-06-01T08:30:00Z".parse().unwrap();

    let fixture = Fixture {
        jobs: HashMap::from([(
            1,
            vec![
                Job::new(1, 1, Some(weeks_ago(now, 5).to_string()))
                    .with_artifacts(vec![Artifact::sized(300), Artifact::default()]),
                Job::new(2, 1, Some(weeks_ago(now, 1).to_string()))
                    .with_artifacts(vec![Artifact::sized(700)]),
            ],
        )]),
    };

    let summaries = aggregate(&[Project::new(1, "group/a")], &fixture).await;
    assert_eq!(summaries[0].total_size, 1000);

    let cutoff = RetentionWindow::default().cutoff_from(now).unwrap();
    let remover = CountingRemover::default();
    let report = execute(&summaries[0], cutoff, false, &remover).await;

    assert_eq!(report.deleted_bytes, 300);
    assert_eq!(report.deleted_jobs, 1);
    assert_eq!(remover.calls.load(Ordering::SeqCst), 1);
}
