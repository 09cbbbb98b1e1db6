//! Retention policy and project selection.

use std::path::PathBuf;

use clap::builder::BoolishValueParser;
use clap::{ArgAction, Args};
use jiff::Timestamp;
use reaper_core::types::ProjectFilter;
use reaper_core::{Result, RetentionWindow};

/// Which projects to look at and which artifacts to remove.
#[derive(Debug, Clone, Args)]
pub struct RetentionConfig {
    /// Keep artifacts younger than this: days (`28`) or a span (`4w`, `P30D`)
    #[arg(long, env = "RETENTION", default_value = "4w")]
    pub retention: RetentionWindow,

    /// Only report what would be deleted
    #[arg(
        long = "dry-run",
        env = "DRY_RUN",
        action = ArgAction::Set,
        value_parser = BoolishValueParser::new(),
        num_args = 0..=1,
        default_value = "true",
        default_missing_value = "true"
    )]
    pub dry_run: bool,

    /// Only process projects whose path contains this string
    #[arg(long, env = "GROUP")]
    pub group: Option<String>,

    /// Only process the project with this id
    #[arg(long = "project-id", env = "PROJECT_ID")]
    pub project_id: Option<u64>,

    /// Number of largest projects listed in the report
    #[arg(long = "report-limit", env = "REPORT_LIMIT", default_value_t = 20)]
    pub report_limit: usize,
}

impl RetentionConfig {
    /// Computes the retention cutoff relative to `now`.
    pub fn cutoff(&self, now: Timestamp) -> Result<Timestamp> {
        self.retention.cutoff_from(now)
    }

    /// Builds the project filter.
    pub fn filter(&self) -> ProjectFilter {
        ProjectFilter {
            group: self.group.clone(),
            project_id: self.project_id,
        }
    }
}

/// Project-list snapshot settings.
#[derive(Debug, Clone, Args)]
pub struct CacheConfig {
    /// Path of the project-list snapshot
    #[arg(long = "project-cache", env = "PROJECT_CACHE", default_value = "projects.json")]
    pub project_cache: PathBuf,

    /// Ignore an existing snapshot and enumerate projects again
    #[arg(
        long = "refresh-projects",
        env = "REFRESH_PROJECTS",
        action = ArgAction::SetTrue,
        value_parser = BoolishValueParser::new()
    )]
    pub refresh_projects: bool,
}
