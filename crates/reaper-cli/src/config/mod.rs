//! CLI configuration management.
//!
//! ```text
//! Cli
//! ├── gitlab: GitLabConfig        # Instance URL, token, page size
//! ├── retention: RetentionConfig  # Window, dry run, project selection
//! ├── cache: CacheConfig          # Project-list snapshot
//! ├── http: ReqwestConfig         # Request timeout, user agent
//! └── log_format: LogFormat       # text or json
//! ```
//!
//! All configuration can be provided via CLI arguments or environment variables.
//! Use `--help` to see all available options.
//!
//! # Example
//!
//! ```bash
//! reaper --base-url https://gitlab.example.com --access-token "$TOKEN" --retention 30
//!
//! # Or via environment variables
//! BASE_URL=https://gitlab.example.com ACCESS_TOKEN=... DRY_RUN=0 reaper
//! ```

mod gitlab;
mod retention;

use std::process;

use clap::Parser;
pub use gitlab::GitLabConfig;
use reaper_reqwest::ReqwestConfig;
pub use retention::{CacheConfig, RetentionConfig};

use crate::TRACING_TARGET_CONFIG;
use crate::telemetry::LogFormat;

/// Complete CLI configuration.
#[derive(Debug, Clone, Parser)]
#[command(name = "reaper")]
#[command(about = "Reclaims storage held by old GitLab job artifacts")]
#[command(version)]
pub struct Cli {
    /// GitLab instance and credentials.
    #[clap(flatten)]
    pub gitlab: GitLabConfig,

    /// Retention window and project selection.
    #[clap(flatten)]
    pub retention: RetentionConfig,

    /// Project-list snapshot.
    #[clap(flatten)]
    pub cache: CacheConfig,

    /// HTTP transport settings.
    #[clap(flatten)]
    pub http: ReqwestConfig,

    /// Log output format
    #[arg(long = "log-format", env = "LOG_FORMAT", value_enum, default_value_t = LogFormat::Text)]
    pub log_format: LogFormat,
}

impl Cli {
    /// Loads environment variables from .env file (if enabled) and parses CLI arguments.
    ///
    /// Invalid arguments print clap's message and exit with status 1;
    /// `--help` and `--version` exit with status 0.
    pub fn init() -> Self {
        Self::load_dotenv();

        match Self::try_parse() {
            Ok(cli) => cli,
            Err(err) if err.use_stderr() => {
                let _ = err.print();
                process::exit(1);
            }
            Err(err) => err.exit(),
        }
    }

    /// Loads environment variables from .env file if the dotenv feature is enabled.
    #[cfg(feature = "dotenv")]
    fn load_dotenv() {
        if let Err(err) = dotenvy::dotenv()
            && !err.not_found()
        {
            eprintln!("Warning: failed to load .env file: {err}");
        }
    }

    /// No-op when dotenv feature is disabled.
    #[cfg(not(feature = "dotenv"))]
    fn load_dotenv() {}

    /// Logs the effective configuration (no credentials).
    pub fn log(&self) {
        tracing::debug!(
            target: TRACING_TARGET_CONFIG,
            version = env!("CARGO_PKG_VERSION"),
            pid = process::id(),
            arch = std::env::consts::ARCH,
            os = std::env::consts::OS,
            features = ?Self::enabled_features(),
            "Build information"
        );

        tracing::info!(
            target: TRACING_TARGET_CONFIG,
            base_url = self.gitlab.base_url.as_deref().unwrap_or_default(),
            per_page = self.gitlab.per_page,
            retention = %self.retention.retention,
            dry_run = self.retention.dry_run,
            group = self.retention.group.as_deref(),
            project_id = self.retention.project_id,
            "Run configuration"
        );

        tracing::debug!(
            target: TRACING_TARGET_CONFIG,
            project_cache = %self.cache.project_cache.display(),
            refresh_projects = self.cache.refresh_projects,
            http_timeout_secs = self.http.http_timeout,
            user_agent = %self.http.effective_user_agent(),
            "Transport configuration"
        );
    }

    /// Returns a list of enabled compile-time features.
    fn enabled_features() -> Vec<&'static str> {
        [cfg!(feature = "dotenv").then_some("dotenv")]
            .into_iter()
            .flatten()
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use std::path::Path;

    use jiff::Timestamp;

    use super::*;

    const REQUIRED: [&str; 5] = [
        "reaper",
        "--base-url",
        "https://gitlab.example.com",
        "--access-token",
        "glpat-secret",
    ];

    fn at(raw: &str) -> Timestamp {
        raw.parse().unwrap()
    }

    fn now() -> Timestamp {
        at("2024-03-01T00:00:00Z")
    }

    fn parse(extra: &[&str]) -> Cli {
        Cli::try_parse_from(REQUIRED.iter().chain(extra)).unwrap()
    }

    #[test]
    fn defaults() {
        let cli = parse(&[]);
        assert!(cli.retention.dry_run);
        assert_eq!(cli.retention.cutoff(now()).unwrap(), at("2024-02-02T00:00:00Z"));
        assert_eq!(cli.retention.report_limit, 20);
        assert_eq!(cli.retention.group, None);
        assert_eq!(cli.gitlab.per_page, 100);
        assert_eq!(cli.cache.project_cache, Path::new("projects.json"));
        assert!(!cli.cache.refresh_projects);
        assert_eq!(cli.http.http_timeout, 30);
        assert_eq!(cli.log_format, LogFormat::Text);
    }

    #[test]
    fn dry_run_accepts_boolish_values() {
        assert!(!parse(&["--dry-run", "false"]).retention.dry_run);
        assert!(!parse(&["--dry-run", "0"]).retention.dry_run);
        assert!(!parse(&["--dry-run=no"]).retention.dry_run);
        assert!(parse(&["--dry-run", "yes"]).retention.dry_run);
        assert!(parse(&["--dry-run"]).retention.dry_run);
    }

    #[test]
    fn retention_accepts_days_and_spans() {
        let days = parse(&["--retention", "30"]);
        assert_eq!(days.retention.cutoff(now()).unwrap(), at("2024-01-31T00:00:00Z"));

        let span = parse(&["--retention", "2 weeks"]);
        assert_eq!(span.retention.cutoff(now()).unwrap(), at("2024-02-16T00:00:00Z"));

        let args = REQUIRED.iter().chain(&["--retention", "soon"]);
        assert!(Cli::try_parse_from(args).is_err());
    }

    #[test]
    fn selection_and_cache_flags() {
        let cli = parse(&[
            "--group",
            "platform/",
            "--project-id",
            "42",
            "--project-cache",
            "/tmp/p.json",
            "--refresh-projects",
            "--log-format",
            "json",
        ]);
        let filter = cli.retention.filter();
        assert_eq!(filter.group.as_deref(), Some("platform/"));
        assert_eq!(filter.project_id, Some(42));
        assert_eq!(cli.cache.project_cache, Path::new("/tmp/p.json"));
        assert!(cli.cache.refresh_projects);
        assert_eq!(cli.log_format, LogFormat::Json);
    }
}
