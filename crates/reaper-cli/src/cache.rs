//! Project-list snapshot.
//!
//! Enumerating every project of a large instance is slow, so a complete
//! enumeration is written to disk and reused by later runs.

use std::fs;
use std::io::ErrorKind as IoErrorKind;
use std::path::{Path, PathBuf};

use reaper_core::types::{Listing, Project};
use reaper_core::{Error, ProjectQuery, ProjectSource, Result};

/// Tracing target for the project cache.
pub const TRACING_TARGET: &str = "reaper_cli::cache";

/// JSON snapshot of `{id, name}` project records.
#[derive(Debug, Clone)]
pub struct ProjectCache {
    path: PathBuf,
}

impl ProjectCache {
    /// Creates a cache stored at `path`.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Returns the snapshot path.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Reads the snapshot.
    ///
    /// Returns `None` if the file is absent, unreadable or corrupt.
    pub fn load(&self) -> Option<Vec<Project>> {
        let raw = match fs::read(&self.path) {
            Ok(raw) => raw,
            Err(e) if e.kind() == IoErrorKind::NotFound => {
                tracing::debug!(
                    target: TRACING_TARGET,
                    path = %self.path.display(),
                    "no project snapshot"
                );
                return None;
            }
            Err(e) => {
                tracing::warn!(
                    target: TRACING_TARGET,
                    path = %self.path.display(),
                    error = %e,
                    "unreadable project snapshot, ignoring"
                );
                return None;
            }
        };

        match serde_json::from_slice::<Vec<Project>>(&raw) {
            Ok(projects) => {
                tracing::info!(
                    target: TRACING_TARGET,
                    path = %self.path.display(),
                    projects = projects.len(),
                    "loaded project snapshot"
                );
                Some(projects)
            }
            Err(e) => {
                tracing::warn!(
                    target: TRACING_TARGET,
                    path = %self.path.display(),
                    error = %e,
                    "corrupt project snapshot, ignoring"
                );
                None
            }
        }
    }

    /// Writes `projects` as the new snapshot.
    pub fn store(&self, projects: &[Project]) -> Result<()> {
        let json = serde_json::to_vec_pretty(projects).map_err(|e| {
            Error::serialization()
                .with_message("failed to encode project snapshot")
                .with_source(e)
        })?;

        fs::write(&self.path, json).map_err(|e| {
            Error::from(e).with_context(format!("writing {}", self.path.display()))
        })?;

        tracing::info!(
            target: TRACING_TARGET,
            path = %self.path.display(),
            projects = projects.len(),
            "stored project snapshot"
        );
        Ok(())
    }

    /// Returns the project list, from the snapshot when possible.
    ///
    /// With `refresh` set, or without a usable snapshot, projects are
    /// enumerated from `source`. The result is written back only when the
    /// enumeration was exhausted; a truncated listing is returned as is.
    pub async fn resolve<S>(
        &self,
        source: &S,
        query: &ProjectQuery,
        refresh: bool,
    ) -> Listing<Project>
    where
        S: ProjectSource + ?Sized,
    {
        if !refresh && let Some(projects) = self.load() {
            return Listing::exhausted(projects);
        }

        tracing::info!(target: TRACING_TARGET, "enumerating projects");
        let listing = source.list_projects(query).await;

        match listing.error() {
            None => {
                if let Err(error) = self.store(&listing.items) {
                    tracing::warn!(
                        target: TRACING_TARGET,
                        error = %error,
                        "could not store project snapshot"
                    );
                }
            }
            Some(error) => {
                tracing::warn!(
                    target: TRACING_TARGET,
                    error = %error,
                    projects = listing.items.len(),
                    "project enumeration incomplete, snapshot not written"
                );
            }
        }

        listing
    }
}
