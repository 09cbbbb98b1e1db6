//! Jobs and the artifacts attached to them.

use serde::{Deserialize, Serialize};

use super::ProjectId;

/// Identifier of a job on the server.
pub type JobId = u64;

/// A stored build output attached to a job.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Artifact {
    /// Size in bytes. The server reports `null` for some artifact kinds.
    #[serde(default)]
    pub size: Option<u64>,
    /// Artifact kind (`archive`, `metadata`, `trace`, ...).
    #[serde(default)]
    pub file_type: Option<String>,
    /// Stored file name.
    #[serde(default)]
    pub filename: Option<String>,
}

impl Artifact {
    /// Creates an artifact of the given size.
    pub fn sized(size: u64) -> Self {
        Self {
            size: Some(size),
            ..Self::default()
        }
    }

    /// Returns the size, counting an unknown size as zero.
    #[inline]
    #[must_use]
    pub fn size_or_zero(&self) -> u64 {
        self.size.unwrap_or(0)
    }
}

/// Sums artifact sizes, treating unknown sizes as zero.
#[must_use]
pub fn byte_total(artifacts: &[Artifact]) -> u64 {
    artifacts.iter().map(Artifact::size_or_zero).sum()
}

/// One build job of a project.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Job {
    /// Server-side job identifier.
    pub id: JobId,
    /// Owning project.
    pub project_id: ProjectId,
    /// Completion time as reported by the server; `None` while the job runs.
    pub finished_at: Option<String>,
    /// Artifacts in server order.
    pub artifacts: Vec<Artifact>,
}

impl Job {
    /// Creates a job without artifacts.
    pub fn new(id: JobId, project_id: ProjectId, finished_at: Option<String>) -> Self {
        Self {
            id,
            project_id,
            finished_at,
            artifacts: Vec::new(),
        }
    }

    /// Attaches artifacts to the job.
    #[must_use]
    pub fn with_artifacts(mut self, artifacts: Vec<Artifact>) -> Self {
        self.artifacts = artifacts;
        self
    }

    /// Returns the combined size of the job's artifacts.
    #[must_use]
    pub fn byte_total(&self) -> u64 {
        byte_total(&self.artifacts)
    }

    /// Returns `true` if the job carries any artifacts.
    #[must_use]
    pub fn has_artifacts(&self) -> bool {
        !self.artifacts.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn null_sizes_count_as_zero() {
        let artifacts = vec![
            Artifact::sized(100),
            Artifact::default(),
            Artifact::sized(23),
            Artifact::default(),
        ];
        assert_eq!(byte_total(&artifacts), 123);
    }

    #[test]
    fn empty_artifacts_total_zero() {
        let job = Job::new(1, 1, None);
        assert_eq!(job.byte_total(), 0);
        assert!(!job.has_artifacts());
    }

    #[test]
    fn artifact_decodes_null_size() {
        let artifact: Artifact =
            serde_json::from_str(r#"{"file_type":"trace","size":null,"filename":"job.log"}"#)
                .unwrap();
        assert_eq!(artifact.size, None);
        assert_eq!(artifact.size_or_zero(), 0);
        assert_eq!(artifact.file_type.as_deref(), Some("trace"));
    }
}
