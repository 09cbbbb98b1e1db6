//! Data types shared across reaper crates.
//!
//! - **Project**: a project and the filter that selects projects for a run
//! - **Job / Artifact**: build jobs and their stored outputs
//! - **Listing**: items read from a paginated collection, with completion state
//! - **ProjectSummary**: a project's jobs and total artifact size

mod job;
mod listing;
mod project;
mod summary;

pub use job::{Artifact, Job, JobId, byte_total};
pub use listing::{Completion, Listing};
pub use project::{Project, ProjectFilter, ProjectId};
pub use summary::ProjectSummary;
