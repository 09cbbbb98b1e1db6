//! Projects and project selection.

use serde::{Deserialize, Serialize};

/// Identifier of a project on the server.
pub type ProjectId = u64;

/// A project whose jobs may hold artifacts.
///
/// Identity is the `id`; the `name` is the namespaced path
/// (`group/subgroup/project`) used for filtering and reporting.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Project {
    /// Server-side project identifier.
    pub id: ProjectId,
    /// Namespaced project path.
    pub name: String,
}

impl Project {
    /// Creates a new project.
    pub fn new(id: ProjectId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
        }
    }
}

/// Selects which projects take part in a run.
///
/// An empty filter selects every project.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProjectFilter {
    /// Substring the project path must contain.
    pub group: Option<String>,
    /// Exact project identifier.
    pub project_id: Option<ProjectId>,
}

impl ProjectFilter {
    /// Restricts selection to paths containing `group`.
    #[must_use]
    pub fn with_group(mut self, group: impl Into<String>) -> Self {
        self.group = Some(group.into());
        self
    }

    /// Restricts selection to a single project.
    #[must_use]
    pub fn with_project_id(mut self, project_id: ProjectId) -> Self {
        self.project_id = Some(project_id);
        self
    }

    /// Returns `true` if `project` passes every configured criterion.
    #[must_use]
    pub fn matches(&self, project: &Project) -> bool {
        let group_matches = match self.group.as_deref() {
            Some(group) if !group.is_empty() => project.name.contains(group),
            _ => true,
        };

        group_matches && self.project_id.is_none_or(|id| id == project.id)
    }

    /// Keeps the projects that match, preserving their order.
    #[must_use]
    pub fn apply(&self, projects: Vec<Project>) -> Vec<Project> {
        projects.into_iter().filter(|p| self.matches(p)).collect()
    }
}
