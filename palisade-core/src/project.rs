// SPDX-License-Identifier: MIT OR Apache-2.0

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::identity::{ProjectId, Timestamp, UserId};

/// Lifecycle status of a project as shown in overview listings.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProjectStatus {
    /// No annotation work has happened yet.
    Active,

    /// Annotation work is in progress.
    Annotated,

    /// Every task has been finished.
    Completed,
}

impl fmt::Display for ProjectStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ProjectStatus::Active => "active",
            ProjectStatus::Annotated => "annotated",
            ProjectStatus::Completed => "completed",
        };

        write!(f, "{}", s)
    }
}

/// A project record as maintained by the external CRUD layer.
///
/// The engine only reasons about ownership and progress counters; project
/// content (tasks, annotations) is out of scope.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Project {
    pub id: ProjectId,
    pub title: String,
    pub created_by: UserId,
    pub created_at: Timestamp,
    pub task_count: u64,
    pub finished_task_count: u64,
    pub annotation_count: u64,
}

impl Project {
    /// Status derived from the progress counters alone.
    pub fn derived_status(&self) -> ProjectStatus {
        if self.task_count > 0 && self.finished_task_count >= self.task_count {
            ProjectStatus::Completed
        } else if self.annotation_count > 0 || self.finished_task_count > 0 {
            ProjectStatus::Annotated
        } else {
            ProjectStatus::Active
        }
    }
}

/// The status shown for a project: a manual override always wins over the
/// derived status and persists until explicitly cleared.
pub fn displayed_status(project: &Project, manual: Option<ProjectStatus>) -> ProjectStatus {
    manual.unwrap_or_else(|| project.derived_status())
}

#[cfg(test)]
mod tests {
    use crate::identity::{ProjectId, UserId};

    use super::{Project, ProjectStatus, displayed_status};

    fn project(task_count: u64, finished: u64, annotations: u64) -> Project {
        Project {
            id: ProjectId(1),
            title: "Street scenes".to_string(),
            created_by: UserId(1),
            created_at: 0,
            task_count,
            finished_task_count: finished,
            annotation_count: annotations,
        }
    }

    #[test]
    fn derived_status_rules() {
        assert_eq!(project(0, 0, 0).derived_status(), ProjectStatus::Active);
        assert_eq!(project(10, 0, 0).derived_status(), ProjectStatus::Active);
        assert_eq!(project(10, 0, 3).derived_status(), ProjectStatus::Annotated);
        assert_eq!(project(10, 4, 0).derived_status(), ProjectStatus::Annotated);
        assert_eq!(project(10, 10, 12).derived_status(), ProjectStatus::Completed);
        assert_eq!(project(10, 12, 12).derived_status(), ProjectStatus::Completed);
        // A project without tasks is never complete, even with annotations.
        assert_eq!(project(0, 0, 5).derived_status(), ProjectStatus::Annotated);
    }

    #[test]
    fn manual_status_wins_over_derived() {
        let mut p = project(10, 10, 10);
        assert_eq!(
            displayed_status(&p, Some(ProjectStatus::Active)),
            ProjectStatus::Active
        );

        // Counters drop below completion: the override persists.
        p.finished_task_count = 2;
        assert_eq!(
            displayed_status(&p, Some(ProjectStatus::Completed)),
            ProjectStatus::Completed
        );
        assert_eq!(displayed_status(&p, None), ProjectStatus::Annotated);
    }
}
