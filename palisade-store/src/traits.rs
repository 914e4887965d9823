// SPDX-License-Identifier: MIT OR Apache-2.0

//! Trait definitions for querying and mutating palisade access state.
use std::collections::{BTreeMap, BTreeSet};
use std::fmt::{Debug, Display};

use palisade_core::{Level, Project, ProjectId, ProjectStatus, User, UserId};

/// Interface for the assignment store: grants of project access from an
/// assigner to an assignee.
///
/// Implementations maintain two indices over the grant relation and must
/// keep them mutually consistent under every mutation:
///
/// - `assignee_index: assignee -> set(project)`
/// - `assigner_index: assigner -> project -> set(assignee)`
///
/// `project ∈ assignee_index[assignee]` holds if and only if some assigner
/// has `assignee ∈ assigner_index[assigner][project]`. When the last grant
/// for an `(assignee, project)` pair is removed the pair disappears from
/// both indices, and an assignee with an empty project set is pruned from
/// the assignee index entirely.
pub trait GrantStore: Clone {
    type Error: Display + Debug;

    /// Insert a grant.
    ///
    /// Merge semantics: re-granting an already-accessible project is a
    /// no-op on the assignee index and never an error. Returns `true` when
    /// the assignee gained access they did not have before.
    fn insert_grant(
        &mut self,
        assigner: UserId,
        assignee: UserId,
        project: ProjectId,
    ) -> Result<bool, Self::Error>;

    /// Withdraw an assignee's access to a project.
    ///
    /// The removal is assigner-agnostic: the audit entry of _every_
    /// granting assigner for this pair is cleared, since the access itself
    /// is being withdrawn, not a specific grant. Returns `true` when the
    /// assignee had access and it was removed.
    fn revoke_access(&mut self, assignee: UserId, project: ProjectId)
    -> Result<bool, Self::Error>;

    /// Withdraw every project grant for an assignee.
    ///
    /// Returns the number of projects the assignee lost access to.
    fn revoke_all_access(&mut self, assignee: UserId) -> Result<usize, Self::Error>;

    /// The set of projects an assignee currently has access to.
    fn projects_for(&self, assignee: UserId) -> Result<BTreeSet<ProjectId>, Self::Error>;

    /// Query whether an assignee has access to a project.
    fn has_access(&self, assignee: UserId, project: ProjectId) -> Result<bool, Self::Error>;

    /// The assignees a given assigner granted access to, for one project.
    fn assignees_for(
        &self,
        assigner: UserId,
        project: ProjectId,
    ) -> Result<BTreeSet<UserId>, Self::Error>;

    /// Every grant made by an assigner, keyed by project.
    fn grants_by(
        &self,
        assigner: UserId,
    ) -> Result<BTreeMap<ProjectId, BTreeSet<UserId>>, Self::Error>;
}

/// Interface for user targets and levels.
///
/// Records are created on first edit, overwritten on subsequent edits and
/// removed entirely on deletion. No tombstones.
pub trait AnnotationStore: Clone {
    type Error: Display + Debug;

    /// Set the per-user target text.
    fn set_user_target(&mut self, user: UserId, text: &str) -> Result<(), Self::Error>;

    /// Remove the per-user target.
    ///
    /// Returns `true` when a target existed and was removed.
    fn clear_user_target(&mut self, user: UserId) -> Result<bool, Self::Error>;

    /// Get the per-user target text.
    fn user_target(&self, user: UserId) -> Result<Option<String>, Self::Error>;

    /// Set the finer-grained per-project target for a user.
    fn set_project_target(
        &mut self,
        user: UserId,
        project: ProjectId,
        text: &str,
    ) -> Result<(), Self::Error>;

    /// Get the per-project target for a user.
    fn project_target(
        &self,
        user: UserId,
        project: ProjectId,
    ) -> Result<Option<String>, Self::Error>;

    /// Set a user's skill level.
    fn set_user_level(&mut self, user: UserId, level: Level) -> Result<(), Self::Error>;

    /// Get a user's skill level.
    fn user_level(&self, user: UserId) -> Result<Option<Level>, Self::Error>;
}

/// Interface for manual project status overrides.
pub trait StatusStore: Clone {
    type Error: Display + Debug;

    /// Set the manual status override for a project.
    fn set_manual_status(
        &mut self,
        project: ProjectId,
        status: ProjectStatus,
    ) -> Result<(), Self::Error>;

    /// Clear the manual status override.
    ///
    /// Returns `true` when an override existed and was removed.
    fn clear_manual_status(&mut self, project: ProjectId) -> Result<bool, Self::Error>;

    /// Get the manual status override for a project.
    fn manual_status(&self, project: ProjectId) -> Result<Option<ProjectStatus>, Self::Error>;
}

/// Interface for the user and project registry.
///
/// The external CRUD layer is the writer; the engine reads records by id
/// to resolve actors and to decide existence (`NotFound` errors).
pub trait DirectoryStore: Clone {
    type Error: Display + Debug;

    /// Insert or replace a user record.
    fn upsert_user(&mut self, user: User) -> Result<(), Self::Error>;

    /// Insert or replace a project record.
    fn upsert_project(&mut self, project: Project) -> Result<(), Self::Error>;

    /// Get a user record by id.
    fn user(&self, id: UserId) -> Result<Option<User>, Self::Error>;

    /// Get a project record by id.
    fn project(&self, id: ProjectId) -> Result<Option<Project>, Self::Error>;

    /// All user records, ordered by id.
    fn users(&self) -> Result<Vec<User>, Self::Error>;

    /// All project records, ordered by id.
    fn projects(&self) -> Result<Vec<Project>, Self::Error>;
}
