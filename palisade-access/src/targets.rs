// SPDX-License-Identifier: MIT OR Apache-2.0

//! Targets, levels and manual project status.
//!
//! These are management annotations layered next to the access model:
//! free-text targets and skill levels on users, and manual lifecycle
//! status overrides on projects. Only admin-or-above actors manage them,
//! with one exception: the bulk per-project target write is available to
//! clients, scoped to the grants they themselves made.
use palisade_core::{Level, ProjectId, ProjectStatus, Role, UserId, displayed_status};
use palisade_store::{AnnotationStore, DirectoryStore, GrantStore, StatusStore};
use tracing::debug;

use crate::error::AccessError;
use crate::resolver::{OverrideTable, effective_role};

/// Manages target, level and manual status records.
#[derive(Clone, Debug)]
pub struct TargetEngine<S> {
    store: S,
    overrides: OverrideTable,
}

impl<S> TargetEngine<S>
where
    S: DirectoryStore + AnnotationStore + StatusStore + GrantStore,
{
    pub fn new(store: S) -> Self {
        Self {
            store,
            overrides: OverrideTable::empty(),
        }
    }

    /// Consult the given override table when resolving actor roles.
    pub fn with_overrides(mut self, overrides: OverrideTable) -> Self {
        self.overrides = overrides;
        self
    }

    /// Check the actor exists and holds at least the given role.
    fn require_role(&self, actor_id: UserId, at_least: Role) -> Result<(), AccessError> {
        let actor = self
            .store
            .user(actor_id)
            .map_err(store_err)?
            .ok_or(AccessError::UserNotFound(actor_id))?;
        if effective_role(&actor, &self.overrides) < at_least {
            return Err(AccessError::ForbiddenUser(actor_id));
        }

        Ok(())
    }

    fn require_user(&self, id: UserId) -> Result<(), AccessError> {
        self.store
            .user(id)
            .map_err(store_err)?
            .ok_or(AccessError::UserNotFound(id))?;
        Ok(())
    }

    fn require_project(&self, id: ProjectId) -> Result<(), AccessError> {
        self.store
            .project(id)
            .map_err(store_err)?
            .ok_or(AccessError::ProjectNotFound(id))?;
        Ok(())
    }

    /// Set the free-text target for a user. Admin-or-above only; users do
    /// not manage their own targets.
    pub fn set_user_target(
        &mut self,
        actor_id: UserId,
        user_id: UserId,
        text: &str,
    ) -> Result<(), AccessError> {
        self.require_role(actor_id, Role::Admin)?;
        self.require_user(user_id)?;

        self.store.set_user_target(user_id, text).map_err(store_err)
    }

    /// Remove the target for a user. Returns `true` when one existed.
    pub fn clear_user_target(
        &mut self,
        actor_id: UserId,
        user_id: UserId,
    ) -> Result<bool, AccessError> {
        self.require_role(actor_id, Role::Admin)?;
        self.require_user(user_id)?;

        self.store.clear_user_target(user_id).map_err(store_err)
    }

    /// Set the skill level for a user. Admin-or-above only.
    pub fn set_user_level(
        &mut self,
        actor_id: UserId,
        user_id: UserId,
        level: Level,
    ) -> Result<(), AccessError> {
        self.require_role(actor_id, Role::Admin)?;
        self.require_user(user_id)?;

        self.store.set_user_level(user_id, level).map_err(store_err)
    }

    /// Manually override a project's displayed status. The override wins
    /// over the derived status until explicitly cleared.
    pub fn set_manual_project_status(
        &mut self,
        actor_id: UserId,
        project_id: ProjectId,
        status: ProjectStatus,
    ) -> Result<(), AccessError> {
        self.require_role(actor_id, Role::Admin)?;
        self.require_project(project_id)?;

        self.store
            .set_manual_status(project_id, status)
            .map_err(store_err)
    }

    /// Clear a project's manual status override, falling back to the
    /// derived status. Returns `true` when an override existed.
    pub fn clear_manual_project_status(
        &mut self,
        actor_id: UserId,
        project_id: ProjectId,
    ) -> Result<bool, AccessError> {
        self.require_role(actor_id, Role::Admin)?;
        self.require_project(project_id)?;

        self.store.clear_manual_status(project_id).map_err(store_err)
    }

    /// The status currently displayed for a project.
    pub fn displayed_status(&self, project_id: ProjectId) -> Result<ProjectStatus, AccessError> {
        let project = self
            .store
            .project(project_id)
            .map_err(store_err)?
            .ok_or(AccessError::ProjectNotFound(project_id))?;
        let manual = self.store.manual_status(project_id).map_err(store_err)?;

        Ok(displayed_status(&project, manual))
    }

    /// Set the same target text for every `(assignee, project)` pair the
    /// actor has granted, across the listed projects.
    ///
    /// Writes both the per-project target and, where absent, the per-user
    /// fallback target, so a user-level view and a project-level view both
    /// resolve without a join at read time. Available to clients, scoped
    /// to their own grants. Returns the number of pairs written.
    pub fn set_target_for_projects(
        &mut self,
        actor_id: UserId,
        project_ids: &[ProjectId],
        text: &str,
    ) -> Result<usize, AccessError> {
        self.require_role(actor_id, Role::Client)?;
        for project_id in project_ids {
            self.require_project(*project_id)?;
        }

        let grants = self.store.grants_by(actor_id).map_err(store_err)?;

        let mut written = 0;
        for project_id in project_ids {
            let Some(assignees) = grants.get(project_id) else {
                continue;
            };
            for assignee in assignees {
                self.store
                    .set_project_target(*assignee, *project_id, text)
                    .map_err(store_err)?;
                if self.store.user_target(*assignee).map_err(store_err)?.is_none() {
                    self.store.set_user_target(*assignee, text).map_err(store_err)?;
                }
                written += 1;
            }
        }

        debug!(%actor_id, written, "bulk target write");

        Ok(written)
    }
}

fn store_err<E: std::fmt::Display>(err: E) -> AccessError {
    AccessError::Store(err.to_string())
}

#[cfg(test)]
mod tests {
    use palisade_core::{Level, ProjectId, ProjectStatus, RoleId, UserId};
    use palisade_store::{AnnotationStore, GrantStore};

    use crate::error::AccessError;
    use crate::test_utils::{test_directory, test_project, test_user};

    use super::TargetEngine;

    const ADMIN: UserId = UserId(1);
    const CLIENT: UserId = UserId(2);
    const LABELER_A: UserId = UserId(3);
    const LABELER_B: UserId = UserId(4);

    fn engine() -> TargetEngine<palisade_store::MemoryStore> {
        let store = test_directory(
            vec![
                test_user(ADMIN, &[RoleId::Admin]),
                test_user(CLIENT, &[RoleId::Client]),
                test_user(LABELER_A, &[RoleId::User]),
                test_user(LABELER_B, &[RoleId::User]),
            ],
            vec![
                test_project(ProjectId(10), CLIENT),
                test_project(ProjectId(20), CLIENT),
            ],
        );

        TargetEngine::new(store)
    }

    #[test]
    fn only_admins_manage_targets_and_levels() {
        let mut engine = engine();

        engine
            .set_user_target(ADMIN, LABELER_A, "200 boxes per day")
            .unwrap();
        engine.set_user_level(ADMIN, LABELER_A, Level::Two).unwrap();

        // Clients do not manage direct per-user records.
        let result = engine.set_user_target(CLIENT, LABELER_A, "anything");
        assert_eq!(result.unwrap_err(), AccessError::ForbiddenUser(CLIENT));

        // Users never manage their own target or level.
        let result = engine.set_user_target(LABELER_A, LABELER_A, "mine");
        assert_eq!(result.unwrap_err(), AccessError::ForbiddenUser(LABELER_A));
        let result = engine.set_user_level(LABELER_A, LABELER_A, Level::Three);
        assert_eq!(result.unwrap_err(), AccessError::ForbiddenUser(LABELER_A));

        assert!(engine.clear_user_target(ADMIN, LABELER_A).unwrap());
        assert!(!engine.clear_user_target(ADMIN, LABELER_A).unwrap());
    }

    #[test]
    fn manual_status_override_persists_until_cleared() {
        let mut engine = engine();

        engine
            .set_manual_project_status(ADMIN, ProjectId(10), ProjectStatus::Completed)
            .unwrap();
        assert_eq!(
            engine.displayed_status(ProjectId(10)).unwrap(),
            ProjectStatus::Completed
        );

        // Counters changing underneath does not touch the override; only
        // an explicit clear does.
        assert!(engine.clear_manual_project_status(ADMIN, ProjectId(10)).unwrap());
        assert_eq!(
            engine.displayed_status(ProjectId(10)).unwrap(),
            ProjectStatus::Active
        );

        let result =
            engine.set_manual_project_status(CLIENT, ProjectId(10), ProjectStatus::Active);
        assert_eq!(result.unwrap_err(), AccessError::ForbiddenUser(CLIENT));
    }

    #[test]
    fn status_ops_check_project_existence() {
        let mut engine = engine();

        let result =
            engine.set_manual_project_status(ADMIN, ProjectId(99), ProjectStatus::Active);
        assert_eq!(
            result.unwrap_err(),
            AccessError::ProjectNotFound(ProjectId(99))
        );
    }

    #[test]
    fn bulk_target_fans_out_over_own_grants() {
        let mut engine = engine();
        let mut store = engine.store.clone();

        store.insert_grant(CLIENT, LABELER_A, ProjectId(10)).unwrap();
        store.insert_grant(CLIENT, LABELER_B, ProjectId(10)).unwrap();
        store.insert_grant(CLIENT, LABELER_A, ProjectId(20)).unwrap();
        // A grant made by someone else is outside the client's fan-out.
        store.insert_grant(ADMIN, LABELER_B, ProjectId(20)).unwrap();

        // Labeler A already has a personal target; it must not be
        // overwritten by the fallback write.
        store.set_user_target(LABELER_A, "existing goal").unwrap();

        let written = engine
            .set_target_for_projects(CLIENT, &[ProjectId(10), ProjectId(20)], "finish batch 4")
            .unwrap();
        assert_eq!(written, 3);

        assert_eq!(
            store.project_target(LABELER_A, ProjectId(10)).unwrap().as_deref(),
            Some("finish batch 4")
        );
        assert_eq!(
            store.project_target(LABELER_B, ProjectId(10)).unwrap().as_deref(),
            Some("finish batch 4")
        );
        assert_eq!(
            store.project_target(LABELER_A, ProjectId(20)).unwrap().as_deref(),
            Some("finish batch 4")
        );
        // The admin's grant was not touched.
        assert_eq!(store.project_target(LABELER_B, ProjectId(20)).unwrap(), None);

        // Fallback per-user target only where absent.
        assert_eq!(
            store.user_target(LABELER_A).unwrap().as_deref(),
            Some("existing goal")
        );
        assert_eq!(
            store.user_target(LABELER_B).unwrap().as_deref(),
            Some("finish batch 4")
        );
    }

    #[test]
    fn bulk_target_requires_client_or_above() {
        let mut engine = engine();

        let result = engine.set_target_for_projects(LABELER_A, &[ProjectId(10)], "goal");
        assert_eq!(result.unwrap_err(), AccessError::ForbiddenUser(LABELER_A));
    }
}
