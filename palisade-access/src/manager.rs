// SPDX-License-Identifier: MIT OR Apache-2.0

//! The assignment manager: sole writer of the assignment store.
//!
//! Every mutation resolves the actor fresh from the directory, checks the
//! visibility preconditions, writes the authoritative grant indices as one
//! atomic unit and only then notifies the external membership system on a
//! best-effort basis. A failed precondition aborts before anything is
//! written.
use std::fmt::Display;
use std::time::Duration;

use palisade_core::{Project, ProjectId, Role, User, UserId};
use palisade_store::{DirectoryStore, GrantStore};
use tokio::time::timeout;
use tracing::{debug, warn};

use crate::error::AccessError;
use crate::membership::{DisabledMembership, MembershipSync};
use crate::resolver::{OverrideTable, effective_role};
use crate::visibility;

/// How long a membership sync call may take before it is abandoned.
const DEFAULT_SYNC_TIMEOUT: Duration = Duration::from_secs(3);

/// Outcome of an [`AssignmentManager::assign`] call.
///
/// Re-assigning an already-granted project is a no-op, never an error; the
/// delta reports which project ids actually changed the assignee's access.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct AssignmentDelta {
    /// Projects the assignee gained access to.
    pub granted: Vec<ProjectId>,

    /// Projects the assignee could already access before the call.
    pub already_granted: Vec<ProjectId>,
}

/// Orchestrates assignment mutations against the grant store.
#[derive(Clone, Debug)]
pub struct AssignmentManager<S, M = DisabledMembership> {
    store: S,
    membership: M,
    overrides: OverrideTable,
    sync_timeout: Duration,
}

impl<S, M> AssignmentManager<S, M>
where
    S: GrantStore + DirectoryStore,
    M: MembershipSync,
{
    /// Create a manager over the given store and membership seam.
    pub fn new(store: S, membership: M) -> Self {
        Self {
            store,
            membership,
            overrides: OverrideTable::empty(),
            sync_timeout: DEFAULT_SYNC_TIMEOUT,
        }
    }

    /// Consult the given override table when resolving actor roles.
    pub fn with_overrides(mut self, overrides: OverrideTable) -> Self {
        self.overrides = overrides;
        self
    }

    /// Bound membership sync calls by the given timeout.
    pub fn with_sync_timeout(mut self, sync_timeout: Duration) -> Self {
        self.sync_timeout = sync_timeout;
        self
    }

    /// Resolve an actor id to its user record and effective role.
    fn actor(&self, id: UserId) -> Result<(User, Role), AccessError> {
        let user = self
            .store
            .user(id)
            .map_err(store_err)?
            .ok_or(AccessError::UserNotFound(id))?;
        let role = effective_role(&user, &self.overrides);

        Ok((user, role))
    }

    /// The projects visible to the actor, computed fresh from the
    /// directory and the assignment indices.
    pub fn visible_projects(&self, actor_id: UserId) -> Result<Vec<Project>, AccessError> {
        let (actor, role) = self.actor(actor_id)?;
        let all_projects = self.store.projects().map_err(store_err)?;
        let assigned = self.store.projects_for(actor.id).map_err(store_err)?;

        let visible = visibility::visible_projects(actor.id, role, &all_projects, &assigned)?;
        Ok(visible.into_iter().cloned().collect())
    }

    /// The users visible to the actor.
    pub fn visible_users(&self, actor_id: UserId) -> Result<Vec<User>, AccessError> {
        let (actor, role) = self.actor(actor_id)?;
        let all_users = self.store.users().map_err(store_err)?;

        let visible = visibility::visible_users(actor.id, role, &all_users)?;
        Ok(visible.into_iter().cloned().collect())
    }

    /// Grant an assignee access to a set of projects.
    ///
    /// Preconditions, checked before anything is written: the actor and
    /// assignee must exist, every project must exist and be visible to the
    /// actor, and a client actor may only assign to users within their own
    /// scope. Effects merge into the existing grants: a later call never
    /// removes an earlier, different actor's grant to the same project.
    pub async fn assign(
        &mut self,
        actor_id: UserId,
        assignee_id: UserId,
        project_ids: &[ProjectId],
    ) -> Result<AssignmentDelta, AccessError> {
        let (actor, role) = self.actor(actor_id)?;
        if role.is_user() {
            return Err(AccessError::ForbiddenUser(actor_id));
        }

        self.store
            .user(assignee_id)
            .map_err(store_err)?
            .ok_or(AccessError::UserNotFound(assignee_id))?;

        // A client may only assign to users they own or are; an admin may
        // assign to anyone.
        if role.is_client() {
            let all_users = self.store.users().map_err(store_err)?;
            let scope = visibility::visible_users(actor.id, role, &all_users)?;
            if !scope.iter().any(|user| user.id == assignee_id) {
                return Err(AccessError::ForbiddenUser(assignee_id));
            }
        }

        // An actor can only grant access to projects they can see.
        let assigned = self.store.projects_for(actor.id).map_err(store_err)?;
        for project_id in project_ids {
            let project = self
                .store
                .project(*project_id)
                .map_err(store_err)?
                .ok_or(AccessError::ProjectNotFound(*project_id))?;
            if !visibility::project_visible(actor.id, role, &project, &assigned) {
                return Err(AccessError::ForbiddenProject(*project_id));
            }
        }

        let mut delta = AssignmentDelta::default();
        for project_id in project_ids {
            let newly_accessible = self
                .store
                .insert_grant(actor_id, assignee_id, *project_id)
                .map_err(store_err)?;
            if newly_accessible {
                delta.granted.push(*project_id);
            } else {
                delta.already_granted.push(*project_id);
            }
        }

        debug!(
            %actor_id,
            %assignee_id,
            granted = delta.granted.len(),
            merged = delta.already_granted.len(),
            "assigned projects"
        );

        for project_id in &delta.granted {
            self.sync_create(assignee_id, *project_id).await;
        }

        Ok(delta)
    }

    /// Withdraw an assignee's access to one project.
    ///
    /// Revocation is assigner-agnostic: the audit entry of every granting
    /// assigner is cleared, since the access itself is being withdrawn. A
    /// client actor may only revoke projects within their own visibility
    /// and only for users within their scope; admin-or-above actors may
    /// revoke any grant.
    pub async fn unassign(
        &mut self,
        actor_id: UserId,
        assignee_id: UserId,
        project_id: ProjectId,
    ) -> Result<(), AccessError> {
        let (actor, role) = self.actor(actor_id)?;
        if role.is_user() {
            return Err(AccessError::ForbiddenUser(actor_id));
        }

        self.store
            .user(assignee_id)
            .map_err(store_err)?
            .ok_or(AccessError::UserNotFound(assignee_id))?;

        let project = self
            .store
            .project(project_id)
            .map_err(store_err)?
            .ok_or(AccessError::ProjectNotFound(project_id))?;

        if role.is_client() {
            let all_users = self.store.users().map_err(store_err)?;
            let scope = visibility::visible_users(actor.id, role, &all_users)?;
            if !scope.iter().any(|user| user.id == assignee_id) {
                return Err(AccessError::ForbiddenUser(assignee_id));
            }

            let assigned = self.store.projects_for(actor.id).map_err(store_err)?;
            if !visibility::project_visible(actor.id, role, &project, &assigned) {
                return Err(AccessError::ForbiddenProject(project_id));
            }
        }

        let removed = self
            .store
            .revoke_access(assignee_id, project_id)
            .map_err(store_err)?;

        if removed {
            debug!(%actor_id, %assignee_id, %project_id, "unassigned project");
            self.sync_delete(assignee_id, project_id).await;
        }

        Ok(())
    }

    /// Withdraw every project grant for an assignee.
    ///
    /// Requires an admin-or-above actor. Returns the number of projects
    /// the assignee lost access to.
    pub async fn unassign_all(
        &mut self,
        actor_id: UserId,
        assignee_id: UserId,
    ) -> Result<usize, AccessError> {
        let (_, role) = self.actor(actor_id)?;
        if !role.is_admin_or_above() {
            return Err(AccessError::ForbiddenUser(assignee_id));
        }

        self.store
            .user(assignee_id)
            .map_err(store_err)?
            .ok_or(AccessError::UserNotFound(assignee_id))?;

        let projects = self.store.projects_for(assignee_id).map_err(store_err)?;
        let removed = self
            .store
            .revoke_all_access(assignee_id)
            .map_err(store_err)?;

        debug!(%actor_id, %assignee_id, removed, "revoked all access");

        for project_id in projects {
            self.sync_delete(assignee_id, project_id).await;
        }

        Ok(removed)
    }

    async fn sync_create(&self, assignee: UserId, project: ProjectId) {
        match timeout(
            self.sync_timeout,
            self.membership.create_membership(assignee, project),
        )
        .await
        {
            Ok(Ok(())) => (),
            Ok(Err(err)) => {
                warn!(%assignee, %project, %err, "membership create failed, store remains authoritative");
            }
            Err(_) => {
                warn!(%assignee, %project, "membership create timed out");
            }
        }
    }

    async fn sync_delete(&self, assignee: UserId, project: ProjectId) {
        match timeout(
            self.sync_timeout,
            self.membership.delete_membership(assignee, project),
        )
        .await
        {
            Ok(Ok(())) => (),
            Ok(Err(err)) => {
                warn!(%assignee, %project, %err, "membership delete failed, store remains authoritative");
            }
            Err(_) => {
                warn!(%assignee, %project, "membership delete timed out");
            }
        }
    }
}

fn store_err<E: Display>(err: E) -> AccessError {
    AccessError::Store(err.to_string())
}
