// SPDX-License-Identifier: MIT OR Apache-2.0

//! In-memory persistence for palisade access state.
use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::convert::Infallible;
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

use palisade_core::{Level, Project, ProjectId, ProjectStatus, User, UserId};

use crate::traits::{AnnotationStore, DirectoryStore, GrantStore, StatusStore};

/// An in-memory store for palisade access state: grants, targets, levels,
/// manual statuses and the user/project directory.
#[derive(Clone, Debug, Default)]
pub struct InnerMemoryStore {
    assignee_index: HashMap<UserId, BTreeSet<ProjectId>>,
    assigner_index: HashMap<UserId, BTreeMap<ProjectId, BTreeSet<UserId>>>,
    user_targets: HashMap<UserId, String>,
    project_targets: HashMap<(UserId, ProjectId), String>,
    user_levels: HashMap<UserId, Level>,
    manual_status: HashMap<ProjectId, ProjectStatus>,
    users: BTreeMap<UserId, User>,
    projects: BTreeMap<ProjectId, Project>,
}

/// An in-memory store implementing every palisade storage trait.
///
/// `MemoryStore` supports usage in multi-threaded contexts by wrapping an
/// `InnerMemoryStore` with an `RwLock` and `Arc`. Every mutation takes the
/// write lock once and updates all affected indices under it, so the two
/// grant indices can never be observed in a mutually inconsistent state.
/// Reads take the read lock only and never block other readers.
#[derive(Clone, Debug)]
pub struct MemoryStore {
    inner: Arc<RwLock<InnerMemoryStore>>,
}

impl MemoryStore {
    /// Create a new in-memory store.
    pub fn new() -> Self {
        Self {
            inner: Arc::new(RwLock::new(InnerMemoryStore::default())),
        }
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryStore {
    /// Obtain a read-lock on the store.
    pub fn read_store(&self) -> RwLockReadGuard<'_, InnerMemoryStore> {
        self.inner
            .read()
            .expect("acquire shared read access on store")
    }

    /// Obtain a write-lock on the store.
    pub fn write_store(&self) -> RwLockWriteGuard<'_, InnerMemoryStore> {
        self.inner
            .write()
            .expect("acquire exclusive write access on store")
    }
}

impl GrantStore for MemoryStore {
    type Error = Infallible;

    fn insert_grant(
        &mut self,
        assigner: UserId,
        assignee: UserId,
        project: ProjectId,
    ) -> Result<bool, Self::Error> {
        let mut store = self.write_store();

        let newly_accessible = store
            .assignee_index
            .entry(assignee)
            .or_default()
            .insert(project);
        store
            .assigner_index
            .entry(assigner)
            .or_default()
            .entry(project)
            .or_default()
            .insert(assignee);

        Ok(newly_accessible)
    }

    fn revoke_access(
        &mut self,
        assignee: UserId,
        project: ProjectId,
    ) -> Result<bool, Self::Error> {
        let mut store = self.write_store();

        let removed = match store.assignee_index.get_mut(&assignee) {
            Some(projects) => {
                let removed = projects.remove(&project);
                if projects.is_empty() {
                    store.assignee_index.remove(&assignee);
                }
                removed
            }
            None => false,
        };

        // Clear the audit entry of every granting assigner for this pair.
        store.assigner_index.retain(|_, grants| {
            if let Some(assignees) = grants.get_mut(&project) {
                assignees.remove(&assignee);
                if assignees.is_empty() {
                    grants.remove(&project);
                }
            }
            !grants.is_empty()
        });

        Ok(removed)
    }

    fn revoke_all_access(&mut self, assignee: UserId) -> Result<usize, Self::Error> {
        let mut store = self.write_store();

        let removed = store
            .assignee_index
            .remove(&assignee)
            .map(|projects| projects.len())
            .unwrap_or(0);

        store.assigner_index.retain(|_, grants| {
            grants.retain(|_, assignees| {
                assignees.remove(&assignee);
                !assignees.is_empty()
            });
            !grants.is_empty()
        });

        Ok(removed)
    }

    fn projects_for(&self, assignee: UserId) -> Result<BTreeSet<ProjectId>, Self::Error> {
        Ok(self
            .read_store()
            .assignee_index
            .get(&assignee)
            .cloned()
            .unwrap_or_default())
    }

    fn has_access(&self, assignee: UserId, project: ProjectId) -> Result<bool, Self::Error> {
        Ok(self
            .read_store()
            .assignee_index
            .get(&assignee)
            .is_some_and(|projects| projects.contains(&project)))
    }

    fn assignees_for(
        &self,
        assigner: UserId,
        project: ProjectId,
    ) -> Result<BTreeSet<UserId>, Self::Error> {
        Ok(self
            .read_store()
            .assigner_index
            .get(&assigner)
            .and_then(|grants| grants.get(&project))
            .cloned()
            .unwrap_or_default())
    }

    fn grants_by(
        &self,
        assigner: UserId,
    ) -> Result<BTreeMap<ProjectId, BTreeSet<UserId>>, Self::Error> {
        Ok(self
            .read_store()
            .assigner_index
            .get(&assigner)
            .cloned()
            .unwrap_or_default())
    }
}

impl AnnotationStore for MemoryStore {
    type Error = Infallible;

    fn set_user_target(&mut self, user: UserId, text: &str) -> Result<(), Self::Error> {
        self.write_store().user_targets.insert(user, text.to_string());
        Ok(())
    }

    fn clear_user_target(&mut self, user: UserId) -> Result<bool, Self::Error> {
        Ok(self.write_store().user_targets.remove(&user).is_some())
    }

    fn user_target(&self, user: UserId) -> Result<Option<String>, Self::Error> {
        Ok(self.read_store().user_targets.get(&user).cloned())
    }

    fn set_project_target(
        &mut self,
        user: UserId,
        project: ProjectId,
        text: &str,
    ) -> Result<(), Self::Error> {
        self.write_store()
            .project_targets
            .insert((user, project), text.to_string());
        Ok(())
    }

    fn project_target(
        &self,
        user: UserId,
        project: ProjectId,
    ) -> Result<Option<String>, Self::Error> {
        Ok(self
            .read_store()
            .project_targets
            .get(&(user, project))
            .cloned())
    }

    fn set_user_level(&mut self, user: UserId, level: Level) -> Result<(), Self::Error> {
        self.write_store().user_levels.insert(user, level);
        Ok(())
    }

    fn user_level(&self, user: UserId) -> Result<Option<Level>, Self::Error> {
        Ok(self.read_store().user_levels.get(&user).copied())
    }
}

impl StatusStore for MemoryStore {
    type Error = Infallible;

    fn set_manual_status(
        &mut self,
        project: ProjectId,
        status: ProjectStatus,
    ) -> Result<(), Self::Error> {
        self.write_store().manual_status.insert(project, status);
        Ok(())
    }

    fn clear_manual_status(&mut self, project: ProjectId) -> Result<bool, Self::Error> {
        Ok(self.write_store().manual_status.remove(&project).is_some())
    }

    fn manual_status(&self, project: ProjectId) -> Result<Option<ProjectStatus>, Self::Error> {
        Ok(self.read_store().manual_status.get(&project).copied())
    }
}

impl DirectoryStore for MemoryStore {
    type Error = Infallible;

    fn upsert_user(&mut self, user: User) -> Result<(), Self::Error> {
        self.write_store().users.insert(user.id, user);
        Ok(())
    }

    fn upsert_project(&mut self, project: Project) -> Result<(), Self::Error> {
        self.write_store().projects.insert(project.id, project);
        Ok(())
    }

    fn user(&self, id: UserId) -> Result<Option<User>, Self::Error> {
        Ok(self.read_store().users.get(&id).cloned())
    }

    fn project(&self, id: ProjectId) -> Result<Option<Project>, Self::Error> {
        Ok(self.read_store().projects.get(&id).cloned())
    }

    fn users(&self) -> Result<Vec<User>, Self::Error> {
        Ok(self.read_store().users.values().cloned().collect())
    }

    fn projects(&self) -> Result<Vec<Project>, Self::Error> {
        Ok(self.read_store().projects.values().cloned().collect())
    }
}
