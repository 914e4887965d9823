// SPDX-License-Identifier: MIT OR Apache-2.0

//! Fixtures shared by engine tests.
use std::collections::BTreeSet;

use palisade_core::{Project, ProjectId, RoleId, User, UserId};
use palisade_store::{DirectoryStore, MemoryStore};

/// Install a global tracing subscriber honouring `RUST_LOG`.
///
/// Repeated calls are fine; only the first installation wins.
pub fn setup_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

/// A user record with the given role identifiers and no creation scope.
pub fn test_user(id: UserId, roles: &[RoleId]) -> User {
    User {
        id,
        email: format!("user-{}@example.org", id.0),
        display_name: format!("User {}", id.0),
        roles: BTreeSet::from_iter(roles.iter().copied()),
        created_by: None,
        last_activity: 1_700_000_000,
        date_joined: 1_690_000_000,
    }
}

/// A fresh project with zeroed progress counters.
pub fn test_project(id: ProjectId, created_by: UserId) -> Project {
    Project {
        id,
        title: format!("Project {}", id.0),
        created_by,
        created_at: 1_695_000_000,
        task_count: 0,
        finished_task_count: 0,
        annotation_count: 0,
    }
}

/// A memory store pre-populated with the given users and projects.
pub fn test_directory(users: Vec<User>, projects: Vec<Project>) -> MemoryStore {
    let mut store = MemoryStore::new();
    for user in users {
        store.upsert_user(user).expect("insert user fixture");
    }
    for project in projects {
        store.upsert_project(project).expect("insert project fixture");
    }
    store
}
