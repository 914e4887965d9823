// SPDX-License-Identifier: MIT OR Apache-2.0

//! The per-role visibility rules for projects and users.
//!
//! Both functions are pure: they are computed fresh from the directory and
//! the assignment indices on every read, so there is no denormalized state
//! to invalidate after a mutation. Rules are evaluated first-match-wins,
//! with no stacking between roles.
use std::collections::BTreeSet;

use palisade_core::{Project, ProjectId, Role, User, UserId};

use crate::error::AccessError;

/// The set of projects an actor is permitted to read.
///
/// - `SuperAdmin` sees all projects unfiltered.
/// - `Admin` and `Client` share the same formula: projects they created
///   _or_ projects assigned to them (union — own creations are always
///   visible regardless of assignment state). What the two roles may
///   subsequently *do* with a visible project differs in the manager.
/// - `User` has no project list access at all; the attempt is an
///   authorization denial, not an empty result.
///
/// `assigned` is the actor's entry in the assignee index.
pub fn visible_projects<'a>(
    actor: UserId,
    role: Role,
    all_projects: &'a [Project],
    assigned: &BTreeSet<ProjectId>,
) -> Result<Vec<&'a Project>, AccessError> {
    match role {
        Role::SuperAdmin => Ok(all_projects.iter().collect()),
        Role::Admin | Role::Client => Ok(all_projects
            .iter()
            .filter(|project| project.created_by == actor || assigned.contains(&project.id))
            .collect()),
        Role::User => Err(AccessError::ForbiddenUser(actor)),
    }
}

/// The set of users an actor is permitted to read.
///
/// - `SuperAdmin` and `Admin` see the whole user directory.
/// - `Client` sees themselves plus the users they personally created.
/// - `User` is denied, matching the project rule.
pub fn visible_users<'a>(
    actor: UserId,
    role: Role,
    all_users: &'a [User],
) -> Result<Vec<&'a User>, AccessError> {
    match role {
        Role::SuperAdmin | Role::Admin => Ok(all_users.iter().collect()),
        Role::Client => Ok(all_users
            .iter()
            .filter(|user| user.id == actor || user.created_by(actor))
            .collect()),
        Role::User => Err(AccessError::ForbiddenUser(actor)),
    }
}

/// Convenience check: is one project visible to the actor?
pub fn project_visible(
    actor: UserId,
    role: Role,
    project: &Project,
    assigned: &BTreeSet<ProjectId>,
) -> bool {
    match role {
        Role::SuperAdmin => true,
        Role::Admin | Role::Client => {
            project.created_by == actor || assigned.contains(&project.id)
        }
        Role::User => false,
    }
}
