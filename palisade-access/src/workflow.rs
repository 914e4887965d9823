// SPDX-License-Identifier: MIT OR Apache-2.0

//! Planning of role changes.
//!
//! A role change request carries the full desired selection for a target
//! user. The planner expands composite identifiers, gates the selection
//! against what the acting role may assign at all, and emits an ordered
//! assign-list and unassign-list. Applying grants that accompany a role
//! change is the assignment manager's job; the planner never writes.
use std::collections::BTreeSet;

use palisade_core::{Role, RoleId};
use tracing::debug;

use crate::error::AccessError;

/// An ordered plan for a role change: assignments are applied before
/// removals so the target user never holds zero roles mid-transaction.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct RolePlan {
    pub to_assign: Vec<RoleId>,
    pub to_unassign: Vec<RoleId>,
}

impl RolePlan {
    /// Plan contains no changes.
    pub fn is_empty(&self) -> bool {
        self.to_assign.is_empty() && self.to_unassign.is_empty()
    }
}

/// The role identifiers an acting role may present for selection.
///
/// This is a server-side gate, not a UI nicety: submitted ids outside the
/// returned set are rejected, never silently dropped.
pub fn selectable_roles(actor_role: Role) -> &'static [RoleId] {
    match actor_role {
        Role::SuperAdmin => &[
            RoleId::General,
            RoleId::Labeler,
            RoleId::LabelingInterface,
            RoleId::Annotation,
            RoleId::Qcr,
            RoleId::Model,
            RoleId::Predictions,
            RoleId::CloudStorage,
            RoleId::Webhooks,
            RoleId::DangerZone,
            RoleId::User,
            RoleId::Client,
            RoleId::Admin,
            RoleId::SuperAdmin,
        ],
        Role::Admin => &[
            RoleId::General,
            RoleId::Labeler,
            RoleId::LabelingInterface,
            RoleId::Annotation,
            RoleId::Qcr,
            RoleId::Model,
            RoleId::Predictions,
            RoleId::CloudStorage,
            RoleId::Webhooks,
            RoleId::DangerZone,
            RoleId::User,
            RoleId::Client,
        ],
        Role::Client => &[
            RoleId::User,
            RoleId::Labeler,
            RoleId::LabelingInterface,
            RoleId::Annotation,
            RoleId::Qcr,
        ],
        // Plain users may only self-service the labeling and QC toggles.
        Role::User => &[
            RoleId::Labeler,
            RoleId::LabelingInterface,
            RoleId::Annotation,
            RoleId::Qcr,
        ],
    }
}

/// Replace composite identifiers by their constituent primitives.
fn expand(roles: &BTreeSet<RoleId>) -> BTreeSet<RoleId> {
    let mut expanded = BTreeSet::new();
    for role in roles {
        match role.constituents() {
            Some(constituents) => expanded.extend(constituents.iter().copied()),
            None => {
                expanded.insert(*role);
            }
        }
    }

    expanded
}

/// Compute the diff between a user's current roles and the desired
/// selection submitted by the actor.
///
/// Every id in the desired selection must be selectable by the acting
/// role, otherwise the whole request fails with
/// [`AccessError::ForbiddenRole`]. The same gate applies to removals: a
/// plan may not unassign an id the actor could not select, so an actor
/// can never demote a role above their own reach. Composites expand
/// before diffing: toggling one off removes all of its constituents even
/// if only some were present. If the plan would otherwise leave the user
/// with zero roles, the fallback `user` primitive is retained.
pub fn plan_role_change(
    actor_role: Role,
    target_email: &str,
    current: &BTreeSet<RoleId>,
    desired: &BTreeSet<RoleId>,
) -> Result<RolePlan, AccessError> {
    let allowed = selectable_roles(actor_role);
    for role in desired {
        if !allowed.contains(role) {
            return Err(AccessError::ForbiddenRole(*role));
        }
    }

    let current = expand(current);
    let desired = expand(desired);

    let mut to_assign: BTreeSet<RoleId> = desired.difference(&current).copied().collect();
    let mut to_unassign: BTreeSet<RoleId> = current.difference(&desired).copied().collect();

    // Never leave the user without any role: keep the fallback primitive.
    let remaining = current
        .union(&to_assign)
        .filter(|role| !to_unassign.contains(role))
        .count();
    if remaining == 0 && !to_unassign.remove(&RoleId::User) {
        to_assign.insert(RoleId::User);
    }

    // Removals are gated like additions: the diff must not demote an id
    // the actor could not have selected in the first place.
    for role in &to_unassign {
        if !allowed.contains(role) {
            return Err(AccessError::ForbiddenRole(*role));
        }
    }

    let plan = RolePlan {
        to_assign: to_assign.into_iter().collect(),
        to_unassign: to_unassign.into_iter().collect(),
    };

    debug!(
        target_email,
        assign = plan.to_assign.len(),
        unassign = plan.to_unassign.len(),
        "planned role change"
    );

    Ok(plan)
}
