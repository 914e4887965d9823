// SPDX-License-Identifier: MIT OR Apache-2.0

//! Role-based visibility and project-assignment engine.
//!
//! The engine answers, for an already-authenticated actor, which users and
//! projects they may see, mutate or assign, and keeps a durable, mergeable
//! record of who assigned what to whom. It is organised into five parts:
//!
//! - [`resolver`] — maps raw role claims plus email to a canonical
//!   [`Role`](palisade_core::Role), honouring explicit override rules.
//! - [`visibility`] — the pure per-role filtering rules for projects and
//!   users.
//! - [`manager`] — the only writer of the assignment store; orchestrates
//!   assign/unassign mutations and best-effort external membership sync.
//! - [`workflow`] — plans role changes: composite expansion, diffing and
//!   the server-side permission gate on selectable roles.
//! - [`targets`] — per-user targets and levels plus manual project status
//!   overrides.
//!
//! All operations fail closed: forbidden and not-found conditions abort a
//! mutation before anything is written, and unresolved role claims resolve
//! to the least-privileged role rather than an error.
mod error;
pub mod manager;
pub mod membership;
pub mod resolver;
pub mod targets;
#[cfg(any(test, feature = "test_utils"))]
pub mod test_utils;
pub mod visibility;
pub mod workflow;

pub use error::AccessError;
pub use manager::{AssignmentDelta, AssignmentManager};
pub use membership::{DisabledMembership, MembershipSync, SyncError};
pub use resolver::{OverrideRule, OverrideTable, effective_role, resolve};
pub use targets::TargetEngine;
pub use visibility::{visible_projects, visible_users};
pub use workflow::{RolePlan, plan_role_change, selectable_roles};
