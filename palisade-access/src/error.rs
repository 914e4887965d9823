// SPDX-License-Identifier: MIT OR Apache-2.0

use palisade_core::{ProjectId, RoleId, UserId};
use thiserror::Error;

/// Errors surfaced by engine operations.
///
/// Forbidden and not-found conditions always abort the mutation entirely;
/// no partial writes occur. Failures of the best-effort external membership
/// sync are _not_ part of this taxonomy: they are logged and swallowed
/// after the authoritative store write (see [`crate::membership`]).
#[derive(Debug, Error, PartialEq)]
pub enum AccessError {
    /// Actor tried to grant or revoke access to a project outside their
    /// own visibility.
    #[error("{0} is not visible to the acting user")]
    ForbiddenProject(ProjectId),

    /// Actor submitted a role id outside their permitted selection set.
    #[error("role '{0}' may not be assigned by the acting user")]
    ForbiddenRole(RoleId),

    /// Actor may not act on or view this user. Also covers the page-level
    /// block applied to plain users, who have no directory access at all.
    #[error("{0} is not within the acting user's scope")]
    ForbiddenUser(UserId),

    /// Referenced user id does not exist.
    #[error("{0} does not exist")]
    UserNotFound(UserId),

    /// Referenced project id does not exist.
    #[error("{0} does not exist")]
    ProjectNotFound(ProjectId),

    /// The backing store failed. Never produced by the in-memory store.
    #[error("store error: {0}")]
    Store(String),
}
