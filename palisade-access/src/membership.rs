// SPDX-License-Identifier: MIT OR Apache-2.0

//! Seam to the external project-membership system.
//!
//! The CRUD collaborator keeps its own membership records per project.
//! Synchronising them is best-effort from the engine's perspective: the
//! assignment store, not the membership system, is the authoritative
//! visibility record. Calls are wrapped in a bounded timeout by the
//! manager; failures are logged and swallowed, never surfaced to the
//! caller, and reconciled out-of-band.
use palisade_core::{ProjectId, UserId};
use thiserror::Error;

/// Failure of a best-effort membership sync call.
#[derive(Debug, Error, PartialEq)]
pub enum SyncError {
    /// A membership record for this pair already exists.
    #[error("membership for {0} on {1} already exists")]
    AlreadyExists(UserId, ProjectId),

    /// No membership record exists for this pair.
    #[error("no membership for {0} on {1}")]
    NotFound(UserId, ProjectId),

    /// The membership system could not be reached or answered with an
    /// unexpected failure.
    #[error("membership system unavailable: {0}")]
    Unavailable(String),
}

/// Interface to the external membership system.
///
/// Implementations should be idempotency-tolerant where they can, but the
/// engine does not rely on it: any error is treated as advisory.
pub trait MembershipSync {
    /// Create a membership record for an assignee on a project.
    fn create_membership(
        &self,
        assignee: UserId,
        project: ProjectId,
    ) -> impl Future<Output = Result<(), SyncError>>;

    /// Delete the membership record for an assignee on a project.
    fn delete_membership(
        &self,
        assignee: UserId,
        project: ProjectId,
    ) -> impl Future<Output = Result<(), SyncError>>;
}

/// A membership sync that does nothing.
///
/// Used by deployments which run the engine as the only membership record,
/// and as a neutral default in tests.
#[derive(Clone, Copy, Debug, Default)]
pub struct DisabledMembership;

impl MembershipSync for DisabledMembership {
    async fn create_membership(&self, _: UserId, _: ProjectId) -> Result<(), SyncError> {
        Ok(())
    }

    async fn delete_membership(&self, _: UserId, _: ProjectId) -> Result<(), SyncError> {
        Ok(())
    }
}
