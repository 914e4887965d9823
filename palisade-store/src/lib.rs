// SPDX-License-Identifier: MIT OR Apache-2.0

//! Interfaces and implementations of persistence layers for palisade access
//! state.
//!
//! Four storage concerns are covered, each behind its own trait so that a
//! durable backend can be slotted in per concern:
//!
//! - [`GrantStore`] — the assignment store. A bipartite relation
//!   `(assigner, assignee, project)` maintained as two co-updated indices:
//!   `assignee -> projects` (who may access what) and
//!   `assigner -> project -> assignees` (who granted what, the audit
//!   trail). Every mutation updates both indices as a single atomic unit;
//!   partial updates are a correctness bug, not a degraded state.
//! - [`AnnotationStore`] — free-text targets and skill levels attached to
//!   users. Independent annotations, not access-control facts.
//! - [`StatusStore`] — manual project status overrides.
//! - [`DirectoryStore`] — the user/project registry. Written by the
//!   external CRUD layer, read by the engine.
//!
//! An in-memory implementation is provided in the form of a
//! [`MemoryStore`] which implements all four traits. It is gated by the
//! `memory` feature flag and enabled by default.
#[cfg(feature = "memory")]
pub mod memory;
mod traits;

#[cfg(feature = "memory")]
pub use memory::MemoryStore;
pub use traits::{AnnotationStore, DirectoryStore, GrantStore, StatusStore};
