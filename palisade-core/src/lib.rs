// SPDX-License-Identifier: MIT OR Apache-2.0

//! Core data types for the palisade access engine.
//!
//! A "palisade" deployment sits next to a labeling platform and answers one
//! question: which users and projects may a given actor see, mutate or
//! assign? This crate holds the entity model shared by the store and engine
//! crates: stable integer ids, role names with their precedence order, the
//! selectable role identifiers of the legacy platform, and the project
//! lifecycle status with its derivation rule.
//!
//! No I/O happens here. Users and projects are created by an external CRUD
//! layer and referenced by id only.
mod identity;
mod project;
mod role;
mod user;

pub use identity::{ProjectId, Timestamp, UserId};
pub use project::{Project, ProjectStatus, displayed_status};
pub use role::{Role, RoleId, RoleIdError};
pub use user::{Level, LevelError, User};
