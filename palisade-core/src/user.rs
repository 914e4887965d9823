// SPDX-License-Identifier: MIT OR Apache-2.0

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::identity::{Timestamp, UserId};
use crate::role::{Role, RoleId};

/// A user record as maintained by the external CRUD layer.
///
/// Every user carries at least one role identifier. `created_by` is
/// immutable once set and defines the "creation scope" used by client and
/// admin visibility filtering.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: UserId,
    pub email: String,
    pub display_name: String,
    pub roles: BTreeSet<RoleId>,
    pub created_by: Option<UserId>,
    pub last_activity: Timestamp,
    pub date_joined: Timestamp,
}

impl User {
    /// The highest-precedence canonical role asserted by this user's role
    /// identifiers.
    ///
    /// A user without any privilege-carrying identifier resolves to
    /// [`Role::User`]: absence of claims always fails closed.
    pub fn asserted_role(&self) -> Role {
        self.roles
            .iter()
            .map(RoleId::canonical_role)
            .max()
            .unwrap_or(Role::User)
    }

    /// User was created by the given actor.
    pub fn created_by(&self, actor: UserId) -> bool {
        self.created_by == Some(actor)
    }
}

/// Skill level attached to a user by their manager. Independent annotation,
/// not an access-control fact.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Level {
    #[serde(rename = "1")]
    One,
    #[serde(rename = "2")]
    Two,
    #[serde(rename = "3")]
    Three,
}

/// Error returned when converting an out-of-range numeric level.
#[derive(Clone, Copy, Debug, Error, PartialEq)]
#[error("level out of range: {0} (expected 1-3)")]
pub struct LevelError(pub u8);

impl Level {
    pub fn as_u8(&self) -> u8 {
        match self {
            Level::One => 1,
            Level::Two => 2,
            Level::Three => 3,
        }
    }
}

impl TryFrom<u8> for Level {
    type Error = LevelError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            1 => Ok(Level::One),
            2 => Ok(Level::Two),
            3 => Ok(Level::Three),
            other => Err(LevelError(other)),
        }
    }
}
