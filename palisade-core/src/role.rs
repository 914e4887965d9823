// SPDX-License-Identifier: MIT OR Apache-2.0

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// The four canonical role names, ordered by precedence. Greater roles are
/// assumed to also hold all capabilities of lower ones.
///
/// A user record may carry several role identifiers at once; their
/// *effective role* is the highest-precedence canonical name present.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Role {
    /// Plain labeling user. No directory or project-list access.
    User,

    /// Client account. Sees own creations and own assignments.
    Client,

    /// Platform administrator. Manages the whole user directory.
    Admin,

    /// Unrestricted access to every user and project record.
    SuperAdmin,
}

impl Role {
    /// Role is User.
    pub fn is_user(&self) -> bool {
        matches!(self, Role::User)
    }

    /// Role is Client.
    pub fn is_client(&self) -> bool {
        matches!(self, Role::Client)
    }

    /// Role is Admin.
    pub fn is_admin(&self) -> bool {
        matches!(self, Role::Admin)
    }

    /// Role is SuperAdmin.
    pub fn is_super_admin(&self) -> bool {
        matches!(self, Role::SuperAdmin)
    }

    /// Role carries at least admin capabilities.
    pub fn is_admin_or_above(&self) -> bool {
        *self >= Role::Admin
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Role::User => "user",
            Role::Client => "client",
            Role::Admin => "admin",
            Role::SuperAdmin => "super-admin",
        };

        write!(f, "{}", s)
    }
}

/// A selectable role identifier as known to the legacy platform.
///
/// These are the primitive identifiers persisted on user records plus the
/// one composite identifier (`labeler`) which is only ever a UI-facing
/// shorthand and is expanded before any diffing or persistence.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum RoleId {
    General,
    LabelingInterface,
    Annotation,
    Qcr,
    Model,
    Predictions,
    CloudStorage,
    Webhooks,
    DangerZone,
    User,
    Client,
    Admin,
    SuperAdmin,
    /// Composite shorthand for the labeling primitives.
    Labeler,
}

impl RoleId {
    /// The constituent primitive ids of a composite identifier, or `None`
    /// for primitives.
    ///
    /// Composite ids are consulted at diff time only and never persisted as
    /// roles themselves.
    pub fn constituents(&self) -> Option<&'static [RoleId]> {
        match self {
            RoleId::Labeler => Some(&[RoleId::LabelingInterface, RoleId::Annotation]),
            _ => None,
        }
    }

    /// Identifier is a composite shorthand.
    pub fn is_composite(&self) -> bool {
        self.constituents().is_some()
    }

    /// The canonical role name this identifier asserts, if any.
    ///
    /// Most identifiers are feature toggles which carry no directory-level
    /// privilege and therefore map to [`Role::User`].
    pub fn canonical_role(&self) -> Role {
        match self {
            RoleId::SuperAdmin => Role::SuperAdmin,
            RoleId::Admin => Role::Admin,
            RoleId::Client => Role::Client,
            _ => Role::User,
        }
    }
}

impl fmt::Display for RoleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            RoleId::General => "general",
            RoleId::LabelingInterface => "labeling-interface",
            RoleId::Annotation => "annotation",
            RoleId::Qcr => "qcr",
            RoleId::Model => "model",
            RoleId::Predictions => "predictions",
            RoleId::CloudStorage => "cloud-storage",
            RoleId::Webhooks => "webhooks",
            RoleId::DangerZone => "danger-zone",
            RoleId::User => "user",
            RoleId::Client => "client",
            RoleId::Admin => "admin",
            RoleId::SuperAdmin => "super-admin",
            RoleId::Labeler => "labeler",
        };

        write!(f, "{}", s)
    }
}

/// Error returned when parsing an unknown role identifier string.
#[derive(Clone, Debug, Error, PartialEq)]
#[error("unknown role identifier: {0}")]
pub struct RoleIdError(pub String);

impl FromStr for RoleId {
    type Err = RoleIdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let id = match s {
            "general" => RoleId::General,
            "labeling-interface" => RoleId::LabelingInterface,
            "annotation" => RoleId::Annotation,
            "qcr" => RoleId::Qcr,
            "model" => RoleId::Model,
            "predictions" => RoleId::Predictions,
            "cloud-storage" => RoleId::CloudStorage,
            "webhooks" => RoleId::Webhooks,
            "danger-zone" => RoleId::DangerZone,
            "user" => RoleId::User,
            "client" => RoleId::Client,
            "admin" => RoleId::Admin,
            "super-admin" => RoleId::SuperAdmin,
            "labeler" => RoleId::Labeler,
            other => return Err(RoleIdError(other.to_string())),
        };

        Ok(id)
    }
}

#[cfg(test)]
mod tests {
    use std::str::FromStr;

    use super::{Role, RoleId};

    #[test]
    fn role_precedence() {
        assert!(Role::SuperAdmin > Role::Admin);
        assert!(Role::Admin > Role::Client);
        assert!(Role::Client > Role::User);
        assert!(Role::Admin.is_admin_or_above());
        assert!(Role::SuperAdmin.is_admin_or_above());
        assert!(!Role::Client.is_admin_or_above());
    }

    #[test]
    fn role_id_round_trip() {
        for id in [
            RoleId::General,
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
            RoleId::Labeler,
        ] {
            assert_eq!(RoleId::from_str(&id.to_string()).unwrap(), id);
        }

        assert!(RoleId::from_str("owner").is_err());
    }

    #[test]
    fn labeler_expands_to_labeling_primitives() {
        assert_eq!(
            RoleId::Labeler.constituents().unwrap(),
            &[RoleId::LabelingInterface, RoleId::Annotation]
        );
        assert!(RoleId::Qcr.constituents().is_none());
    }

    #[test]
    fn wire_names_match_legacy_identifiers() {
        assert_eq!(
            serde_json::to_string(&RoleId::LabelingInterface).unwrap(),
            "\"labeling-interface\""
        );
        assert_eq!(
            serde_json::from_str::<RoleId>("\"danger-zone\"").unwrap(),
            RoleId::DangerZone
        );
        assert_eq!(
            serde_json::to_string(&Role::SuperAdmin).unwrap(),
            "\"super-admin\""
        );
    }

    #[test]
    fn canonical_role_mapping() {
        assert_eq!(RoleId::SuperAdmin.canonical_role(), Role::SuperAdmin);
        assert_eq!(RoleId::Admin.canonical_role(), Role::Admin);
        assert_eq!(RoleId::Client.canonical_role(), Role::Client);
        assert_eq!(RoleId::Qcr.canonical_role(), Role::User);
        assert_eq!(RoleId::Webhooks.canonical_role(), Role::User);
    }
}
