// SPDX-License-Identifier: MIT OR Apache-2.0

//! Resolution of raw role claims to a canonical role.
//!
//! Input is the set of role strings asserted for an actor plus their email
//! address. The email is only consulted against an explicit table of
//! override rules: the legacy system special-cased a handful of hardcoded
//! email fallbacks scattered across screens, which are preserved here as
//! named, revocable entries rather than literals. The override table is
//! migration scaffolding and should shrink to empty once proper role
//! records exist for those accounts.
use palisade_core::{Role, User};

/// A named, revocable email-based role override.
#[derive(Clone, Debug, PartialEq)]
pub struct OverrideRule {
    pub email: &'static str,
    pub role: Role,
}

/// The set of override rules consulted during resolution.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct OverrideTable {
    rules: Vec<OverrideRule>,
}

impl OverrideTable {
    /// An empty table: resolution falls back to asserted claims only.
    pub fn empty() -> Self {
        Self::default()
    }

    /// The override entries inherited from the legacy deployment.
    ///
    /// These accounts predate proper role records; the entries exist so
    /// they keep working during migration.
    pub fn legacy() -> Self {
        Self {
            rules: vec![
                OverrideRule {
                    email: "dhaneshwari.tosscss@gmail.com",
                    role: Role::Admin,
                },
                OverrideRule {
                    email: "superadmin@gmail.com",
                    role: Role::SuperAdmin,
                },
            ],
        }
    }

    /// Look up the override role for an email, if any.
    ///
    /// Matching is case-insensitive on the whole address, as the legacy
    /// checks were.
    pub fn role_for(&self, email: &str) -> Option<Role> {
        let email = email.trim().to_ascii_lowercase();
        self.rules
            .iter()
            .find(|rule| rule.email.eq_ignore_ascii_case(&email))
            .map(|rule| rule.role)
    }
}

/// Map one raw claim string to a canonical role name.
///
/// Accepts the spelling variants the legacy system recognised. Unknown
/// strings assert nothing.
fn role_from_claim(claim: &str) -> Option<Role> {
    match claim.trim().to_ascii_lowercase().as_str() {
        "super-admin" | "super_admin" => Some(Role::SuperAdmin),
        "admin" | "administrator" => Some(Role::Admin),
        "client" => Some(Role::Client),
        "user" => Some(Role::User),
        _ => None,
    }
}

/// Resolve an actor's raw claims and email to their canonical role.
///
/// Override rules win over asserted claims, super-admin overrides before
/// admin overrides. Without a matching override the highest-precedence
/// asserted name is returned. Empty or unrecognised claims resolve to
/// [`Role::User`]: resolution fails closed, never with an error.
pub fn resolve<'a, I>(claims: I, email: &str, overrides: &OverrideTable) -> Role
where
    I: IntoIterator<Item = &'a str>,
{
    match overrides.role_for(email) {
        Some(Role::SuperAdmin) => return Role::SuperAdmin,
        Some(Role::Admin) => return Role::Admin,
        _ => (),
    }

    claims
        .into_iter()
        .filter_map(role_from_claim)
        .max()
        .unwrap_or(Role::User)
}

/// Resolve a stored user record to its effective role.
///
/// The same precedence as [`resolve`], applied to the role identifiers
/// persisted on the user record instead of raw claim strings.
pub fn effective_role(user: &User, overrides: &OverrideTable) -> Role {
    match overrides.role_for(&user.email) {
        Some(Role::SuperAdmin) => Role::SuperAdmin,
        Some(Role::Admin) => Role::Admin,
        _ => user.asserted_role(),
    }
}

#[cfg(test)]
mod tests {
    use palisade_core::Role;

    use super::{OverrideTable, resolve};

    #[test]
    fn highest_precedence_claim_wins() {
        let overrides = OverrideTable::empty();
        let role = resolve(
            ["user", "client", "admin"],
            "someone@example.org",
            &overrides,
        );
        assert_eq!(role, Role::Admin);
    }

    #[test]
    fn legacy_spelling_variants_are_recognised() {
        let overrides = OverrideTable::empty();
        assert_eq!(
            resolve(["administrator"], "a@example.org", &overrides),
            Role::Admin
        );
        assert_eq!(
            resolve(["super_admin"], "a@example.org", &overrides),
            Role::SuperAdmin
        );
    }

    #[test]
    fn empty_or_unknown_claims_fail_closed() {
        let overrides = OverrideTable::empty();
        assert_eq!(resolve([], "a@example.org", &overrides), Role::User);
        assert_eq!(
            resolve(["owner", "manager"], "a@example.org", &overrides),
            Role::User
        );
    }

    #[test]
    fn overrides_force_the_role() {
        let overrides = OverrideTable::legacy();
        assert_eq!(
            resolve([], "superadmin@gmail.com", &overrides),
            Role::SuperAdmin
        );
        assert_eq!(
            resolve(["user"], "dhaneshwari.tosscss@gmail.com", &overrides),
            Role::Admin
        );
        // Matching is case-insensitive, as the legacy checks were.
        assert_eq!(
            resolve([], "  SuperAdmin@Gmail.com ", &overrides),
            Role::SuperAdmin
        );
    }

    #[test]
    fn effective_role_follows_stored_identifiers() {
        use std::collections::BTreeSet;

        use palisade_core::{RoleId, User, UserId};

        let mut user = User {
            id: UserId(1),
            email: "user-1@example.org".to_string(),
            display_name: "User 1".to_string(),
            roles: BTreeSet::from([RoleId::Qcr, RoleId::Client]),
            created_by: None,
            last_activity: 0,
            date_joined: 0,
        };

        assert_eq!(
            super::effective_role(&user, &OverrideTable::empty()),
            Role::Client
        );

        // An override on the stored email forces the role.
        user.email = "superadmin@gmail.com".to_string();
        assert_eq!(
            super::effective_role(&user, &OverrideTable::legacy()),
            Role::SuperAdmin
        );
    }

    #[test]
    fn empty_table_disables_overrides() {
        let overrides = OverrideTable::empty();
        assert_eq!(resolve([], "superadmin@gmail.com", &overrides), Role::User);
    }
}
