//! Role model for access-control decisions.
//!
//! Roles form a closed enumeration, totally ordered by privilege. Ordering
//! exists so that policy tables can be built from a minimum role; the
//! authorization gate itself only ever checks exact set membership.

use serde::{Deserialize, Serialize};

/// A role held by a principal.
///
/// Variant order is privilege order: `Customer` is the least privileged,
/// `SystemAdmin` the most. Wire names use the camelCase spelling carried
/// over from the original deployment (`salesClerk`, `storeOwner`, ...).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Role {
    /// Storefront customer. Default role for self-registration.
    Customer,
    /// Sales clerk.
    SalesClerk,
    /// Store owner.
    StoreOwner,
    /// System administrator.
    SystemAdmin,
}

impl Role {
    /// All roles, in ascending privilege order.
    pub const ALL: [Self; 4] = [
        Self::Customer,
        Self::SalesClerk,
        Self::StoreOwner,
        Self::SystemAdmin,
    ];

    /// Returns the wire name for this role.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Customer => "customer",
            Self::SalesClerk => "salesClerk",
            Self::StoreOwner => "storeOwner",
            Self::SystemAdmin => "systemAdmin",
        }
    }

    /// Parses a role from its wire name.
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "customer" => Some(Self::Customer),
            "salesClerk" => Some(Self::SalesClerk),
            "storeOwner" => Some(Self::StoreOwner),
            "systemAdmin" => Some(Self::SystemAdmin),
            _ => None,
        }
    }

    /// Returns the lowest-privilege role.
    #[must_use]
    pub const fn lowest() -> Self {
        Self::Customer
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A set of roles allowed to perform an operation.
///
/// Membership is exact-match against the closed enumeration; there is no
/// implicit hierarchy. Where a route should admit "this role and above",
/// the expanded set is built explicitly with [`RoleSet::at_least`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RoleSet(Vec<Role>);

impl RoleSet {
    /// Creates an empty role set.
    #[must_use]
    pub const fn new() -> Self {
        Self(Vec::new())
    }

    /// Creates a set from a slice of roles.
    #[must_use]
    pub fn of(roles: &[Role]) -> Self {
        Self(roles.to_vec())
    }

    /// Creates the set of all roles at or above `min` privilege.
    #[must_use]
    pub fn at_least(min: Role) -> Self {
        Self(Role::ALL.iter().copied().filter(|r| *r >= min).collect())
    }

    /// Checks whether `role` is a member of this set.
    #[must_use]
    pub fn contains(&self, role: Role) -> bool {
        self.0.contains(&role)
    }

    /// Returns whether the set is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterates over the member roles.
    pub fn iter(&self) -> impl Iterator<Item = Role> + '_ {
        self.0.iter().copied()
    }
}

impl From<Vec<Role>> for RoleSet {
    fn from(roles: Vec<Role>) -> Self {
        Self(roles)
    }
}

impl FromIterator<Role> for RoleSet {
    fn from_iter<I: IntoIterator<Item = Role>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}
