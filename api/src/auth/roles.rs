use db::models::role::RoleName;
use std::collections::BTreeSet;
use std::fmt;

/// Capabilities of the caller, resolved from the database on every request.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RoleSet(BTreeSet<RoleName>);

impl RoleSet {
    pub fn contains(&self, role: RoleName) -> bool {
        self.0.contains(&role)
    }

    /// True when the caller holds at least one of `allowed`.
    /// An empty `allowed` only requires authentication.
    pub fn permits(&self, allowed: &[RoleName]) -> bool {
        allowed.is_empty() || allowed.iter().any(|r| self.0.contains(r))
    }

    pub fn is_admin(&self) -> bool {
        self.contains(RoleName::Admin)
    }

    pub fn names(&self) -> Vec<RoleName> {
        self.0.iter().copied().collect()
    }
}

impl FromIterator<RoleName> for RoleSet {
    fn from_iter<I: IntoIterator<Item = RoleName>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl fmt::Display for RoleSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let names: Vec<String> = self.0.iter().map(ToString::to_string).collect();
        write!(f, "{}", names.join(", "))
    }
}
