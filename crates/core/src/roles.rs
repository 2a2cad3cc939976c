//! Role names and the caller's role set.
//!
//! Callers arrive with an unordered collection of role-name strings from
//! the identity layer. Anything outside the recognized set carries no
//! privilege.

/// Operator / back-office administrator.
pub const ROLE_ADMIN: &str = "Admin";
/// Field agent assigned to individual listings.
pub const ROLE_AGENT: &str = "Agent";
/// Photography company that creates and owns listings.
pub const ROLE_PHOTOGRAPHY_COMPANY: &str = "PhotographyCompany";

/// The set of roles a caller holds for the duration of one request.
///
/// A caller may hold several roles at once; `Admin` dominates everything
/// else. Unknown role names are dropped at construction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RoleSet {
    admin: bool,
    agent: bool,
    photography_company: bool,
}

impl RoleSet {
    /// Build a role set from raw role-name strings (case-sensitive).
    pub fn from_names<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut set = RoleSet::default();
        for name in names {
            match name.as_ref() {
                ROLE_ADMIN => set.admin = true,
                ROLE_AGENT => set.agent = true,
                ROLE_PHOTOGRAPHY_COMPANY => set.photography_company = true,
                _ => {}
            }
        }
        set
    }

    /// A role set holding only `Admin`. Handy in tests and tooling.
    pub fn admin() -> Self {
        RoleSet::from_names([ROLE_ADMIN])
    }

    /// A role set holding only `Agent`.
    pub fn agent() -> Self {
        RoleSet::from_names([ROLE_AGENT])
    }

    /// A role set holding only `PhotographyCompany`.
    pub fn photography_company() -> Self {
        RoleSet::from_names([ROLE_PHOTOGRAPHY_COMPANY])
    }

    pub fn is_admin(&self) -> bool {
        self.admin
    }

    pub fn is_agent(&self) -> bool {
        self.agent
    }

    pub fn is_photography_company(&self) -> bool {
        self.photography_company
    }

    /// True when the caller holds no recognized role at all.
    pub fn is_empty(&self) -> bool {
        !(self.admin || self.agent || self.photography_company)
    }
}
