use crate::session::Role;

const STAFF: &[Role] = &[Role::Admin, Role::Recruiter, Role::JobHoster, Role::EliteTeam];
const ADMIN_ONLY: &[Role] = &[Role::Admin];
const IMPORTERS: &[Role] = &[Role::Admin, Role::Recruiter];

/// Access rule for one route pattern. Segments starting with `:` match any
/// single non-empty segment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouteAccessRule {
    pub path: &'static str,
    /// Empty means any authenticated session.
    pub allowed_roles: &'static [Role],
    /// Entry points meant only for signed-out users (login).
    pub public_only: bool,
}

impl RouteAccessRule {
    pub const fn protected(path: &'static str, allowed_roles: &'static [Role]) -> Self {
        Self {
            path,
            allowed_roles,
            public_only: false,
        }
    }

    pub const fn public_only(path: &'static str) -> Self {
        Self {
            path,
            allowed_roles: &[],
            public_only: true,
        }
    }

    /// Role membership check. An absent role is a member of no explicit set.
    pub fn permits(&self, role: Option<Role>) -> bool {
        if self.allowed_roles.is_empty() {
            return true;
        }
        role.is_some_and(|r| self.allowed_roles.contains(&r))
    }

    pub fn matches(&self, path: &str) -> bool {
        let pattern = segments(self.path);
        let actual = segments(path);
        pattern.len() == actual.len()
            && pattern
                .iter()
                .zip(actual.iter())
                .all(|(p, a)| p.starts_with(':') || p == a)
    }
}

/// Strip query/fragment and split into non-empty segments
fn segments(path: &str) -> Vec<&str> {
    let path = path.split(['?', '#']).next().unwrap_or_default();
    path.split('/').filter(|s| !s.is_empty()).collect()
}

#[derive(Debug, Clone)]
pub struct RouteTable {
    rules: Vec<RouteAccessRule>,
}

impl RouteTable {
    pub fn new(rules: Vec<RouteAccessRule>) -> Self {
        Self { rules }
    }

    pub fn rules(&self) -> &[RouteAccessRule] {
        &self.rules
    }

    /// First rule whose pattern matches `path`
    pub fn find(&self, path: &str) -> Option<&RouteAccessRule> {
        self.rules.iter().find(|rule| rule.matches(path))
    }
}

impl Default for RouteTable {
    fn default() -> Self {
        Self::new(vec![
            RouteAccessRule::public_only("/login"),
            RouteAccessRule::protected("/dashboard", &[]),
            RouteAccessRule::protected("/jobs", STAFF),
            RouteAccessRule::protected("/jobs/new", STAFF),
            RouteAccessRule::protected("/jobs/:id", STAFF),
            RouteAccessRule::protected("/jobs/:id/edit", STAFF),
            RouteAccessRule::protected("/applicants", ADMIN_ONLY),
            RouteAccessRule::protected("/applicants/:id", ADMIN_ONLY),
            RouteAccessRule::protected("/team", ADMIN_ONLY),
            RouteAccessRule::protected("/team/:id/jobs", ADMIN_ONLY),
            RouteAccessRule::protected("/imports", IMPORTERS),
            RouteAccessRule::protected("/profile", &[]),
        ])
    }
}
