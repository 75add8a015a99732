use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Role tag carried by a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Role {
    Admin,
    Recruiter,
    JobHoster,
    EliteTeam,
    JobSeeker,
}

impl Role {
    pub const ALL: [Role; 5] = [
        Role::Admin,
        Role::Recruiter,
        Role::JobHoster,
        Role::EliteTeam,
        Role::JobSeeker,
    ];

    /// Wire/storage spelling of the role
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Admin => "admin",
            Role::Recruiter => "recruiter",
            Role::JobHoster => "jobHoster",
            Role::EliteTeam => "eliteTeam",
            Role::JobSeeker => "jobSeeker",
        }
    }

    /// Parse a stored role string. Unrecognized values yield `None` and are
    /// logged once here, so misconfigured accounts show up in the logs instead
    /// of silently losing access.
    pub fn parse_lenient(raw: &str) -> Option<Role> {
        match raw.parse::<Role>() {
            Ok(role) => Some(role),
            Err(_) => {
                tracing::warn!("Unrecognized role '{}' in session; treating as no role", raw);
                None
            }
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownRole(pub String);

impl fmt::Display for UnknownRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown role '{}'", self.0)
    }
}

impl std::error::Error for UnknownRole {}

impl FromStr for Role {
    type Err = UnknownRole;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Role::ALL
            .into_iter()
            .find(|role| role.as_str() == s)
            .ok_or_else(|| UnknownRole(s.to_string()))
    }
}
