use core::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Role identifier used for RBAC.
///
/// Closed set: an unrecognised role string is an error at every boundary
/// (request bodies, token payloads), so a typo can never mint a new role.
/// The `ROLE_`-prefixed spelling is accepted on input and never produced.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Role {
    #[default]
    #[serde(rename = "USER", alias = "ROLE_USER")]
    User,
    #[serde(rename = "ADMIN", alias = "ROLE_ADMIN")]
    Admin,
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("unknown role '{0}'")]
pub struct UnknownRole(pub String);

impl Role {
    pub const ALL: [Role; 2] = [Role::User, Role::Admin];

    pub fn as_str(&self) -> &'static str {
        match self {
            Role::User => "USER",
            Role::Admin => "ADMIN",
        }
    }

    /// De-duplicate roles, keeping the first occurrence of each.
    pub fn dedup(roles: impl IntoIterator<Item = Role>) -> Vec<Role> {
        let mut out: Vec<Role> = Vec::new();
        for role in roles {
            if !out.contains(&role) {
                out.push(role);
            }
        }
        out
    }
}

impl FromStr for Role {
    type Err = UnknownRole;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let name = s.strip_prefix("ROLE_").unwrap_or(s);
        match name {
            "USER" => Ok(Role::User),
            "ADMIN" => Ok(Role::Admin),
            _ => Err(UnknownRole(s.to_string())),
        }
    }
}

impl core::fmt::Display for Role {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}
