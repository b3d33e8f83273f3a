use serde::Serialize;
use thiserror::Error;

use crate::Role;

/// Roles that grant access to an operation. Any one of them suffices.
///
/// Never empty: every protected operation names at least one role.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccessRequirement {
    any_of: Vec<Role>,
}

impl AccessRequirement {
    /// `None` for an empty role set.
    pub fn any_of(roles: impl IntoIterator<Item = Role>) -> Option<Self> {
        let any_of = Role::dedup(roles);
        if any_of.is_empty() {
            None
        } else {
            Some(Self { any_of })
        }
    }

    pub fn admin() -> Self {
        Self {
            any_of: vec![Role::Admin],
        }
    }

    pub fn admin_or_user() -> Self {
        Self {
            any_of: vec![Role::Admin, Role::User],
        }
    }

    pub fn roles(&self) -> &[Role] {
        &self.any_of
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AccessDecision {
    Allow,
    Deny,
}

impl AccessDecision {
    pub fn is_allowed(self) -> bool {
        matches!(self, AccessDecision::Allow)
    }
}

/// Allow iff the granted roles and the requirement intersect.
///
/// - No IO
/// - No panics
pub fn authorize(granted: &[Role], requirement: &AccessRequirement) -> AccessDecision {
    if granted.iter().any(|r| requirement.any_of.contains(r)) {
        AccessDecision::Allow
    } else {
        AccessDecision::Deny
    }
}

/// Protected operations and the roles each one requires.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    CreateEmployee,
    ListEmployees,
    GetEmployee,
    UpdateEmployee,
    DeleteEmployee,
}

impl Operation {
    pub fn name(&self) -> &'static str {
        match self {
            Operation::CreateEmployee => "employees.create",
            Operation::ListEmployees => "employees.list",
            Operation::GetEmployee => "employees.get",
            Operation::UpdateEmployee => "employees.update",
            Operation::DeleteEmployee => "employees.delete",
        }
    }

    pub fn requirement(&self) -> AccessRequirement {
        match self {
            Operation::CreateEmployee | Operation::UpdateEmployee | Operation::DeleteEmployee => {
                AccessRequirement::admin()
            }
            Operation::ListEmployees | Operation::GetEmployee => AccessRequirement::admin_or_user(),
        }
    }
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AuthzError {
    #[error("authentication required")]
    Unauthenticated,

    #[error("forbidden: '{0}' requires one of {1:?}")]
    Forbidden(&'static str, Vec<Role>),
}
