use staffdir_auth::{Principal, RequestAuth, Role};

/// Principal context for a request (authenticated username + roles).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PrincipalContext {
    username: String,
    roles: Vec<Role>,
}

impl PrincipalContext {
    pub fn new(username: impl Into<String>, roles: Vec<Role>) -> Self {
        Self {
            username: username.into(),
            roles,
        }
    }

    pub fn username(&self) -> &str {
        &self.username
    }

    pub fn roles(&self) -> &[Role] {
        &self.roles
    }

    pub fn to_request_auth(&self) -> RequestAuth {
        RequestAuth::Authenticated(Principal {
            subject: self.username.clone(),
            roles: self.roles.clone(),
        })
    }
}

impl From<Principal> for PrincipalContext {
    fn from(p: Principal) -> Self {
        Self::new(p.subject, p.roles)
    }
}
