pub mod accounts;
pub mod reset;
pub mod sessions;
pub mod token;

use std::fmt;

/// Identifier of an authenticated principal.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PrincipalId(String);

impl PrincipalId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for PrincipalId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

impl fmt::Display for PrincipalId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Source of the identity used to stamp and filter reports.
/// `None` means a guest / anonymous session.
pub trait AuthProvider {
    fn current_principal(&self) -> Option<PrincipalId>;
}

/// Identity resolved for a single request from its session cookie.
#[derive(Debug, Clone, Default)]
pub struct RequestAuth {
    pub principal: Option<PrincipalId>,
    pub email: Option<String>,
}

impl RequestAuth {
    pub fn guest() -> Self {
        Self::default()
    }

    pub fn signed_in(principal: PrincipalId, email: impl Into<String>) -> Self {
        Self {
            principal: Some(principal),
            email: Some(email.into()),
        }
    }

    pub fn is_guest(&self) -> bool {
        self.principal.is_none()
    }
}

impl AuthProvider for RequestAuth {
    fn current_principal(&self) -> Option<PrincipalId> {
        self.principal.clone()
    }
}
