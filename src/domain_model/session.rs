use crate::domain_model::PrincipalId;
use std::fmt;

/// Address of a canonical session record: one live token per principal and
/// platform. The empty platform is a bucket of its own.
#[derive(Debug, Clone, Eq, PartialEq, Hash)]
pub struct SessionKey {
    pub principal_id: PrincipalId,
    pub platform: String,
}

impl SessionKey {
    pub fn new(principal_id: PrincipalId, platform: impl Into<String>) -> Self {
        SessionKey {
            principal_id,
            platform: platform.into(),
        }
    }
}

impl fmt::Display for SessionKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.principal_id, self.platform)
    }
}
