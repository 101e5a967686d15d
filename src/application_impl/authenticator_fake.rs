use crate::application_port::{AuthError, Authenticator};
use crate::context::RequestContext;
use crate::domain_model::{ClaimSet, PrincipalId};

const FAKE_PREFIX: &str = "fake-access-token:";

/// Accepts `fake-access-token:<principal>:<platform>` without any store.
#[derive(Debug, Default)]
pub struct FakeAuthenticator;

impl FakeAuthenticator {
    pub fn new() -> Self {
        Self
    }

    pub fn token_for(principal_id: PrincipalId, platform: &str) -> String {
        format!("{}{}:{}", FAKE_PREFIX, principal_id, platform)
    }
}

// Minimal fake for local wiring; it never reports expiry.
#[async_trait::async_trait]
impl Authenticator for FakeAuthenticator {
    async fn authenticate(
        &self,
        _ctx: &RequestContext,
        token: &str,
    ) -> Result<ClaimSet, AuthError> {
        if token.is_empty() {
            return Err(AuthError::Unauthorized);
        }
        let rest = token
            .strip_prefix(FAKE_PREFIX)
            .ok_or(AuthError::InvalidToken)?;
        let (id, platform) = rest.split_once(':').unwrap_or((rest, ""));
        let principal_id: PrincipalId = id.parse().map_err(|_| AuthError::InvalidToken)?;
        if principal_id.is_none() {
            return Err(AuthError::InvalidToken);
        }
        Ok(ClaimSet::new(principal_id, platform))
    }
}
