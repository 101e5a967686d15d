use crate::application_port::{
    AuthError, Authenticator, ClaimsPolicy, ConfigError, RenewalPolicy, TokenCodec,
};
use crate::context::RequestContext;
use crate::domain_model::{ClaimSet, SessionKey};
use crate::domain_port::SessionStore;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, warn};

pub const DEFAULT_RENEWAL_TTL: Duration = Duration::from_secs(24 * 60 * 60);

/// Accepts a token only while it is the canonical session for its principal
/// and platform, and slides that session's expiry forward on every use.
pub struct SessionAuthenticator {
    codec: Arc<dyn TokenCodec>,
    store: Arc<dyn SessionStore>,
    renewal_ttl: Duration,
    renewal: RenewalPolicy,
    claims_policy: ClaimsPolicy,
}

pub struct SessionAuthenticatorBuilder {
    store: Arc<dyn SessionStore>,
    codec: Option<Arc<dyn TokenCodec>>,
    renewal_ttl: Duration,
    renewal: RenewalPolicy,
    claims_policy: ClaimsPolicy,
}

impl SessionAuthenticatorBuilder {
    pub fn codec(mut self, codec: Arc<dyn TokenCodec>) -> Self {
        self.codec = Some(codec);
        self
    }

    /// Zero keeps the current window.
    pub fn renewal_ttl(mut self, ttl: Duration) -> Self {
        if !ttl.is_zero() {
            self.renewal_ttl = ttl;
        }
        self
    }

    pub fn renewal(mut self, renewal: RenewalPolicy) -> Self {
        self.renewal = renewal;
        self
    }

    pub fn claims_policy(mut self, claims_policy: ClaimsPolicy) -> Self {
        self.claims_policy = claims_policy;
        self
    }

    pub fn build(self) -> Result<SessionAuthenticator, ConfigError> {
        let codec = self.codec.ok_or(ConfigError::MissingCodec)?;
        Ok(SessionAuthenticator {
            codec,
            store: self.store,
            renewal_ttl: self.renewal_ttl,
            renewal: self.renewal,
            claims_policy: self.claims_policy,
        })
    }
}

impl SessionAuthenticator {
    pub fn builder(store: Arc<dyn SessionStore>) -> SessionAuthenticatorBuilder {
        SessionAuthenticatorBuilder {
            store,
            codec: None,
            renewal_ttl: DEFAULT_RENEWAL_TTL,
            renewal: RenewalPolicy::default(),
            claims_policy: ClaimsPolicy::default(),
        }
    }

    pub fn renewal_ttl(&self) -> Duration {
        self.renewal_ttl
    }

    // The read and the refresh are separate store operations. A revoke landing
    // between them only touches the TTL of a record nobody will match again.
    async fn confirm_session(
        &self,
        ctx: &RequestContext,
        token: &str,
        key: &SessionKey,
    ) -> Result<(), AuthError> {
        let stored = match ctx.run(self.store.get(key)).await? {
            Ok(Some(stored)) => stored,
            Ok(None) => {
                debug!(%key, "no live session");
                return Err(AuthError::TokenExpired);
            }
            Err(e) => {
                warn!(%key, error = %e, "session lookup failed");
                return Err(AuthError::TokenExpired);
            }
        };

        if stored.is_empty() || stored != token {
            debug!(%key, "token superseded or revoked");
            return Err(AuthError::TokenExpired);
        }

        if self.renewal == RenewalPolicy::Sliding {
            ctx.run(self.store.refresh(key, self.renewal_ttl))
                .await?
                .map_err(|e| {
                    warn!(%key, error = %e, "session renewal failed");
                    AuthError::TokenExpired
                })?;
        }

        Ok(())
    }
}

#[async_trait::async_trait]
impl Authenticator for SessionAuthenticator {
    async fn authenticate(
        &self,
        ctx: &RequestContext,
        token: &str,
    ) -> Result<ClaimSet, AuthError> {
        if token.is_empty() {
            return Err(AuthError::Unauthorized);
        }

        let claims = self.codec.decode(token)?;
        let key = SessionKey::new(claims.principal_id, claims.platform.clone());
        self.confirm_session(ctx, token, &key).await?;

        debug!(%key, "session authenticated");
        Ok(match self.claims_policy {
            ClaimsPolicy::Full => claims,
            ClaimsPolicy::PrincipalOnly => claims.principal_only(),
        })
    }
}
