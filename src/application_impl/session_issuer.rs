use crate::application_port::{AuthError, TokenCodec};
use crate::domain_model::{ClaimSet, PrincipalId, SessionKey};
use crate::domain_port::SessionStore;
use chrono::{SubsecRound, TimeDelta, Utc};
use std::sync::Arc;
use std::time::Duration;
use tracing::info;

#[derive(Debug, Clone)]
pub struct IssuerOptions {
    /// Lifetime of the canonical record before it must be renewed by use.
    pub session_ttl: Duration,
    /// Hard `exp` written into the token. No `exp` when unset.
    pub token_ttl: Option<Duration>,
    pub issuer: Option<String>,
    pub audience: Vec<String>,
}

impl Default for IssuerOptions {
    fn default() -> Self {
        IssuerOptions {
            session_ttl: Duration::from_secs(24 * 60 * 60),
            token_ttl: None,
            issuer: None,
            audience: Vec::new(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct IssuedToken {
    pub token: String,
    pub claims: ClaimSet,
}

/// Writes freshly signed tokens as the canonical session, displacing whatever
/// token the same principal held on that platform.
pub struct SessionIssuer {
    codec: Arc<dyn TokenCodec>,
    store: Arc<dyn SessionStore>,
    options: IssuerOptions,
}

impl SessionIssuer {
    pub fn new(
        codec: Arc<dyn TokenCodec>,
        store: Arc<dyn SessionStore>,
        options: IssuerOptions,
    ) -> Self {
        SessionIssuer {
            codec,
            store,
            options,
        }
    }

    pub async fn issue(
        &self,
        principal_id: PrincipalId,
        platform: &str,
    ) -> Result<IssuedToken, AuthError> {
        let now = Utc::now().trunc_subsecs(0);
        let mut claims = ClaimSet::new(principal_id, platform);
        claims.registered.issuer = self.options.issuer.clone();
        claims.registered.audience = self.options.audience.clone();
        claims.registered.subject = Some(principal_id.to_string());
        claims.registered.issued_at = Some(now);
        claims.registered.token_id = Some(uuid::Uuid::new_v4().to_string());
        if let Some(ttl) = self.options.token_ttl {
            let ttl = TimeDelta::from_std(ttl).map_err(|e| AuthError::Signing(e.to_string()))?;
            claims.registered.expires_at = Some(now + ttl);
        }

        let token = self.codec.encode(&claims)?;
        let key = SessionKey::new(principal_id, platform);
        self.store.put(&key, &token, self.options.session_ttl).await?;

        info!(%key, "session issued");
        Ok(IssuedToken { token, claims })
    }

    pub async fn revoke(&self, principal_id: PrincipalId, platform: &str) -> Result<(), AuthError> {
        let key = SessionKey::new(principal_id, platform);
        self.store.remove(&key).await?;
        info!(%key, "session revoked");
        Ok(())
    }
}
