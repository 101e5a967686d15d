use crate::context::{Interrupted, RequestContext};
use crate::domain_model::ClaimSet;
use crate::domain_port::{KeyError, SessionStoreError};
use serde::Deserialize;

/// Per-request authentication outcome. Every variant is terminal for the
/// request; nothing here is retried.
#[derive(Debug, Clone, Eq, PartialEq, thiserror::Error)]
pub enum AuthError {
    /// No credential was presented.
    #[error("unauthorized")]
    Unauthorized,
    /// Malformed token or failed cryptographic verification.
    #[error("invalid token")]
    InvalidToken,
    /// Validly signed but no longer the live session: expired, revoked,
    /// superseded, or the store could not confirm it.
    #[error("token expired")]
    TokenExpired,
    #[error("authentication cancelled")]
    Cancelled,
    #[error("signing error: {0}")]
    Signing(String),
    #[error("store error: {0}")]
    Store(String),
}

impl From<Interrupted> for AuthError {
    fn from(_: Interrupted) -> Self {
        AuthError::Cancelled
    }
}

impl From<SessionStoreError> for AuthError {
    fn from(err: SessionStoreError) -> Self {
        AuthError::Store(err.to_string())
    }
}

/// Setup-time faults. These stop the engine from being built and never
/// surface on a request.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("key error: {0}")]
    Key(#[from] KeyError),
    #[error("missing token codec")]
    MissingCodec,
    #[error("missing signing key: {0}")]
    MissingSigningKey(String),
}

/// How much of the decoded token a successful authentication hands back.
#[derive(Debug, Default, Clone, Copy, Eq, PartialEq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ClaimsPolicy {
    /// Everything the token carried.
    #[default]
    Full,
    /// Only the principal id.
    PrincipalOnly,
}

/// Whether a successful check pushes the session's expiry forward.
#[derive(Debug, Default, Clone, Copy, Eq, PartialEq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RenewalPolicy {
    /// Reset the record's TTL to the full window on every successful check.
    #[default]
    Sliding,
    /// Compare only; the record lapses on its original schedule.
    CompareOnly,
}

#[async_trait::async_trait]
pub trait Authenticator: Send + Sync {
    async fn authenticate(&self, ctx: &RequestContext, token: &str)
    -> Result<ClaimSet, AuthError>;
}
