use crate::domain_model::SessionKey;
use std::time::Duration;

/// Holds the canonical token for every `(principal, platform)` pair, each
/// with its own time-to-live.
#[async_trait::async_trait]
pub trait SessionStore: Send + Sync {
    /// Canonical token for the key, `None` if it was never written or has
    /// been evicted.
    async fn get(&self, key: &SessionKey) -> Result<Option<String>, SessionStoreError>;

    /// Resets the remaining time-to-live. Succeeds without effect when the
    /// key no longer exists.
    async fn refresh(&self, key: &SessionKey, ttl: Duration) -> Result<(), SessionStoreError>;

    /// Writes `token` as the canonical value, replacing whatever was there.
    async fn put(
        &self,
        key: &SessionKey,
        token: &str,
        ttl: Duration,
    ) -> Result<(), SessionStoreError>;

    async fn remove(&self, key: &SessionKey) -> Result<(), SessionStoreError>;
}

#[derive(Debug, thiserror::Error)]
pub enum SessionStoreError {
    #[error("infra error: {0}")]
    Store(String),
}
