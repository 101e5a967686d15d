use crate::domain_model::{PrincipalId, SessionKey};
use crate::domain_port::*;
use redis::AsyncCommands;
use redis::aio::ConnectionManager;
use std::time::Duration;
use tracing::debug;

/// One hash per principal at `{prefix}:{principal}`, one field per platform.
/// The TTL lives on the hash, so renewing any platform keeps every platform
/// of that principal alive.
pub struct RedisSessionStore {
    conn: ConnectionManager,
    prefix: String,
}

impl RedisSessionStore {
    pub fn new(conn: ConnectionManager, prefix: impl Into<String>) -> Self {
        RedisSessionStore {
            conn,
            prefix: prefix.into(),
        }
    }

    fn key(&self, principal_id: PrincipalId) -> String {
        format!("{}:{}", self.prefix, principal_id)
    }
}

// Redis expiries have second granularity; never round a live window to zero.
fn ttl_secs(ttl: Duration) -> i64 {
    ttl.as_secs().max(1) as i64
}

#[derive(Debug, Clone, Copy, Eq, PartialEq)]
enum Renewal {
    Extended,
    Missing,
}

// EXPIRE answers false for a missing key; refresh leaves that as a no-op.
fn renewal(key: &SessionKey, applied: bool) -> Renewal {
    if applied {
        Renewal::Extended
    } else {
        debug!(%key, "refresh found no session to extend");
        Renewal::Missing
    }
}

#[async_trait::async_trait]
impl SessionStore for RedisSessionStore {
    async fn get(&self, key: &SessionKey) -> Result<Option<String>, SessionStoreError> {
        let hash = self.key(key.principal_id);
        let mut conn = self.conn.clone();
        let token: Option<String> = conn
            .hget(&hash, &key.platform)
            .await
            .map_err(|e| SessionStoreError::Store(e.to_string()))?;
        Ok(token)
    }

    async fn refresh(&self, key: &SessionKey, ttl: Duration) -> Result<(), SessionStoreError> {
        let hash = self.key(key.principal_id);
        let mut conn = self.conn.clone();
        let applied: bool = conn
            .expire(&hash, ttl_secs(ttl))
            .await
            .map_err(|e| SessionStoreError::Store(e.to_string()))?;
        renewal(key, applied);
        Ok(())
    }

    async fn put(
        &self,
        key: &SessionKey,
        token: &str,
        ttl: Duration,
    ) -> Result<(), SessionStoreError> {
        let hash = self.key(key.principal_id);
        let mut conn = self.conn.clone();
        let _: () = redis::pipe()
            .atomic()
            .hset(&hash, &key.platform, token)
            .ignore()
            .expire(&hash, ttl_secs(ttl))
            .ignore()
            .query_async(&mut conn)
            .await
            .map_err(|e| SessionStoreError::Store(e.to_string()))?;
        Ok(())
    }

    async fn remove(&self, key: &SessionKey) -> Result<(), SessionStoreError> {
        let hash = self.key(key.principal_id);
        let mut conn = self.conn.clone();
        let _: () = conn
            .hdel(&hash, &key.platform)
            .await
            .map_err(|e| SessionStoreError::Store(e.to_string()))?;
        Ok(())
    }
}
