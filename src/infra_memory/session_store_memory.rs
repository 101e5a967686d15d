use crate::domain_model::SessionKey;
use crate::domain_port::*;
use dashmap::DashMap;
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio::time::Instant;
use tokio_util::sync::CancellationToken;
use tracing::debug;

struct Record {
    token: String,
    expires_at: Instant,
}

/// Process-local session store. Expired records are invisible immediately and
/// physically dropped on the next touch or sweep. Contents do not survive a
/// restart.
#[derive(Default)]
pub struct MemorySessionStore {
    records: DashMap<SessionKey, Record>,
}

impl MemorySessionStore {
    pub fn new() -> Self {
        MemorySessionStore {
            records: DashMap::new(),
        }
    }

    /// Time left before the record lapses, `None` when absent or expired.
    pub fn remaining_ttl(&self, key: &SessionKey) -> Option<Duration> {
        let now = Instant::now();
        self.records
            .get(key)
            .filter(|record| record.expires_at > now)
            .map(|record| record.expires_at - now)
    }

    /// Drops every expired record and returns how many went.
    pub fn purge_expired(&self) -> usize {
        let now = Instant::now();
        let before = self.records.len();
        self.records.retain(|_, record| record.expires_at > now);
        before.saturating_sub(self.records.len())
    }

    pub fn spawn_sweeper(self: Arc<Self>, every: Duration, cancel: CancellationToken) -> JoinHandle<()> {
        tokio::spawn(async move {
            let mut interval = tokio::time::interval(every);
            loop {
                tokio::select! {
                    _ = cancel.cancelled() => break,
                    _ = interval.tick() => {
                        let purged = self.purge_expired();
                        if purged > 0 {
                            debug!(purged, "expired sessions swept");
                        }
                    }
                }
            }
        })
    }
}

#[async_trait::async_trait]
impl SessionStore for MemorySessionStore {
    async fn get(&self, key: &SessionKey) -> Result<Option<String>, SessionStoreError> {
        let now = Instant::now();
        if let Some(record) = self.records.get(key) {
            if record.expires_at > now {
                return Ok(Some(record.token.clone()));
            }
        }
        self.records.remove_if(key, |_, record| record.expires_at <= now);
        Ok(None)
    }

    async fn refresh(&self, key: &SessionKey, ttl: Duration) -> Result<(), SessionStoreError> {
        let now = Instant::now();
        if let Some(mut record) = self.records.get_mut(key) {
            if record.expires_at > now {
                record.expires_at = now + ttl;
            }
        }
        Ok(())
    }

    async fn put(
        &self,
        key: &SessionKey,
        token: &str,
        ttl: Duration,
    ) -> Result<(), SessionStoreError> {
        self.records.insert(
            key.clone(),
            Record {
                token: token.to_string(),
                expires_at: Instant::now() + ttl,
            },
        );
        Ok(())
    }

    async fn remove(&self, key: &SessionKey) -> Result<(), SessionStoreError> {
        self.records.remove(key);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain_model::PrincipalId;

    fn key() -> SessionKey {
        SessionKey::new(PrincipalId(1), "ios")
    }

    #[tokio::test(start_paused = true)]
    async fn records_lapse_after_ttl() {
        let store = MemorySessionStore::new();
        store.put(&key(), "t1", Duration::from_secs(10)).await.unwrap();
        assert_eq!(store.get(&key()).await.unwrap().as_deref(), Some("t1"));

        tokio::time::advance(Duration::from_secs(10)).await;
        assert_eq!(store.get(&key()).await.unwrap(), None);
        assert_eq!(store.remaining_ttl(&key()), None);
    }

    #[tokio::test(start_paused = true)]
    async fn refresh_resets_window_but_not_lapsed_records() {
        let store = MemorySessionStore::new();
        store.put(&key(), "t1", Duration::from_secs(10)).await.unwrap();

        tokio::time::advance(Duration::from_secs(7)).await;
        store.refresh(&key(), Duration::from_secs(10)).await.unwrap();
        assert_eq!(store.remaining_ttl(&key()), Some(Duration::from_secs(10)));

        tokio::time::advance(Duration::from_secs(11)).await;
        store.refresh(&key(), Duration::from_secs(10)).await.unwrap();
        assert_eq!(store.get(&key()).await.unwrap(), None);
    }

    #[tokio::test]
    async fn refresh_of_missing_key_is_a_no_op() {
        let store = MemorySessionStore::new();
        store.refresh(&key(), Duration::from_secs(10)).await.unwrap();
        assert_eq!(store.get(&key()).await.unwrap(), None);
    }

    #[tokio::test]
    async fn platforms_are_separate_buckets() {
        let store = MemorySessionStore::new();
        let web = SessionKey::new(PrincipalId(1), "web");
        let blank = SessionKey::new(PrincipalId(1), "");
        store.put(&web, "w", Duration::from_secs(60)).await.unwrap();
        store.put(&blank, "b", Duration::from_secs(60)).await.unwrap();
        store.remove(&web).await.unwrap();

        assert_eq!(store.get(&web).await.unwrap(), None);
        assert_eq!(store.get(&blank).await.unwrap().as_deref(), Some("b"));
    }

    #[tokio::test(start_paused = true)]
    async fn purge_drops_only_expired() {
        let store = MemorySessionStore::new();
        let other = SessionKey::new(PrincipalId(2), "ios");
        store.put(&key(), "short", Duration::from_secs(1)).await.unwrap();
        store.put(&other, "long", Duration::from_secs(60)).await.unwrap();

        tokio::time::advance(Duration::from_secs(2)).await;
        assert_eq!(store.purge_expired(), 1);
        assert_eq!(store.get(&other).await.unwrap().as_deref(), Some("long"));
    }
}
