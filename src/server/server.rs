use crate::api::v1::{AuthGuard, HeaderTokenExtractor};
use crate::application_impl::*;
use crate::application_port::*;
use crate::domain_port::*;
use crate::infra_memory::*;
use crate::infra_redis::*;
use crate::logger::*;
use crate::settings::{self, Settings};
use anyhow::anyhow;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

pub struct Server {
    pub authenticator: Arc<dyn Authenticator>,
    pub issuer: Arc<SessionIssuer>,
    pub auth_guard: Arc<AuthGuard>,
    sweeper_handle: Mutex<Option<JoinHandle<()>>>,
    cancel: CancellationToken,
}

impl Server {
    pub async fn try_new(settings: &Settings) -> anyhow::Result<Self> {
        let cancel = CancellationToken::new();
        let mut sweeper_handle = None;

        let store: Arc<dyn SessionStore> = match settings.store.backend.as_str() {
            "redis" => {
                let url = settings
                    .store
                    .redis_url
                    .as_deref()
                    .ok_or_else(|| anyhow!("store.redis_url is required for the redis backend"))?;
                let redis_client = redis::Client::open(url)?;
                let redis_manager = redis_client.get_connection_manager().await?;
                Arc::new(RedisSessionStore::new(
                    redis_manager,
                    settings.store.prefix.clone(),
                ))
            }
            "memory" => {
                let store = Arc::new(MemorySessionStore::new());
                let every = Duration::from_secs(settings.store.sweep_interval_secs.max(1));
                sweeper_handle = Some(store.clone().spawn_sweeper(every, cancel.clone()));
                store
            }
            other => return Err(anyhow!("Unknown store backend: {}", other)),
        };

        let key = signing_key(&settings.auth)?;
        let token_codec: Arc<dyn TokenCodec> = Arc::new(JwtCodec::with_base64_key(
            key,
            CodecOptions {
                algorithm: settings.auth.algorithm,
                issuer: settings.auth.issuer.clone(),
                audience: settings.auth.audience.clone(),
                leeway_secs: settings.auth.leeway_secs,
            },
        )?);

        let renewal_ttl = Duration::from_secs(settings.auth.renewal_ttl_secs);
        let authenticator: Arc<dyn Authenticator> = match settings.auth.backend.as_str() {
            "fake" => Arc::new(FakeAuthenticator::new()),
            "real" => Arc::new(
                SessionAuthenticator::builder(store.clone())
                    .codec(token_codec.clone())
                    .renewal_ttl(renewal_ttl)
                    .renewal(settings.auth.renewal)
                    .claims_policy(settings.auth.claims)
                    .build()?,
            ),
            other => return Err(anyhow!("Unknown auth backend: {}", other)),
        };

        let issuer = Arc::new(SessionIssuer::new(
            token_codec,
            store,
            IssuerOptions {
                session_ttl: if renewal_ttl.is_zero() {
                    DEFAULT_RENEWAL_TTL
                } else {
                    renewal_ttl
                },
                token_ttl: None,
                issuer: settings.auth.issuer.clone(),
                audience: settings.auth.audience.clone(),
            },
        ));

        let extractor = Arc::new(HeaderTokenExtractor::new(
            &settings.auth.header,
            settings.auth.scheme.clone(),
        )?);
        let auth_guard = Arc::new(AuthGuard::new(
            authenticator.clone(),
            extractor,
            settings.auth.timeout_ms.map(Duration::from_millis),
        ));

        info!(
            store = %settings.store.backend,
            auth = %settings.auth.backend,
            algorithm = %settings.auth.algorithm,
            "server initialised"
        );

        Ok(Self {
            authenticator,
            issuer,
            auth_guard,
            sweeper_handle: Mutex::new(sweeper_handle),
            cancel,
        })
    }

    pub async fn shutdown(&self) {
        info!("server shutting down...");

        self.cancel.cancel();

        let handle = self.sweeper_handle.lock().ok().and_then(|mut lock| lock.take());
        if let Some(handle) = handle {
            let r = handle.await;
            info!("sweeper handle dropped: {:?}", r);
        }
    }
}

/// The key comes from `auth.signing_key_base64`, which the
/// `SESSIONGATE__AUTH__SIGNING_KEY_BASE64` variable overrides.
fn signing_key(auth: &settings::Auth) -> anyhow::Result<&str> {
    auth.signing_key_base64
        .as_deref()
        .filter(|key| !key.trim().is_empty())
        .ok_or_else(|| {
            anyhow!("no signing key: set SESSIONGATE__AUTH__SIGNING_KEY_BASE64 or auth.signing_key_base64")
        })
}
