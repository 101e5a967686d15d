use crate::application_port::{ClaimsPolicy, RenewalPolicy};
use crate::domain_model::SigningAlgorithm;
use anyhow::{Result, anyhow};
use config::{Config, Environment, File};
use serde::Deserialize;
use std::fmt;

#[derive(Debug, Deserialize)]
pub struct Settings {
    pub auth: Auth,
    pub store: Store,
    pub http: Http,
    pub log: Log,
}

#[derive(Deserialize)]
pub struct Auth {
    pub backend: String, // "fake" or "real"
    #[serde(default)]
    pub algorithm: SigningAlgorithm,
    /// Base64 signing key. Supply it through `SESSIONGATE__AUTH__SIGNING_KEY_BASE64`
    /// outside local development.
    #[serde(default)]
    pub signing_key_base64: Option<String>,
    #[serde(default)]
    pub issuer: Option<String>,
    #[serde(default)]
    pub audience: Vec<String>,
    #[serde(default)]
    pub leeway_secs: u64,
    pub renewal_ttl_secs: u64,
    #[serde(default)]
    pub renewal: RenewalPolicy,
    #[serde(default)]
    pub claims: ClaimsPolicy,
    #[serde(default = "default_header")]
    pub header: String,
    #[serde(default = "default_scheme")]
    pub scheme: String,
    #[serde(default)]
    pub timeout_ms: Option<u64>,
}

// Hand-written so the signing key never reaches logs.
impl fmt::Debug for Auth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Auth")
            .field("backend", &self.backend)
            .field("algorithm", &self.algorithm)
            .field(
                "signing_key_base64",
                &self.signing_key_base64.as_ref().map(|_| "<redacted>"),
            )
            .field("issuer", &self.issuer)
            .field("audience", &self.audience)
            .field("leeway_secs", &self.leeway_secs)
            .field("renewal_ttl_secs", &self.renewal_ttl_secs)
            .field("renewal", &self.renewal)
            .field("claims", &self.claims)
            .field("header", &self.header)
            .field("scheme", &self.scheme)
            .field("timeout_ms", &self.timeout_ms)
            .finish()
    }
}

#[derive(Debug, Deserialize)]
pub struct Store {
    pub backend: String, // "redis" or "memory"
    #[serde(default)]
    pub redis_url: Option<String>,
    pub prefix: String,
    pub sweep_interval_secs: u64,
}

#[derive(Debug, Deserialize)]
pub struct Http {
    pub address: String,
}

#[derive(Debug, Deserialize)]
pub struct Log {
    pub filter: String,
}

fn default_header() -> String {
    "Authorization".to_string()
}

fn default_scheme() -> String {
    "Bearer ".to_string()
}

#[cfg(debug_assertions)]
const SETTINGS_PATH: &str = "settings/dev.toml";
#[cfg(not(debug_assertions))]
const SETTINGS_PATH: &str = "settings/release.toml";

/// Reads the TOML file, then lets `SESSIONGATE__<SECTION>__<KEY>` variables
/// override individual values.
pub fn parse_settings(path: Option<&str>) -> Result<Settings> {
    load_settings(path.unwrap_or(SETTINGS_PATH), environment())
}

fn environment() -> Environment {
    Environment::with_prefix("SESSIONGATE").separator("__")
}

fn load_settings(path: &str, env: Environment) -> Result<Settings> {
    let settings: Settings = Config::builder()
        .add_source(File::with_name(path))
        .add_source(env)
        .build()
        .map_err(|e| anyhow!(e))?
        .try_deserialize()
        .map_err(|e| anyhow!(e))?;

    Ok(settings)
}
