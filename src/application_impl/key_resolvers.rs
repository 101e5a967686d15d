use crate::domain_port::{KeyError, KeyResolver, TokenMetadata};
use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use std::collections::HashMap;
use std::fmt;

/// One secret for every token.
pub struct StaticKey {
    key: Vec<u8>,
}

impl StaticKey {
    pub fn new(key: impl Into<Vec<u8>>) -> Result<Self, KeyError> {
        let key = key.into();
        if key.is_empty() {
            return Err(KeyError::Empty);
        }
        Ok(StaticKey { key })
    }

    pub fn from_base64(encoded: &str) -> Result<Self, KeyError> {
        Self::new(STANDARD.decode(encoded.trim())?)
    }
}

impl fmt::Debug for StaticKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StaticKey")
            .field("len", &self.key.len())
            .finish()
    }
}

impl KeyResolver for StaticKey {
    fn resolve(&self, _metadata: &TokenMetadata) -> Result<&[u8], KeyError> {
        Ok(&self.key)
    }
}

/// Secrets addressed by `kid`. New tokens are signed with `current`; older
/// keys stay around for verification until they are dropped from the set.
pub struct RotatingKeys {
    current: String,
    keys: HashMap<String, Vec<u8>>,
}

impl RotatingKeys {
    pub fn new<I, K>(current: impl Into<String>, keys: I) -> Result<Self, KeyError>
    where
        I: IntoIterator<Item = (K, Vec<u8>)>,
        K: Into<String>,
    {
        let current = current.into();
        let mut map = HashMap::new();
        for (kid, key) in keys {
            if key.is_empty() {
                return Err(KeyError::Empty);
            }
            map.insert(kid.into(), key);
        }
        if !map.contains_key(&current) {
            return Err(KeyError::UnknownKeyId(current));
        }
        Ok(RotatingKeys { current, keys: map })
    }
}

impl fmt::Debug for RotatingKeys {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut kids: Vec<&String> = self.keys.keys().collect();
        kids.sort();
        f.debug_struct("RotatingKeys")
            .field("current", &self.current)
            .field("kids", &kids)
            .finish()
    }
}

impl KeyResolver for RotatingKeys {
    fn resolve(&self, metadata: &TokenMetadata) -> Result<&[u8], KeyError> {
        let kid = metadata.key_id.as_deref().ok_or(KeyError::MissingKeyId)?;
        self.keys
            .get(kid)
            .map(Vec::as_slice)
            .ok_or_else(|| KeyError::UnknownKeyId(kid.to_string()))
    }

    fn signing_key_id(&self) -> Option<&str> {
        Some(&self.current)
    }
}
