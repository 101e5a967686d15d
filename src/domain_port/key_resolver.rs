use crate::domain_model::SigningAlgorithm;

/// What the codec knows about a token before its key is chosen.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct TokenMetadata {
    pub algorithm: SigningAlgorithm,
    pub key_id: Option<String>,
}

/// Maps token metadata to the secret used to sign or verify it.
pub trait KeyResolver: Send + Sync {
    fn resolve(&self, metadata: &TokenMetadata) -> Result<&[u8], KeyError>;

    /// Key id stamped into the header of newly signed tokens.
    fn signing_key_id(&self) -> Option<&str> {
        None
    }
}

#[derive(Debug, thiserror::Error)]
pub enum KeyError {
    #[error("unknown key id: {0}")]
    UnknownKeyId(String),
    #[error("token carries no key id")]
    MissingKeyId,
    #[error("key material is empty")]
    Empty,
    #[error("key material is not valid base64: {0}")]
    InvalidBase64(#[from] base64::DecodeError),
}
