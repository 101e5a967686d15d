use crate::application_port::AuthError;
use crate::domain_model::ClaimSet;

/// Stateless transform between a claim set and its signed string form.
pub trait TokenCodec: Send + Sync {
    fn encode(&self, claims: &ClaimSet) -> Result<String, AuthError>;

    /// Fails with [`AuthError::TokenExpired`] only when `exp` has passed and
    /// with [`AuthError::InvalidToken`] for every other verification failure.
    fn decode(&self, token: &str) -> Result<ClaimSet, AuthError>;
}
