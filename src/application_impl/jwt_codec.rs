use crate::application_impl::StaticKey;
use crate::application_port::{AuthError, ConfigError, TokenCodec};
use crate::domain_model::{ClaimSet, SigningAlgorithm};
use crate::domain_port::{KeyResolver, TokenMetadata};
use chrono::{DateTime, Utc};
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation};
use tracing::debug;

#[derive(Debug, Clone, Default)]
pub struct CodecOptions {
    pub algorithm: SigningAlgorithm,
    /// Expected `iss`. Unchecked when unset.
    pub issuer: Option<String>,
    /// Accepted `aud` values. Unchecked when empty.
    pub audience: Vec<String>,
    /// Clock skew tolerated on `exp` and `nbf`, in seconds.
    pub leeway_secs: u64,
}

pub struct JwtCodec {
    resolver: Box<dyn KeyResolver>,
    algorithm: SigningAlgorithm,
    validation: Validation,
    leeway_secs: i64,
}

fn jwt_algorithm(alg: SigningAlgorithm) -> Algorithm {
    match alg {
        SigningAlgorithm::HS256 => Algorithm::HS256,
        SigningAlgorithm::HS384 => Algorithm::HS384,
        SigningAlgorithm::HS512 => Algorithm::HS512,
    }
}

fn signing_algorithm(alg: Algorithm) -> Option<SigningAlgorithm> {
    match alg {
        Algorithm::HS256 => Some(SigningAlgorithm::HS256),
        Algorithm::HS384 => Some(SigningAlgorithm::HS384),
        Algorithm::HS512 => Some(SigningAlgorithm::HS512),
        _ => None,
    }
}

fn validation(options: &CodecOptions) -> Validation {
    let mut v = Validation::new(jwt_algorithm(options.algorithm));
    // Temporal claims are optional; only the ones present are enforced.
    v.required_spec_claims.clear();
    v.validate_exp = true;
    v.validate_nbf = true;
    v.leeway = options.leeway_secs;
    if let Some(issuer) = &options.issuer {
        v.set_issuer(&[issuer]);
    }
    if options.audience.is_empty() {
        v.validate_aud = false;
    } else {
        v.set_audience(&options.audience);
    }
    v
}

/// Enforces `nbf <= now <= exp` on the decoded claims. jsonwebtoken reads the
/// timestamps as unsigned and skips the check for values before 1970.
fn check_validity_window(
    claims: &ClaimSet,
    now: DateTime<Utc>,
    leeway_secs: i64,
) -> Result<(), AuthError> {
    let now = now.timestamp();
    if let Some(exp) = claims.registered.expires_at {
        if exp.timestamp() < now.saturating_sub(leeway_secs) {
            debug!(%exp, "token expired");
            return Err(AuthError::TokenExpired);
        }
    }
    if let Some(nbf) = claims.registered.not_before {
        if nbf.timestamp() > now.saturating_add(leeway_secs) {
            debug!(%nbf, "token not valid yet");
            return Err(AuthError::InvalidToken);
        }
    }
    Ok(())
}

impl JwtCodec {
    /// Fails when the resolver cannot produce a signing key for the configured
    /// algorithm.
    pub fn new(
        resolver: impl KeyResolver + 'static,
        options: CodecOptions,
    ) -> Result<Self, ConfigError> {
        let codec = JwtCodec {
            resolver: Box::new(resolver),
            algorithm: options.algorithm,
            validation: validation(&options),
            leeway_secs: i64::try_from(options.leeway_secs).unwrap_or(i64::MAX),
        };
        codec
            .resolver
            .resolve(&codec.signing_metadata())
            .map_err(|e| ConfigError::MissingSigningKey(e.to_string()))?;
        Ok(codec)
    }

    pub fn with_key(key: impl Into<Vec<u8>>, options: CodecOptions) -> Result<Self, ConfigError> {
        Self::new(StaticKey::new(key)?, options)
    }

    pub fn with_base64_key(key: &str, options: CodecOptions) -> Result<Self, ConfigError> {
        Self::new(StaticKey::from_base64(key)?, options)
    }

    fn signing_metadata(&self) -> TokenMetadata {
        TokenMetadata {
            algorithm: self.algorithm,
            key_id: self.resolver.signing_key_id().map(str::to_string),
        }
    }
}

impl TokenCodec for JwtCodec {
    fn encode(&self, claims: &ClaimSet) -> Result<String, AuthError> {
        if claims.principal_id.is_none() {
            return Err(AuthError::Signing("claims carry no principal".to_string()));
        }

        let metadata = self.signing_metadata();
        let key = self
            .resolver
            .resolve(&metadata)
            .map_err(|e| AuthError::Signing(e.to_string()))?;

        let mut header = Header::new(jwt_algorithm(metadata.algorithm));
        header.kid = metadata.key_id;
        jsonwebtoken::encode(&header, claims, &EncodingKey::from_secret(key))
            .map_err(|e| AuthError::Signing(e.to_string()))
    }

    fn decode(&self, token: &str) -> Result<ClaimSet, AuthError> {
        let header = jsonwebtoken::decode_header(token).map_err(|e| {
            debug!(error = %e, "malformed token header");
            AuthError::InvalidToken
        })?;

        let algorithm = signing_algorithm(header.alg)
            .filter(|alg| *alg == self.algorithm)
            .ok_or_else(|| {
                debug!(alg = ?header.alg, expected = %self.algorithm, "unexpected signing method");
                AuthError::InvalidToken
            })?;

        let metadata = TokenMetadata {
            algorithm,
            key_id: header.kid,
        };
        let key = self.resolver.resolve(&metadata).map_err(|e| {
            debug!(error = %e, "no verification key for token");
            AuthError::InvalidToken
        })?;

        let data =
            jsonwebtoken::decode::<ClaimSet>(token, &DecodingKey::from_secret(key), &self.validation)
                .map_err(|e| match e.kind() {
                    ErrorKind::ExpiredSignature => AuthError::TokenExpired,
                    _ => {
                        debug!(error = %e, "token rejected");
                        AuthError::InvalidToken
                    }
                })?;

        check_validity_window(&data.claims, Utc::now(), self.leeway_secs)?;
        if data.claims.principal_id.is_none() {
            return Err(AuthError::InvalidToken);
        }
        Ok(data.claims)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application_impl::RotatingKeys;
    use crate::domain_model::{PrincipalId, RegisteredClaims};
    use base64::Engine;
    use base64::engine::general_purpose::URL_SAFE_NO_PAD;
    use chrono::Duration;

    fn now() -> DateTime<Utc> {
        DateTime::from_timestamp(Utc::now().timestamp(), 0).unwrap()
    }

    fn codec() -> JwtCodec {
        JwtCodec::with_key(b"helloworld".to_vec(), CodecOptions::default()).unwrap()
    }

    #[test]
    fn round_trip_preserves_claims() {
        let codec = codec();
        let claims = ClaimSet {
            registered: RegisteredClaims {
                issuer: Some("sessiongate".into()),
                subject: Some("100".into()),
                audience: vec!["app".into(), "web".into()],
                expires_at: Some(now() + Duration::hours(1)),
                not_before: Some(now() - Duration::minutes(1)),
                issued_at: Some(now()),
                token_id: Some("jti-1".into()),
            },
            principal_id: PrincipalId(100),
            platform: "ios".into(),
        };

        let token = codec.encode(&claims).unwrap();
        assert_eq!(codec.decode(&token).unwrap(), claims);
    }

    #[test]
    fn round_trip_without_temporal_fields() {
        let codec = codec();
        let claims = ClaimSet::new(PrincipalId(5), "");
        let token = codec.encode(&claims).unwrap();
        assert_eq!(codec.decode(&token).unwrap(), claims);
    }

    #[test]
    fn tampered_signature_is_invalid() {
        let codec = codec();
        let token = codec.encode(&ClaimSet::new(PrincipalId(1), "web")).unwrap();
        let sig_start = token.rfind('.').unwrap() + 1;

        for i in sig_start..token.len() {
            let mut bytes = token.clone().into_bytes();
            bytes[i] = if bytes[i] == b'A' { b'B' } else { b'A' };
            let tampered = String::from_utf8(bytes).unwrap();
            assert_eq!(codec.decode(&tampered), Err(AuthError::InvalidToken), "byte {i}");
        }
    }

    #[test]
    fn past_expiry_is_expired() {
        let codec = codec();
        let mut claims = ClaimSet::new(PrincipalId(1), "ios");
        claims.registered.expires_at = Some(now() - Duration::hours(1));
        let token = codec.encode(&claims).unwrap();
        assert_eq!(codec.decode(&token), Err(AuthError::TokenExpired));
    }

    #[test]
    fn pre_epoch_expiry_is_expired() {
        let codec = codec();
        let mut claims = ClaimSet::new(PrincipalId(1), "ios");
        claims.registered.expires_at = DateTime::from_timestamp(-3600, 0);
        let token = codec.encode(&claims).unwrap();
        assert_eq!(codec.decode(&token), Err(AuthError::TokenExpired));
    }

    #[test]
    fn pre_epoch_not_before_is_honoured() {
        let codec = codec();
        let mut claims = ClaimSet::new(PrincipalId(1), "ios");
        claims.registered.not_before = DateTime::from_timestamp(-3600, 0);
        claims.registered.expires_at = Some(now() + Duration::hours(1));
        let token = codec.encode(&claims).unwrap();
        assert_eq!(codec.decode(&token).unwrap(), claims);
    }

    #[test]
    fn validity_window_applies_leeway() {
        let at = now();
        let mut claims = ClaimSet::new(PrincipalId(1), "ios");
        claims.registered.expires_at = Some(at - Duration::seconds(30));
        assert_eq!(
            check_validity_window(&claims, at, 0),
            Err(AuthError::TokenExpired)
        );
        assert_eq!(check_validity_window(&claims, at, 60), Ok(()));

        claims.registered.expires_at = None;
        claims.registered.not_before = Some(at + Duration::seconds(30));
        assert_eq!(
            check_validity_window(&claims, at, 0),
            Err(AuthError::InvalidToken)
        );
        assert_eq!(check_validity_window(&claims, at, 60), Ok(()));
    }

    #[test]
    fn future_not_before_is_invalid() {
        let codec = codec();
        let mut claims = ClaimSet::new(PrincipalId(1), "ios");
        claims.registered.expires_at = Some(now() + Duration::hours(2));
        claims.registered.not_before = Some(now() + Duration::hours(1));
        let token = codec.encode(&claims).unwrap();
        assert_eq!(codec.decode(&token), Err(AuthError::InvalidToken));
    }

    #[test]
    fn wrong_key_is_invalid() {
        let token = codec().encode(&ClaimSet::new(PrincipalId(1), "ios")).unwrap();
        let other = JwtCodec::with_key(b"otherkey".to_vec(), CodecOptions::default()).unwrap();
        assert_eq!(other.decode(&token), Err(AuthError::InvalidToken));
    }

    #[test]
    fn other_signing_method_is_invalid() {
        let token = codec().encode(&ClaimSet::new(PrincipalId(1), "ios")).unwrap();
        let hs512 = JwtCodec::with_key(
            b"helloworld".to_vec(),
            CodecOptions {
                algorithm: SigningAlgorithm::HS512,
                ..CodecOptions::default()
            },
        )
        .unwrap();
        assert_eq!(hs512.decode(&token), Err(AuthError::InvalidToken));
    }

    #[test]
    fn unsigned_token_is_invalid() {
        let header = URL_SAFE_NO_PAD.encode(br#"{"alg":"none","typ":"JWT"}"#);
        let payload = URL_SAFE_NO_PAD.encode(br#"{"uid":1,"plf":"ios"}"#);
        let token = format!("{header}.{payload}.");
        assert_eq!(codec().decode(&token), Err(AuthError::InvalidToken));
    }

    #[test]
    fn garbage_is_invalid() {
        assert_eq!(codec().decode("not-a-token"), Err(AuthError::InvalidToken));
    }

    #[test]
    fn encode_requires_principal() {
        let res = codec().encode(&ClaimSet::default());
        assert!(matches!(res, Err(AuthError::Signing(_))));
    }

    #[test]
    fn issuer_and_audience_are_checked_when_configured() {
        let strict = JwtCodec::with_key(
            b"helloworld".to_vec(),
            CodecOptions {
                issuer: Some("sessiongate".into()),
                audience: vec!["app".into()],
                ..CodecOptions::default()
            },
        )
        .unwrap();

        let mut claims = ClaimSet::new(PrincipalId(3), "web");
        claims.registered.issuer = Some("sessiongate".into());
        claims.registered.audience = vec!["app".into()];
        let good = strict.encode(&claims).unwrap();
        assert_eq!(strict.decode(&good).unwrap(), claims);

        claims.registered.audience = vec!["elsewhere".into()];
        let wrong_aud = strict.encode(&claims).unwrap();
        assert_eq!(strict.decode(&wrong_aud), Err(AuthError::InvalidToken));

        claims.registered.audience = vec!["app".into()];
        claims.registered.issuer = Some("impostor".into());
        let wrong_iss = strict.encode(&claims).unwrap();
        assert_eq!(strict.decode(&wrong_iss), Err(AuthError::InvalidToken));
    }

    #[test]
    fn rotated_keys_verify_by_kid() {
        let old = JwtCodec::new(
            RotatingKeys::new("k1", [("k1", b"first".to_vec())]).unwrap(),
            CodecOptions::default(),
        )
        .unwrap();
        let rotated = JwtCodec::new(
            RotatingKeys::new("k2", [("k1", b"first".to_vec()), ("k2", b"second".to_vec())])
                .unwrap(),
            CodecOptions::default(),
        )
        .unwrap();
        let retired = JwtCodec::new(
            RotatingKeys::new("k2", [("k2", b"second".to_vec())]).unwrap(),
            CodecOptions::default(),
        )
        .unwrap();

        let claims = ClaimSet::new(PrincipalId(8), "android");
        let legacy = old.encode(&claims).unwrap();
        assert_eq!(rotated.decode(&legacy).unwrap(), claims);
        assert_eq!(retired.decode(&legacy), Err(AuthError::InvalidToken));

        let fresh = rotated.encode(&claims).unwrap();
        assert_eq!(
            jsonwebtoken::decode_header(&fresh).unwrap().kid.as_deref(),
            Some("k2")
        );
        assert_eq!(retired.decode(&fresh).unwrap(), claims);
    }

    #[test]
    fn bad_base64_key_fails_construction() {
        let res = JwtCodec::with_base64_key("%%%", CodecOptions::default());
        assert!(matches!(res, Err(ConfigError::Key(_))));
    }
}
