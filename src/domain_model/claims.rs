use crate::domain_model::PrincipalId;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};

/// RFC 7519 registered claims. Unset fields carry no constraint and are left
/// out of the signed payload.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegisteredClaims {
    #[serde(rename = "iss", default, skip_serializing_if = "Option::is_none")]
    pub issuer: Option<String>,

    #[serde(rename = "sub", default, skip_serializing_if = "Option::is_none")]
    pub subject: Option<String>,

    #[serde(
        rename = "aud",
        default,
        skip_serializing_if = "Vec::is_empty",
        deserialize_with = "one_or_many"
    )]
    pub audience: Vec<String>,

    #[serde(
        rename = "exp",
        default,
        skip_serializing_if = "Option::is_none",
        with = "chrono::serde::ts_seconds_option"
    )]
    pub expires_at: Option<DateTime<Utc>>,

    #[serde(
        rename = "nbf",
        default,
        skip_serializing_if = "Option::is_none",
        with = "chrono::serde::ts_seconds_option"
    )]
    pub not_before: Option<DateTime<Utc>>,

    #[serde(
        rename = "iat",
        default,
        skip_serializing_if = "Option::is_none",
        with = "chrono::serde::ts_seconds_option"
    )]
    pub issued_at: Option<DateTime<Utc>>,

    #[serde(rename = "jti", default, skip_serializing_if = "Option::is_none")]
    pub token_id: Option<String>,
}

/// The payload of a session token: who it belongs to, which device bucket it
/// was issued for, and the registered claims bounding its validity.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClaimSet {
    #[serde(flatten)]
    pub registered: RegisteredClaims,
    #[serde(rename = "uid")]
    pub principal_id: PrincipalId,
    #[serde(rename = "plf", default)]
    pub platform: String,
}

impl ClaimSet {
    pub fn new(principal_id: PrincipalId, platform: impl Into<String>) -> Self {
        ClaimSet {
            registered: RegisteredClaims::default(),
            principal_id,
            platform: platform.into(),
        }
    }

    /// Keeps only the principal, dropping everything else the token carried.
    pub fn principal_only(&self) -> Self {
        ClaimSet {
            registered: RegisteredClaims::default(),
            principal_id: self.principal_id,
            platform: String::new(),
        }
    }
}

// `aud` may be a single string or an array on the wire.
fn one_or_many<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum OneOrMany {
        One(String),
        Many(Vec<String>),
    }

    Ok(match Option::<OneOrMany>::deserialize(deserializer)? {
        None => Vec::new(),
        Some(OneOrMany::One(aud)) => vec![aud],
        Some(OneOrMany::Many(aud)) => aud,
    })
}
