use crate::application_port::{AuthError, Authenticator};
use crate::context::RequestContext;
use serde::Deserialize;
use std::sync::Arc;
use std::time::Duration;
use warp::http::header::{AUTHORIZATION, InvalidHeaderName};
use warp::http::{HeaderMap, HeaderName};

/// What the guard does with a request that presents no token at all.
#[derive(Debug, Default, Clone, Copy, Eq, PartialEq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AuthMode {
    /// Reject it as unauthorized.
    #[default]
    Required,
    /// Let it through without a principal. A token that is present is still
    /// checked.
    OptionalPassthrough,
}

/// Pulls the raw token out of request headers. An empty string means no
/// token was presented.
pub trait TokenExtractor: Send + Sync {
    fn extract(&self, headers: &HeaderMap) -> String;
}

/// Reads one header and strips a fixed scheme prefix such as `"Bearer "`.
#[derive(Debug, Clone)]
pub struct HeaderTokenExtractor {
    header: HeaderName,
    scheme: String,
}

impl Default for HeaderTokenExtractor {
    fn default() -> Self {
        HeaderTokenExtractor {
            header: AUTHORIZATION,
            scheme: "Bearer ".to_string(),
        }
    }
}

impl HeaderTokenExtractor {
    pub fn new(header: &str, scheme: impl Into<String>) -> Result<Self, InvalidHeaderName> {
        Ok(HeaderTokenExtractor {
            header: HeaderName::from_bytes(header.as_bytes())?,
            scheme: scheme.into(),
        })
    }
}

impl TokenExtractor for HeaderTokenExtractor {
    fn extract(&self, headers: &HeaderMap) -> String {
        let Some(value) = headers.get(&self.header).and_then(|v| v.to_str().ok()) else {
            return String::new();
        };
        let n = self.scheme.len();
        if value.len() <= n {
            return String::new();
        }
        match value.get(..n) {
            Some(scheme) if scheme.eq_ignore_ascii_case(&self.scheme) => value[n..].to_string(),
            _ => String::new(),
        }
    }
}

/// Transport-side front of the authenticator: extracts the token, applies the
/// request timeout and attaches the principal to a fresh request context.
pub struct AuthGuard {
    authenticator: Arc<dyn Authenticator>,
    extractor: Arc<dyn TokenExtractor>,
    timeout: Option<Duration>,
}

impl AuthGuard {
    pub fn new(
        authenticator: Arc<dyn Authenticator>,
        extractor: Arc<dyn TokenExtractor>,
        timeout: Option<Duration>,
    ) -> Self {
        AuthGuard {
            authenticator,
            extractor,
            timeout,
        }
    }

    pub async fn admit(
        &self,
        headers: &HeaderMap,
        mode: AuthMode,
    ) -> Result<RequestContext, AuthError> {
        let token = self.extractor.extract(headers);
        let ctx = match self.timeout {
            Some(timeout) => RequestContext::new().with_timeout(timeout),
            None => RequestContext::new(),
        };
        if token.is_empty() && mode == AuthMode::OptionalPassthrough {
            return Ok(ctx);
        }
        let claims = self.authenticator.authenticate(&ctx, &token).await?;
        Ok(ctx.attach_principal(claims))
    }
}
