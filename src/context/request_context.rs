use crate::domain_model::{ClaimSet, PrincipalId};
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::Instant;
use tokio_util::sync::CancellationToken;

#[derive(Debug, Clone)]
pub struct RequestContext {
    cancel: CancellationToken,
    deadline: Option<Instant>,
    principal: Option<Arc<ClaimSet>>,
}

#[derive(Debug, Clone, Copy, Eq, PartialEq, thiserror::Error)]
pub enum Interrupted {
    #[error("request cancelled")]
    Cancelled,
    #[error("request deadline exceeded")]
    DeadlineExceeded,
}

impl Default for RequestContext {
    fn default() -> Self {
        Self::new()
    }
}

impl RequestContext {
    pub fn new() -> Self {
        RequestContext {
            cancel: CancellationToken::new(),
            deadline: None,
            principal: None,
        }
    }

    pub fn with_cancellation(mut self, cancel: CancellationToken) -> Self {
        self.cancel = cancel;
        self
    }

    pub fn with_deadline(mut self, deadline: Instant) -> Self {
        self.deadline = Some(deadline);
        self
    }

    pub fn with_timeout(self, timeout: Duration) -> Self {
        self.with_deadline(Instant::now() + timeout)
    }

    pub fn cancellation_token(&self) -> &CancellationToken {
        &self.cancel
    }

    pub fn deadline(&self) -> Option<Instant> {
        self.deadline
    }

    /// Returns a derived context carrying `claims`; `self` is left as is.
    pub fn attach_principal(&self, claims: ClaimSet) -> RequestContext {
        RequestContext {
            cancel: self.cancel.clone(),
            deadline: self.deadline,
            principal: Some(Arc::new(claims)),
        }
    }

    pub fn read_principal(&self) -> Option<&ClaimSet> {
        self.principal.as_deref()
    }

    /// The authenticated principal, or [`PrincipalId::NONE`] when nobody is
    /// attached.
    pub fn principal_id(&self) -> PrincipalId {
        self.read_principal()
            .map(|claims| claims.principal_id)
            .unwrap_or(PrincipalId::NONE)
    }

    /// Drives `fut` until it completes, the context is cancelled, or the
    /// deadline passes, whichever comes first.
    pub async fn run<F: Future>(&self, fut: F) -> Result<F::Output, Interrupted> {
        let guarded = async {
            tokio::select! {
                biased;
                _ = self.cancel.cancelled() => Err(Interrupted::Cancelled),
                out = fut => Ok(out),
            }
        };
        match self.deadline {
            Some(deadline) => tokio::time::timeout_at(deadline, guarded)
                .await
                .unwrap_or(Err(Interrupted::DeadlineExceeded)),
            None => guarded.await,
        }
    }
}
