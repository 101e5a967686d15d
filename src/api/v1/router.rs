use super::auth::{AuthGuard, AuthMode};
use super::error::*;
use super::handler;
use crate::context::RequestContext;
use std::sync::Arc;
use warp::http::HeaderMap;
use warp::{Filter, reject};

pub fn routes(
    guard: Arc<AuthGuard>,
) -> impl Filter<Extract = (impl warp::Reply,), Error = warp::Rejection> + Clone {
    let whoami = warp::get()
        .and(warp::path("whoami"))
        .and(warp::path::end())
        .and(with_auth(guard.clone(), AuthMode::Required))
        .and_then(handler::whoami);

    let ping = warp::get()
        .and(warp::path("ping"))
        .and(warp::path::end())
        .and(with_auth(guard, AuthMode::OptionalPassthrough))
        .and_then(handler::ping);

    whoami.or(ping)
}

/// Admits the request through `guard` and hands the resulting context on.
pub fn with_auth(
    guard: Arc<AuthGuard>,
    mode: AuthMode,
) -> impl Filter<Extract = (RequestContext,), Error = warp::Rejection> + Clone {
    warp::header::headers_cloned().and_then(move |headers: HeaderMap| {
        let guard = guard.clone();
        async move {
            guard
                .admit(&headers, mode)
                .await
                .map_err(ApiErrorCode::from)
                .map_err(reject::custom)
        }
    })
}
