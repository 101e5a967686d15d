use super::error::*;
use crate::context::RequestContext;
use crate::domain_model::PrincipalId;
use serde::Serialize;

#[derive(Debug, Serialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    pub data: Option<T>,
    pub error: Option<ApiError>,
}

impl<T: Serialize> ApiResponse<T> {
    pub fn ok(data: T) -> Self {
        ApiResponse {
            success: true,
            data: Some(data),
            error: None,
        }
    }

    pub fn err(code: ApiErrorCode, message: impl Into<String>) -> Self {
        ApiResponse {
            success: false,
            data: None,
            error: Some(ApiError {
                code,
                message: message.into(),
            }),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct WhoAmIResponse {
    pub principal_id: PrincipalId,
    pub platform: String,
    pub expires_at: Option<i64>,
}

pub async fn whoami(ctx: RequestContext) -> Result<impl warp::Reply, warp::Rejection> {
    let claims = ctx
        .read_principal()
        .ok_or(ApiErrorCode::Unauthorized)
        .map_err(warp::reject::custom)?;

    let response = WhoAmIResponse {
        principal_id: claims.principal_id,
        platform: claims.platform.clone(),
        expires_at: claims.registered.expires_at.map(|at| at.timestamp()),
    };
    Ok(warp::reply::json(&ApiResponse::ok(response)))
}

#[derive(Debug, Serialize)]
pub struct PingResponse {
    pub principal_id: PrincipalId,
}

pub async fn ping(ctx: RequestContext) -> Result<impl warp::Reply, warp::Rejection> {
    let response = PingResponse {
        principal_id: ctx.principal_id(),
    };
    Ok(warp::reply::json(&ApiResponse::ok(response)))
}
