use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{Extension, rejection::JsonRejection},
    routing::{get, post},
};

use tokengate_auth::{Authority, TokenInfo};

use crate::app::dto::{BaseResponse, LoginRequest, MemberInfo, SignupRequest};
use crate::app::errors::ApiError;
use crate::app::services::AppServices;
use crate::context::AuthContext;

pub fn router() -> Router {
    Router::new()
        .route("/signup", post(signup))
        .route("/login", post(login))
        .route("/info", get(info))
}

pub async fn signup(
    Extension(services): Extension<Arc<AppServices>>,
    body: Result<Json<SignupRequest>, JsonRejection>,
) -> Result<Json<BaseResponse<()>>, ApiError> {
    let Json(req) = body?;
    let message = services.members.signup(req).await?;
    Ok(Json(BaseResponse::message(message)))
}

pub async fn login(
    Extension(services): Extension<Arc<AppServices>>,
    body: Result<Json<LoginRequest>, JsonRejection>,
) -> Result<Json<BaseResponse<TokenInfo>>, ApiError> {
    let Json(req) = body?;
    let token = services.members.login(req).await?;
    Ok(Json(BaseResponse::ok(token)))
}

/// Identity as carried by the caller's own token; no storage lookup.
pub async fn info(auth: AuthContext) -> Result<Json<BaseResponse<MemberInfo>>, ApiError> {
    let principal = auth.principal().ok_or(ApiError::Unauthenticated)?;
    Ok(Json(BaseResponse::ok(MemberInfo {
        subject: principal.subject().to_string(),
        authorities: principal
            .authorities()
            .iter()
            .map(Authority::as_str)
            .map(str::to_string)
            .collect(),
    })))
}
