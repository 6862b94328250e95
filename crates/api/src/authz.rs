//! HTTP enforcement of the route authorization policy.
//!
//! Runs after the interceptor, so the request already carries its
//! [`AuthContext`]. Denials become responses here; handlers never see them.

use std::sync::Arc;

use axum::{
    extract::{Request, State},
    middleware::Next,
    response::{IntoResponse, Response},
};

use tokengate_auth::AuthorizationPolicy;

use crate::app::errors::ApiError;
use crate::context::AuthContext;

#[derive(Clone)]
pub struct PolicyState {
    pub policy: Arc<AuthorizationPolicy>,
}

pub async fn enforce_policy(State(state): State<PolicyState>, req: Request, next: Next) -> Response {
    let decision = {
        let context = req.extensions().get::<AuthContext>();
        state
            .policy
            .authorize(req.uri().path(), context.and_then(AuthContext::principal))
    };

    match decision {
        Ok(()) => next.run(req).await,
        Err(e) => {
            tracing::info!(path = %req.uri().path(), error = %e, "request denied by policy");
            ApiError::AccessDenied(e).into_response()
        }
    }
}
