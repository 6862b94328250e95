//! HTTP API application wiring (Axum router + service wiring).
//!
//! - `services.rs`: member store, password hashing, authentication manager, signup/login
//! - `routes/`: HTTP routes + handlers
//! - `dto.rs`: request/response DTOs and the response envelope
//! - `errors.rs`: the single error-to-response mapping

use std::sync::Arc;

use axum::{Extension, Router, routing::get};
use tower::ServiceBuilder;

use tokengate_auth::{AuthorizationPolicy, TokenCodec};

use crate::authz::{self, PolicyState};
use crate::config::ApiConfig;
use crate::middleware::{self, AuthState};

pub mod dto;
pub mod errors;
pub mod routes;
pub mod services;

/// Build the full HTTP router (public entrypoint used by `main.rs`).
pub fn build_app(config: ApiConfig) -> Router {
    let codec = Arc::new(TokenCodec::new(config.signing_key));
    let services = Arc::new(services::build_services(codec.clone(), config.bcrypt_cost));
    build_router(codec, services, AuthorizationPolicy::default_rules())
}

/// Assemble routes and the two-stage auth pipeline around them.
///
/// Every request passes the interceptor first, then the policy gate.
pub fn build_router(
    codec: Arc<TokenCodec>,
    services: Arc<services::AppServices>,
    policy: AuthorizationPolicy,
) -> Router {
    let auth_state = AuthState { codec };
    let policy_state = PolicyState {
        policy: Arc::new(policy),
    };

    Router::new()
        .route("/health", get(routes::system::health))
        .merge(routes::router())
        .layer(Extension(services))
        .layer(
            ServiceBuilder::new()
                .layer(axum::middleware::from_fn_with_state(
                    auth_state,
                    middleware::authenticate_request,
                ))
                .layer(axum::middleware::from_fn_with_state(
                    policy_state,
                    authz::enforce_policy,
                )),
        )
}
