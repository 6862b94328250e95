use std::collections::BTreeMap;

use axum::{
    Json,
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;

use tokengate_auth::{AuthenticationError, AuthzError};

use crate::app::dto::BaseResponse;
use crate::app::services::MemberError;

/// Every failure an endpoint can report.
///
/// The mapping to status codes lives in one exhaustive match below.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("{field} is already registered")]
    DuplicateIdentity { field: &'static str },

    #[error("invalid {field}: {message}")]
    InvalidInput { field: &'static str, message: String },

    /// Login failed. Never says whether the email or the password was wrong.
    #[error("invalid email or password")]
    BadCredentials,

    #[error("authentication required")]
    Unauthenticated,

    #[error(transparent)]
    AccessDenied(#[from] AuthzError),

    #[error("internal error: {0}")]
    Internal(String),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let message = self.to_string();
        let (status, field) = match &self {
            ApiError::DuplicateIdentity { field } => (StatusCode::BAD_REQUEST, *field),
            ApiError::InvalidInput { field, .. } => (StatusCode::BAD_REQUEST, *field),
            ApiError::BadCredentials => (StatusCode::UNAUTHORIZED, "credentials"),
            ApiError::Unauthenticated => (StatusCode::UNAUTHORIZED, "authorization"),
            ApiError::AccessDenied(e) => match e {
                AuthzError::Unauthenticated => (StatusCode::UNAUTHORIZED, "authorization"),
                AuthzError::AnonymousOnly
                | AuthzError::Forbidden(_)
                | AuthzError::NoMatchingRule => (StatusCode::FORBIDDEN, "authorization"),
            },
            ApiError::Internal(detail) => {
                tracing::error!(error = %detail, "request failed");
                (StatusCode::INTERNAL_SERVER_ERROR, "server")
            }
        };

        let message = match &self {
            ApiError::Internal(_) => "internal server error".to_string(),
            _ => message,
        };

        let data = BTreeMap::from([(field.to_string(), message)]);
        (status, Json(BaseResponse::error(data))).into_response()
    }
}

impl From<MemberError> for ApiError {
    fn from(err: MemberError) -> Self {
        match err {
            MemberError::DuplicateIdentity { field } => ApiError::DuplicateIdentity { field },
            MemberError::Authentication(AuthenticationError::BadCredentials) => ApiError::BadCredentials,
            MemberError::Authentication(AuthenticationError::Backend(msg)) => ApiError::Internal(msg),
            MemberError::Token(e) => ApiError::Internal(e.to_string()),
            MemberError::Storage(msg) | MemberError::Task(msg) => ApiError::Internal(msg),
        }
    }
}

impl From<JsonRejection> for ApiError {
    fn from(err: JsonRejection) -> Self {
        ApiError::InvalidInput {
            field: "body",
            message: err.body_text(),
        }
    }
}
