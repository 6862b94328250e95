//! Token-level error model.

use thiserror::Error;

/// Why a token (or its claims) was rejected.
///
/// Callers at the request boundary treat every variant the same way (the
/// request continues as anonymous); the kinds exist for logging and tests.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TokenError {
    /// Structurally invalid: wrong segment count, bad base64, bad JSON.
    #[error("malformed token: {0}")]
    Malformed(String),

    /// `exp` is not after the verification instant.
    #[error("token has expired")]
    Expired,

    /// Signed with an algorithm or declared as a type this codec does not accept.
    #[error("unsupported token: {0}")]
    Unsupported(String),

    /// Signature does not verify against the process secret.
    #[error("token signature does not match")]
    BadSignature,

    /// Empty or blank token string.
    #[error("token string is empty")]
    InvalidArgument,

    /// A claim required to build a principal is absent.
    #[error("token is missing the '{0}' claim")]
    MissingClaim(&'static str),

    /// Encoding failed while issuing.
    #[error("failed to sign token: {0}")]
    Signing(String),
}

/// Signing key could not be built from configuration.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum KeyError {
    #[error("secret is not valid base64: {0}")]
    InvalidBase64(String),

    #[error("secret is {bits} bits; HS256 needs at least 256")]
    TooShort { bits: usize },
}
