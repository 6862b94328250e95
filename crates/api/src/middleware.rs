use std::sync::Arc;

use axum::{
    extract::{Request, State},
    http::{HeaderMap, header::AUTHORIZATION},
    middleware::Next,
    response::Response,
};

use tokengate_auth::TokenCodec;

use crate::context::AuthContext;

/// Scheme prefix the interceptor looks for.
pub const BEARER_PREFIX: &str = "Bearer";

/// Byte offset at which the token is taken from the header value.
///
/// One past the prefix: whatever single character follows `Bearer` is dropped,
/// whether or not it is a space.
pub const TOKEN_OFFSET: usize = 7;

#[derive(Clone)]
pub struct AuthState {
    pub codec: Arc<TokenCodec>,
}

/// Per-request authentication gate.
///
/// Installs an [`AuthContext`] on every request and always forwards it. A
/// missing, foreign or failing token leaves the context anonymous; rejecting
/// anonymous callers is the policy layer's job.
pub async fn authenticate_request(
    State(state): State<AuthState>,
    mut req: Request,
    next: Next,
) -> Response {
    let context = match resolve_token(req.headers()) {
        Some(token) => match state.codec.authenticate(token) {
            Ok(principal) => {
                tracing::debug!(subject = %principal.subject(), "request authenticated");
                AuthContext::authenticated(principal)
            }
            Err(e) => {
                tracing::debug!(error = %e, "bearer token rejected; continuing as anonymous");
                AuthContext::anonymous()
            }
        },
        None => AuthContext::anonymous(),
    };

    req.extensions_mut().insert(context);
    next.run(req).await
}

/// Pull the token candidate out of the `Authorization` header, if any.
pub fn resolve_token(headers: &HeaderMap) -> Option<&str> {
    let value = headers.get(AUTHORIZATION)?.to_str().ok()?;
    extract_token(value)
}

/// Apply the fixed-offset extraction to a raw header value.
///
/// `"Bearer abc"` and `"Bearer_abc"` both give `"abc"`; `"Bearerabc"` gives
/// `"bc"`. Values shorter than the offset give nothing.
pub fn extract_token(value: &str) -> Option<&str> {
    if value.trim().is_empty() || !value.starts_with(BEARER_PREFIX) {
        return None;
    }
    value.get(TOKEN_OFFSET..)
}

#[cfg(test)]
mod tests {
    use axum::http::HeaderValue;

    use super::*;

    #[test]
    fn takes_everything_after_the_separator() {
        assert_eq!(extract_token("Bearer abc123"), Some("abc123"));
    }

    #[test]
    fn any_separator_character_is_dropped() {
        assert_eq!(extract_token("Bearerxabc123"), Some("abc123"));
        assert_eq!(extract_token("Bearer\tabc123"), Some("abc123"));
    }

    #[test]
    fn missing_separator_loses_the_first_token_character() {
        assert_eq!(extract_token("Bearerabc123"), Some("bc123"));
    }

    #[test]
    fn extra_spaces_are_kept() {
        assert_eq!(extract_token("Bearer  abc"), Some(" abc"));
    }

    #[test]
    fn prefix_is_case_sensitive() {
        assert_eq!(extract_token("bearer abc123"), None);
        assert_eq!(extract_token("BEARER abc123"), None);
    }

    #[test]
    fn other_schemes_yield_nothing() {
        assert_eq!(extract_token("Basic dXNlcjpwYXNz"), None);
        assert_eq!(extract_token(""), None);
        assert_eq!(extract_token("   "), None);
    }

    #[test]
    fn too_short_values_yield_nothing() {
        assert_eq!(extract_token("Bearer"), None);
        assert_eq!(extract_token("Bearer "), Some(""));
    }

    #[test]
    fn resolve_reads_the_authorization_header() {
        let mut headers = HeaderMap::new();
        assert_eq!(resolve_token(&headers), None);

        headers.insert(AUTHORIZATION, HeaderValue::from_static("Bearer tok"));
        assert_eq!(resolve_token(&headers), Some("tok"));
    }
}
