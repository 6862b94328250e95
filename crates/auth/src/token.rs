//! Token codec: issue, verify and decode HS256-signed bearer tokens.
//!
//! Tokens are stateless. Nothing is stored on issue and nothing can be
//! revoked; a token stops working only when `exp` passes.

use base64::prelude::*;
use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{Algorithm, Header, Validation, errors::ErrorKind};
use serde::{Deserialize, Serialize};

use crate::{
    Authentication, Authority, Claims, Principal, SigningKey, TokenError,
    authority::join_authorities, claims::validate_claims,
};

/// Scheme name returned alongside every issued token.
pub const TOKEN_SCHEME: &str = "Bearer";

/// Fixed token lifetime.
pub const TOKEN_LIFETIME_HOURS: i64 = 12;

const ACCEPTED_ALG: &str = "HS256";
const ACCEPTED_TYP: &str = "JWT";

/// What a caller receives at login.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenInfo {
    pub scheme: String,
    pub token: String,
}

/// Issues and verifies tokens against a single process-wide key.
///
/// Immutable after construction; share it behind an `Arc`.
#[derive(Debug, Clone)]
pub struct TokenCodec {
    key: SigningKey,
    validation: Validation,
    lifetime: Duration,
}

impl TokenCodec {
    pub fn new(key: SigningKey) -> Self {
        // Expiry is checked by `validate_claims` against an explicit instant,
        // so jsonwebtoken's own wall-clock checks stay off.
        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = false;
        validation.validate_nbf = false;
        validation.validate_aud = false;
        validation.required_spec_claims.clear();
        validation.leeway = 0;

        Self {
            key,
            validation,
            lifetime: Duration::hours(TOKEN_LIFETIME_HOURS),
        }
    }

    pub fn lifetime(&self) -> Duration {
        self.lifetime
    }

    pub fn issue(&self, subject: &str, authorities: &[Authority]) -> Result<TokenInfo, TokenError> {
        self.issue_at(subject, authorities, Utc::now())
    }

    /// Issue a token as of `now`.
    ///
    /// Output is a pure function of subject, authorities, `now` (to the
    /// second) and the key.
    pub fn issue_at(
        &self,
        subject: &str,
        authorities: &[Authority],
        now: DateTime<Utc>,
    ) -> Result<TokenInfo, TokenError> {
        let claims = Claims {
            sub: Some(subject.to_string()),
            auth: Some(join_authorities(authorities)),
            iat: now.timestamp(),
            exp: (now + self.lifetime).timestamp(),
        };

        let token = jsonwebtoken::encode(&Header::new(Algorithm::HS256), &claims, self.key.encoding())
            .map_err(|e| TokenError::Signing(e.to_string()))?;

        Ok(TokenInfo {
            scheme: TOKEN_SCHEME.to_string(),
            token,
        })
    }

    /// Wrap an authentication manager's result into a token.
    pub fn issue_for(&self, authentication: &Authentication) -> Result<TokenInfo, TokenError> {
        self.issue(&authentication.subject, &authentication.authorities)
    }

    pub fn verify_and_decode(&self, token: &str) -> Result<Claims, TokenError> {
        self.verify_and_decode_at(token, Utc::now())
    }

    /// Verify the signature, then the expiry, and return the claims.
    ///
    /// No claim is looked at before the signature checks out.
    pub fn verify_and_decode_at(&self, token: &str, now: DateTime<Utc>) -> Result<Claims, TokenError> {
        if token.trim().is_empty() {
            return Err(TokenError::InvalidArgument);
        }

        inspect_header(token)?;

        let data = jsonwebtoken::decode::<Claims>(token, self.key.decoding(), &self.validation)
            .map_err(classify)?;

        validate_claims(&data.claims, now)?;
        Ok(data.claims)
    }

    pub fn is_valid(&self, token: &str) -> bool {
        self.is_valid_at(token, Utc::now())
    }

    /// `true` iff the token verifies; failures are logged, never returned.
    pub fn is_valid_at(&self, token: &str, now: DateTime<Utc>) -> bool {
        match self.verify_and_decode_at(token, now) {
            Ok(_) => true,
            Err(e) => {
                tracing::debug!(error = %e, "rejected bearer token");
                false
            }
        }
    }

    pub fn to_principal(&self, claims: &Claims) -> Result<Principal, TokenError> {
        Principal::from_claims(claims)
    }

    pub fn authenticate(&self, token: &str) -> Result<Principal, TokenError> {
        self.authenticate_at(token, Utc::now())
    }

    /// Verify, decode and build the principal in one pass.
    pub fn authenticate_at(&self, token: &str, now: DateTime<Utc>) -> Result<Principal, TokenError> {
        let claims = self.verify_and_decode_at(token, now)?;
        self.to_principal(&claims)
    }
}

#[derive(Deserialize)]
struct RawHeader {
    alg: String,
    #[serde(default)]
    typ: Option<String>,
}

/// Structural and algorithm checks that jsonwebtoken reports too coarsely
/// (an `alg` it has no variant for, such as `none`, surfaces as a JSON error).
fn inspect_header(token: &str) -> Result<(), TokenError> {
    let mut segments = token.split('.');
    let (Some(header), Some(_), Some(_), None) =
        (segments.next(), segments.next(), segments.next(), segments.next())
    else {
        return Err(TokenError::Malformed(
            "expected three dot-separated segments".to_string(),
        ));
    };

    let raw = BASE64_URL_SAFE_NO_PAD
        .decode(header)
        .map_err(|e| TokenError::Malformed(format!("header is not base64url: {e}")))?;
    let header: RawHeader = serde_json::from_slice(&raw)
        .map_err(|e| TokenError::Malformed(format!("header is not valid JSON: {e}")))?;

    if header.alg != ACCEPTED_ALG {
        return Err(TokenError::Unsupported(format!("algorithm '{}'", header.alg)));
    }
    match header.typ {
        Some(typ) if !typ.eq_ignore_ascii_case(ACCEPTED_TYP) => {
            Err(TokenError::Unsupported(format!("token type '{typ}'")))
        }
        _ => Ok(()),
    }
}

fn classify(err: jsonwebtoken::errors::Error) -> TokenError {
    match err.kind() {
        ErrorKind::InvalidSignature => TokenError::BadSignature,
        ErrorKind::ExpiredSignature => TokenError::Expired,
        ErrorKind::InvalidAlgorithm
        | ErrorKind::InvalidAlgorithmName
        | ErrorKind::MissingAlgorithm => TokenError::Unsupported(err.to_string()),
        _ => TokenError::Malformed(err.to_string()),
    }
}
