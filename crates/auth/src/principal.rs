use serde::Serialize;

use crate::{Authority, Claims, TokenError, authority::split_authorities};

/// Authenticated identity reconstructed from a verified token.
///
/// Built fresh on every request from the token alone; nothing here is ever
/// loaded from storage. The credential is always empty because tokens never
/// carry one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Principal {
    subject: String,
    #[serde(skip)]
    credential: String,
    authorities: Vec<Authority>,
}

impl Principal {
    pub fn new(subject: impl Into<String>, authorities: Vec<Authority>) -> Self {
        Self {
            subject: subject.into(),
            credential: String::new(),
            authorities,
        }
    }

    /// Build a principal from verified claims.
    ///
    /// Fails with `MissingClaim` when `auth` (or `sub`) is absent. The `auth`
    /// claim is split literally on `,`.
    pub fn from_claims(claims: &Claims) -> Result<Self, TokenError> {
        let auth = claims
            .auth
            .as_deref()
            .ok_or(TokenError::MissingClaim("auth"))?;
        let subject = claims
            .sub
            .as_deref()
            .ok_or(TokenError::MissingClaim("sub"))?;

        Ok(Self::new(subject, split_authorities(auth)))
    }

    pub fn subject(&self) -> &str {
        &self.subject
    }

    pub fn credential(&self) -> &str {
        &self.credential
    }

    pub fn authorities(&self) -> &[Authority] {
        &self.authorities
    }

    pub fn has_authority(&self, authority: &Authority) -> bool {
        self.authorities.iter().any(|a| a == authority)
    }
}

impl core::fmt::Display for Principal {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(&self.subject)
    }
}

/// Output of an authentication manager: a verified subject and its authorities.
///
/// This is what gets wrapped into a token at login.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Authentication {
    pub subject: String,
    pub authorities: Vec<Authority>,
}
