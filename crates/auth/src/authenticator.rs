//! Contracts for the collaborators that sit around the token core.
//!
//! The core never hashes passwords or touches storage. It consumes an
//! [`AuthenticationManager`] at login and wraps its output into a token.

use thiserror::Error;

use crate::Authentication;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AuthenticationError {
    /// Unknown subject or wrong credential. Deliberately not distinguished.
    #[error("bad credentials")]
    BadCredentials,

    #[error("authentication backend failure: {0}")]
    Backend(String),
}

/// Password hashing and verification.
pub trait CredentialHasher: Send + Sync {
    fn hash(&self, raw: &str) -> Result<String, AuthenticationError>;
    fn verify(&self, raw: &str, hash: &str) -> Result<bool, AuthenticationError>;
}

/// Turns a raw subject + credential into a verified [`Authentication`].
pub trait AuthenticationManager: Send + Sync {
    fn authenticate(&self, subject: &str, credential: &str) -> Result<Authentication, AuthenticationError>;
}

impl<T> CredentialHasher for std::sync::Arc<T>
where
    T: CredentialHasher + ?Sized,
{
    fn hash(&self, raw: &str) -> Result<String, AuthenticationError> {
        (**self).hash(raw)
    }

    fn verify(&self, raw: &str, hash: &str) -> Result<bool, AuthenticationError> {
        (**self).verify(raw, hash)
    }
}

impl<T> AuthenticationManager for std::sync::Arc<T>
where
    T: AuthenticationManager + ?Sized,
{
    fn authenticate(&self, subject: &str, credential: &str) -> Result<Authentication, AuthenticationError> {
        (**self).authenticate(subject, credential)
    }
}
