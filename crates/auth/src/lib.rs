//! `tokengate-auth`: stateless bearer-token authentication core.
//!
//! This crate is decoupled from HTTP and storage: it issues and
//! verifies tokens, rebuilds principals from them, and evaluates the route
//! policy. Transport lives in `tokengate-api`.

pub mod authenticator;
pub mod authority;
pub mod claims;
pub mod error;
pub mod key;
pub mod policy;
pub mod principal;
pub mod token;

pub use authenticator::{AuthenticationError, AuthenticationManager, CredentialHasher};
pub use authority::Authority;
pub use claims::{Claims, validate_claims};
pub use error::{KeyError, TokenError};
pub use key::SigningKey;
pub use policy::{AuthorizationPolicy, AuthzError, Requirement, RoutePattern, Rule};
pub use principal::{Authentication, Principal};
pub use token::{TOKEN_SCHEME, TokenCodec, TokenInfo};
