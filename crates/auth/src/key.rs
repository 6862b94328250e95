use base64::prelude::*;
use jsonwebtoken::{DecodingKey, EncodingKey};

use crate::KeyError;

/// Minimum HMAC-SHA256 key size in bytes.
pub const MIN_KEY_BYTES: usize = 32;

/// Process-wide HMAC secret.
///
/// Built once at startup and then only read. Holds both halves jsonwebtoken
/// needs so verification never re-derives key material per request.
#[derive(Clone)]
pub struct SigningKey {
    encoding: EncodingKey,
    decoding: DecodingKey,
}

impl SigningKey {
    /// Decode a standard-alphabet base64 secret (the configured form).
    pub fn from_base64(secret: &str) -> Result<Self, KeyError> {
        let bytes = BASE64_STANDARD
            .decode(secret.trim())
            .map_err(|e| KeyError::InvalidBase64(e.to_string()))?;
        Self::from_bytes(&bytes)
    }

    pub fn from_bytes(bytes: &[u8]) -> Result<Self, KeyError> {
        if bytes.len() < MIN_KEY_BYTES {
            return Err(KeyError::TooShort {
                bits: bytes.len() * 8,
            });
        }

        Ok(Self {
            encoding: EncodingKey::from_secret(bytes),
            decoding: DecodingKey::from_secret(bytes),
        })
    }

    pub(crate) fn encoding(&self) -> &EncodingKey {
        &self.encoding
    }

    pub(crate) fn decoding(&self) -> &DecodingKey {
        &self.decoding
    }
}

impl core::fmt::Debug for SigningKey {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str("SigningKey(..)")
    }
}
