use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::TokenError;

/// Claims carried in the token payload.
///
/// Timestamps are whole seconds since the Unix epoch, as in any JWT.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    /// Subject (the member's login identifier).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sub: Option<String>,

    /// Comma-joined authorities.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub auth: Option<String>,

    /// Issued-at.
    pub iat: i64,

    /// Expiration.
    pub exp: i64,
}

impl Claims {
    pub fn issued_at(&self) -> Option<DateTime<Utc>> {
        DateTime::from_timestamp(self.iat, 0)
    }

    pub fn expires_at(&self) -> Option<DateTime<Utc>> {
        DateTime::from_timestamp(self.exp, 0)
    }
}

/// Check the claims' time window against `now`.
///
/// A token is live only while `exp > now`; `iat` is informational.
pub fn validate_claims(claims: &Claims, now: DateTime<Utc>) -> Result<(), TokenError> {
    if claims.exp <= now.timestamp() {
        return Err(TokenError::Expired);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn claims_expiring_at(exp: DateTime<Utc>) -> Claims {
        Claims {
            sub: Some("alice@example.com".to_string()),
            auth: Some("ROLE_MEMBER".to_string()),
            iat: (exp - Duration::hours(12)).timestamp(),
            exp: exp.timestamp(),
        }
    }

    #[test]
    fn live_before_expiry() {
        let now = Utc::now();
        let claims = claims_expiring_at(now + Duration::seconds(1));
        assert_eq!(validate_claims(&claims, now), Ok(()));
    }

    #[test]
    fn expired_at_the_exact_second() {
        let now = Utc::now();
        let claims = claims_expiring_at(now);
        assert_eq!(validate_claims(&claims, now), Err(TokenError::Expired));
    }

    #[test]
    fn missing_optional_claims_deserialize_as_none() {
        let claims: Claims = serde_json::from_str(r#"{"iat":1,"exp":2}"#).unwrap();
        assert_eq!(claims.sub, None);
        assert_eq!(claims.auth, None);
        assert_eq!(claims.expires_at().map(|t| t.timestamp()), Some(2));
    }
}
