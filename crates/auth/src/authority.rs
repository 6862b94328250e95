use std::borrow::Cow;

use serde::{Deserialize, Serialize};

/// Authority granted to a principal (e.g. `ROLE_MEMBER`).
///
/// Authorities are opaque strings at this layer. They are carried through the
/// token verbatim: no trimming, no case folding, duplicates allowed.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Authority(Cow<'static, str>);

impl Authority {
    pub const MEMBER: Authority = Authority(Cow::Borrowed("ROLE_MEMBER"));

    pub fn new(name: impl Into<Cow<'static, str>>) -> Self {
        Self(name.into())
    }

    /// Authority for a stored role name, using the `ROLE_` convention.
    pub fn from_role(role: &str) -> Self {
        Self(Cow::Owned(format!("ROLE_{role}")))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl core::fmt::Display for Authority {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for Authority {
    fn from(value: &str) -> Self {
        Self(Cow::Owned(value.to_string()))
    }
}

impl From<String> for Authority {
    fn from(value: String) -> Self {
        Self(Cow::Owned(value))
    }
}

/// Join authorities into the wire form of the `auth` claim.
pub fn join_authorities(authorities: &[Authority]) -> String {
    authorities
        .iter()
        .map(Authority::as_str)
        .collect::<Vec<_>>()
        .join(",")
}

/// Split the `auth` claim back into authorities.
///
/// This is a literal split on `,`: `"a,,b"` yields an empty authority in the
/// middle and `""` yields a single empty authority.
pub fn split_authorities(auth: &str) -> Vec<Authority> {
    auth.split(',').map(Authority::from).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn role_names_get_prefixed() {
        assert_eq!(Authority::from_role("MEMBER"), Authority::MEMBER);
    }

    #[test]
    fn split_keeps_empty_segments_and_whitespace() {
        let parts = split_authorities("ROLE_A,, ROLE_B,");
        let names: Vec<&str> = parts.iter().map(Authority::as_str).collect();
        assert_eq!(names, vec!["ROLE_A", "", " ROLE_B", ""]);
    }

    #[test]
    fn empty_claim_is_one_empty_authority() {
        assert_eq!(split_authorities(""), vec![Authority::new("")]);
    }

    #[test]
    fn join_preserves_order_and_duplicates() {
        let joined = join_authorities(&[
            Authority::new("ROLE_B"),
            Authority::new("ROLE_A"),
            Authority::new("ROLE_B"),
        ]);
        assert_eq!(joined, "ROLE_B,ROLE_A,ROLE_B");
    }
}
