//! Route-level authorization policy.
//!
//! An ordered table of `pattern -> requirement` rules, first match wins. The
//! default table only distinguishes anonymous-only routes from everything
//! else; authority strings ride along in the principal but no default rule
//! gates on them. `Requirement::Authenticated` and `Requirement::AnyAuthority`
//! exist so callers can insert stricter rules ahead of the catch-all.
//!
//! There is no session, cookie, basic-auth or CSRF layer anywhere in this
//! stack: each request is judged only on the token it presents.

use std::borrow::Cow;

use thiserror::Error;

use crate::{Authority, Principal};

/// Path of the signup route, reachable only by anonymous callers.
pub const SIGNUP_PATH: &str = "/api/user/signup";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RoutePattern {
    /// Matches one path exactly.
    Exact(Cow<'static, str>),
    /// Matches a path and everything below it (segment-aware).
    Prefix(Cow<'static, str>),
    /// Matches every path.
    Any,
}

impl RoutePattern {
    pub fn exact(path: impl Into<Cow<'static, str>>) -> Self {
        Self::Exact(path.into())
    }

    pub fn prefix(path: impl Into<Cow<'static, str>>) -> Self {
        Self::Prefix(path.into())
    }

    pub fn matches(&self, path: &str) -> bool {
        match self {
            RoutePattern::Exact(p) => path == p.as_ref(),
            RoutePattern::Prefix(p) => match path.strip_prefix(p.as_ref()) {
                Some(rest) => rest.is_empty() || rest.starts_with('/') || p.ends_with('/'),
                None => false,
            },
            RoutePattern::Any => true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Requirement {
    /// Caller must NOT be authenticated.
    Anonymous,
    /// Anyone, authenticated or not.
    PermitAll,
    /// Any authenticated caller.
    Authenticated,
    /// Authenticated caller holding at least one of these authorities.
    AnyAuthority(Vec<Authority>),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rule {
    pub pattern: RoutePattern,
    pub requirement: Requirement,
}

impl Rule {
    pub fn new(pattern: RoutePattern, requirement: Requirement) -> Self {
        Self { pattern, requirement }
    }
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AuthzError {
    #[error("route is only available to anonymous callers")]
    AnonymousOnly,

    #[error("authentication required")]
    Unauthenticated,

    #[error("forbidden: requires one of [{0}]")]
    Forbidden(String),

    #[error("no authorization rule matches this route")]
    NoMatchingRule,
}

/// Ordered rule table; evaluation stops at the first matching pattern.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthorizationPolicy {
    rules: Vec<Rule>,
}

impl AuthorizationPolicy {
    pub fn new(rules: Vec<Rule>) -> Self {
        Self { rules }
    }

    /// Signup is anonymous-only; everything else is open.
    pub fn default_rules() -> Self {
        Self::new(vec![
            Rule::new(RoutePattern::exact(SIGNUP_PATH), Requirement::Anonymous),
            Rule::new(RoutePattern::Any, Requirement::PermitAll),
        ])
    }

    /// Insert a rule ahead of all existing ones.
    pub fn prepend(mut self, rule: Rule) -> Self {
        self.rules.insert(0, rule);
        self
    }

    pub fn rules(&self) -> &[Rule] {
        &self.rules
    }

    pub fn matching_rule(&self, path: &str) -> Option<&Rule> {
        self.rules.iter().find(|r| r.pattern.matches(path))
    }

    /// Decide whether `principal` (or an anonymous caller, when `None`) may reach `path`.
    ///
    /// No IO, no panics.
    pub fn authorize(&self, path: &str, principal: Option<&Principal>) -> Result<(), AuthzError> {
        let rule = self.matching_rule(path).ok_or(AuthzError::NoMatchingRule)?;
        check(&rule.requirement, principal)
    }
}

impl Default for AuthorizationPolicy {
    fn default() -> Self {
        Self::default_rules()
    }
}

/// Evaluate a single requirement.
pub fn check(requirement: &Requirement, principal: Option<&Principal>) -> Result<(), AuthzError> {
    match (requirement, principal) {
        (Requirement::PermitAll, _) => Ok(()),
        (Requirement::Anonymous, None) => Ok(()),
        (Requirement::Anonymous, Some(_)) => Err(AuthzError::AnonymousOnly),
        (Requirement::Authenticated, Some(_)) => Ok(()),
        (Requirement::Authenticated | Requirement::AnyAuthority(_), None) => {
            Err(AuthzError::Unauthenticated)
        }
        (Requirement::AnyAuthority(required), Some(p)) => {
            if required.iter().any(|a| p.has_authority(a)) {
                Ok(())
            } else {
                let names: Vec<&str> = required.iter().map(Authority::as_str).collect();
                Err(AuthzError::Forbidden(names.join(", ")))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn member() -> Principal {
        Principal::new("alice@example.com", vec![Authority::MEMBER])
    }

    #[test]
    fn signup_rejects_authenticated_callers() {
        let policy = AuthorizationPolicy::default();
        let alice = member();
        assert_eq!(
            policy.authorize(SIGNUP_PATH, Some(&alice)),
            Err(AuthzError::AnonymousOnly)
        );
    }

    #[test]
    fn signup_admits_anonymous_callers() {
        let policy = AuthorizationPolicy::default();
        assert_eq!(policy.authorize(SIGNUP_PATH, None), Ok(()));
    }

    #[test]
    fn everything_else_is_open() {
        let policy = AuthorizationPolicy::default();
        let alice = member();
        for path in ["/api/user/login", "/api/user/info", "/health", "/api/user/signup/extra"] {
            assert_eq!(policy.authorize(path, None), Ok(()), "{path}");
            assert_eq!(policy.authorize(path, Some(&alice)), Ok(()), "{path}");
        }
    }

    #[test]
    fn first_matching_rule_wins() {
        let policy = AuthorizationPolicy::default()
            .prepend(Rule::new(RoutePattern::Any, Requirement::PermitAll));
        let alice = member();
        assert_eq!(policy.authorize(SIGNUP_PATH, Some(&alice)), Ok(()));
    }

    #[test]
    fn authority_rules_gate_on_any_listed_authority() {
        let policy = AuthorizationPolicy::default().prepend(Rule::new(
            RoutePattern::prefix("/api/admin"),
            Requirement::AnyAuthority(vec![Authority::new("ROLE_ADMIN")]),
        ));
        let admin = Principal::new("root", vec![Authority::MEMBER, Authority::new("ROLE_ADMIN")]);

        assert_eq!(policy.authorize("/api/admin/users", Some(&admin)), Ok(()));
        assert_eq!(
            policy.authorize("/api/admin/users", Some(&member())),
            Err(AuthzError::Forbidden("ROLE_ADMIN".to_string()))
        );
        assert_eq!(
            policy.authorize("/api/admin", None),
            Err(AuthzError::Unauthenticated)
        );
        assert_eq!(policy.authorize("/api/administrators", None), Ok(()));
    }

    #[test]
    fn empty_table_denies() {
        let policy = AuthorizationPolicy::new(Vec::new());
        assert_eq!(policy.authorize("/", None), Err(AuthzError::NoMatchingRule));
    }

    #[test]
    fn authenticated_requirement() {
        assert_eq!(check(&Requirement::Authenticated, Some(&member())), Ok(()));
        assert_eq!(
            check(&Requirement::Authenticated, None),
            Err(AuthzError::Unauthenticated)
        );
    }
}
