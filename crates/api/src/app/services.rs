//! Member collaborators around the token core: storage, password hashing,
//! the authentication manager, and the signup/login service that ties them
//! to the [`TokenCodec`].

use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use chrono::{DateTime, Utc};
use serde::Serialize;
use thiserror::Error;

use tokengate_auth::{
    Authentication, AuthenticationError, AuthenticationManager, Authority, CredentialHasher,
    TokenCodec, TokenError, TokenInfo,
};

use crate::app::dto::{LoginRequest, SignupRequest};

pub const SIGNUP_COMPLETE: &str = "signup completed";

#[derive(Debug, Error)]
pub enum MemberError {
    #[error("{field} is already registered")]
    DuplicateIdentity { field: &'static str },

    #[error(transparent)]
    Authentication(#[from] AuthenticationError),

    #[error(transparent)]
    Token(#[from] TokenError),

    #[error("member storage failure: {0}")]
    Storage(String),

    #[error("background task failed: {0}")]
    Task(String),
}

// ─────────────────────────────────────────────────────────────────────────────
// Members
// ─────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum MemberRole {
    Member,
}

impl MemberRole {
    pub fn name(self) -> &'static str {
        match self {
            MemberRole::Member => "MEMBER",
        }
    }

    pub fn authority(self) -> Authority {
        Authority::from_role(self.name())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Member {
    pub id: u64,
    pub email: String,
    pub password_hash: String,
    pub nickname: String,
    pub roles: Vec<MemberRole>,
    pub created_at: DateTime<Utc>,
    pub updated_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone)]
pub struct NewMember {
    pub email: String,
    pub password_hash: String,
    pub nickname: String,
    pub roles: Vec<MemberRole>,
}

/// Member persistence. Email and nickname are both unique.
pub trait MemberStore: Send + Sync {
    fn find_by_email(&self, email: &str) -> Option<Member>;
    fn find_by_nickname(&self, nickname: &str) -> Option<Member>;
    /// Insert, enforcing uniqueness atomically with the write.
    fn insert(&self, member: NewMember) -> Result<Member, MemberError>;
}

impl<S> MemberStore for Arc<S>
where
    S: MemberStore + ?Sized,
{
    fn find_by_email(&self, email: &str) -> Option<Member> {
        (**self).find_by_email(email)
    }

    fn find_by_nickname(&self, nickname: &str) -> Option<Member> {
        (**self).find_by_nickname(nickname)
    }

    fn insert(&self, member: NewMember) -> Result<Member, MemberError> {
        (**self).insert(member)
    }
}

#[derive(Debug, Default)]
struct Members {
    by_email: HashMap<String, Member>,
    last_id: u64,
}

/// In-memory member store for tests/dev.
#[derive(Debug, Default)]
pub struct InMemoryMemberStore {
    inner: RwLock<Members>,
}

impl InMemoryMemberStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl MemberStore for InMemoryMemberStore {
    fn find_by_email(&self, email: &str) -> Option<Member> {
        let members = self.inner.read().ok()?;
        members.by_email.get(email).cloned()
    }

    fn find_by_nickname(&self, nickname: &str) -> Option<Member> {
        let members = self.inner.read().ok()?;
        members
            .by_email
            .values()
            .find(|m| m.nickname == nickname)
            .cloned()
    }

    fn insert(&self, member: NewMember) -> Result<Member, MemberError> {
        let mut members = self
            .inner
            .write()
            .map_err(|_| MemberError::Storage("member store lock poisoned".to_string()))?;

        if members.by_email.contains_key(&member.email) {
            return Err(MemberError::DuplicateIdentity { field: "email" });
        }
        if members.by_email.values().any(|m| m.nickname == member.nickname) {
            return Err(MemberError::DuplicateIdentity { field: "nickname" });
        }

        members.last_id += 1;
        let stored = Member {
            id: members.last_id,
            email: member.email,
            password_hash: member.password_hash,
            nickname: member.nickname,
            roles: member.roles,
            created_at: Utc::now(),
            updated_at: None,
        };
        members.by_email.insert(stored.email.clone(), stored.clone());
        Ok(stored)
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Credentials
// ─────────────────────────────────────────────────────────────────────────────

/// bcrypt-backed [`CredentialHasher`]. CPU-heavy; call it off the async runtime.
#[derive(Debug, Clone, Copy)]
pub struct BcryptHasher {
    cost: u32,
}

impl BcryptHasher {
    pub fn new(cost: u32) -> Self {
        Self { cost }
    }
}

impl CredentialHasher for BcryptHasher {
    fn hash(&self, raw: &str) -> Result<String, AuthenticationError> {
        bcrypt::hash(raw, self.cost).map_err(|e| AuthenticationError::Backend(e.to_string()))
    }

    fn verify(&self, raw: &str, hash: &str) -> Result<bool, AuthenticationError> {
        bcrypt::verify(raw, hash).map_err(|e| AuthenticationError::Backend(e.to_string()))
    }
}

/// Authenticates against the member store.
///
/// Unknown email and wrong password both come back as `BadCredentials`.
pub struct StoreAuthenticationManager {
    store: Arc<dyn MemberStore>,
    hasher: Arc<dyn CredentialHasher>,
}

impl StoreAuthenticationManager {
    pub fn new(store: Arc<dyn MemberStore>, hasher: Arc<dyn CredentialHasher>) -> Self {
        Self { store, hasher }
    }
}

impl AuthenticationManager for StoreAuthenticationManager {
    fn authenticate(&self, subject: &str, credential: &str) -> Result<Authentication, AuthenticationError> {
        let member = self
            .store
            .find_by_email(subject)
            .ok_or(AuthenticationError::BadCredentials)?;

        if !self.hasher.verify(credential, &member.password_hash)? {
            return Err(AuthenticationError::BadCredentials);
        }

        Ok(Authentication {
            subject: member.email,
            authorities: member.roles.iter().map(|r| r.authority()).collect(),
        })
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Service
// ─────────────────────────────────────────────────────────────────────────────

pub struct MemberService {
    store: Arc<dyn MemberStore>,
    hasher: Arc<dyn CredentialHasher>,
    manager: Arc<dyn AuthenticationManager>,
    codec: Arc<TokenCodec>,
}

impl MemberService {
    pub fn new(
        store: Arc<dyn MemberStore>,
        hasher: Arc<dyn CredentialHasher>,
        manager: Arc<dyn AuthenticationManager>,
        codec: Arc<TokenCodec>,
    ) -> Self {
        Self {
            store,
            hasher,
            manager,
            codec,
        }
    }

    /// Register a member with the `MEMBER` role.
    pub async fn signup(&self, req: SignupRequest) -> Result<&'static str, MemberError> {
        // Cheap early rejection before paying for a hash; `insert` re-checks.
        if self.store.find_by_email(&req.email).is_some() {
            return Err(MemberError::DuplicateIdentity { field: "email" });
        }
        if self.store.find_by_nickname(&req.nickname).is_some() {
            return Err(MemberError::DuplicateIdentity { field: "nickname" });
        }

        let hasher = self.hasher.clone();
        let password = req.password;
        let password_hash = tokio::task::spawn_blocking(move || hasher.hash(&password))
            .await
            .map_err(|e| MemberError::Task(e.to_string()))??;

        let member = self.store.insert(NewMember {
            email: req.email,
            password_hash,
            nickname: req.nickname,
            roles: vec![MemberRole::Member],
        })?;

        tracing::info!(member_id = member.id, email = %member.email, "member registered");
        Ok(SIGNUP_COMPLETE)
    }

    /// Authenticate and issue a bearer token.
    pub async fn login(&self, req: LoginRequest) -> Result<TokenInfo, MemberError> {
        let manager = self.manager.clone();
        let authentication = tokio::task::spawn_blocking(move || manager.authenticate(&req.email, &req.password))
            .await
            .map_err(|e| MemberError::Task(e.to_string()))?
            .inspect_err(|e| tracing::info!(error = %e, "login rejected"))?;

        let token = self.codec.issue_for(&authentication)?;
        tracing::info!(subject = %authentication.subject, "token issued");
        Ok(token)
    }
}

/// Everything handlers need, shared behind an `Arc`.
pub struct AppServices {
    pub members: MemberService,
}

/// In-memory wiring: store + bcrypt + store-backed authentication manager.
pub fn build_services(codec: Arc<TokenCodec>, bcrypt_cost: u32) -> AppServices {
    let store: Arc<dyn MemberStore> = Arc::new(InMemoryMemberStore::new());
    let hasher: Arc<dyn CredentialHasher> = Arc::new(BcryptHasher::new(bcrypt_cost));
    let manager: Arc<dyn AuthenticationManager> =
        Arc::new(StoreAuthenticationManager::new(store.clone(), hasher.clone()));

    AppServices {
        members: MemberService::new(store, hasher, manager, codec),
    }
}

#[cfg(test)]
mod tests {
    use tokengate_auth::SigningKey;

    use super::*;

    fn codec() -> Arc<TokenCodec> {
        Arc::new(TokenCodec::new(SigningKey::from_bytes(&[3u8; 32]).unwrap()))
    }

    fn signup_request(email: &str, nickname: &str) -> SignupRequest {
        SignupRequest {
            email: email.to_string(),
            password: "s3cret!pass".to_string(),
            nickname: nickname.to_string(),
        }
    }

    fn login_request(email: &str, password: &str) -> LoginRequest {
        LoginRequest {
            email: email.to_string(),
            password: password.to_string(),
        }
    }

    fn wired() -> (Arc<InMemoryMemberStore>, MemberService, Arc<TokenCodec>) {
        let store = Arc::new(InMemoryMemberStore::new());
        let hasher: Arc<dyn CredentialHasher> = Arc::new(BcryptHasher::new(4));
        let manager: Arc<dyn AuthenticationManager> =
            Arc::new(StoreAuthenticationManager::new(store.clone(), hasher.clone()));
        let codec = codec();
        let service = MemberService::new(store.clone(), hasher, manager, codec.clone());
        (store, service, codec)
    }

    #[tokio::test]
    async fn signup_then_login_issues_a_member_token() {
        let (_store, service, codec) = wired();

        let message = service
            .signup(signup_request("alice@example.com", "alice"))
            .await
            .unwrap();
        assert_eq!(message, SIGNUP_COMPLETE);

        let info = service
            .login(login_request("alice@example.com", "s3cret!pass"))
            .await
            .unwrap();
        assert_eq!(info.scheme, "Bearer");

        let principal = codec.authenticate(&info.token).unwrap();
        assert_eq!(principal.subject(), "alice@example.com");
        assert_eq!(principal.authorities(), &[Authority::MEMBER]);
    }

    #[tokio::test]
    async fn passwords_are_stored_hashed() {
        let (store, service, _codec) = wired();
        service
            .signup(signup_request("alice@example.com", "alice"))
            .await
            .unwrap();

        let member = store.find_by_email("alice@example.com").unwrap();
        assert_ne!(member.password_hash, "s3cret!pass");
        assert!(member.password_hash.starts_with("$2"));
        assert_eq!(member.roles, vec![MemberRole::Member]);
    }

    #[tokio::test]
    async fn duplicate_email_is_rejected() {
        let (_store, service, _codec) = wired();
        service
            .signup(signup_request("alice@example.com", "alice"))
            .await
            .unwrap();

        let err = service
            .signup(signup_request("alice@example.com", "alice2"))
            .await
            .unwrap_err();
        assert!(matches!(err, MemberError::DuplicateIdentity { field: "email" }));
    }

    #[tokio::test]
    async fn duplicate_nickname_is_rejected() {
        let (_store, service, _codec) = wired();
        service
            .signup(signup_request("alice@example.com", "alice"))
            .await
            .unwrap();

        let err = service
            .signup(signup_request("other@example.com", "alice"))
            .await
            .unwrap_err();
        assert!(matches!(err, MemberError::DuplicateIdentity { field: "nickname" }));
    }

    #[tokio::test]
    async fn wrong_password_and_unknown_email_look_the_same() {
        let (_store, service, _codec) = wired();
        service
            .signup(signup_request("alice@example.com", "alice"))
            .await
            .unwrap();

        let wrong_password = service
            .login(login_request("alice@example.com", "nope"))
            .await
            .unwrap_err();
        let unknown_email = service
            .login(login_request("nobody@example.com", "s3cret!pass"))
            .await
            .unwrap_err();

        assert!(matches!(
            wrong_password,
            MemberError::Authentication(AuthenticationError::BadCredentials)
        ));
        assert_eq!(wrong_password.to_string(), unknown_email.to_string());
    }

    #[test]
    fn store_enforces_uniqueness_on_insert() {
        let store = InMemoryMemberStore::new();
        let new = |email: &str, nickname: &str| NewMember {
            email: email.to_string(),
            password_hash: "x".to_string(),
            nickname: nickname.to_string(),
            roles: vec![MemberRole::Member],
        };

        let first = store.insert(new("a@example.com", "a")).unwrap();
        let second = store.insert(new("b@example.com", "b")).unwrap();
        assert_eq!((first.id, second.id), (1, 2));

        assert!(matches!(
            store.insert(new("a@example.com", "c")),
            Err(MemberError::DuplicateIdentity { field: "email" })
        ));
        assert!(matches!(
            store.insert(new("c@example.com", "b")),
            Err(MemberError::DuplicateIdentity { field: "nickname" })
        ));
    }

    #[test]
    fn member_role_maps_to_prefixed_authority() {
        assert_eq!(MemberRole::Member.authority(), Authority::MEMBER);
    }
}
