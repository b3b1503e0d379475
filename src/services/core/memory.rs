use std::collections::HashMap;
use std::str::FromStr;
use std::sync::Arc;

use argon2::password_hash::SaltString;
use argon2::{Argon2, PasswordHash, PasswordHasher, PasswordVerifier};
use async_trait::async_trait;
use chrono::{DateTime, TimeDelta, Utc};
use tokio::sync::RwLock;
use uuid::Uuid;

use super::client::{AuthCore, CoreError, CoreResult};
use super::types::{
    AuthResult, Identity, NewAccount, SESSION_TTL_SECONDS, Session, TokenPair, UserId,
};

const REFRESH_TOKEN_TTL_SECONDS: u64 = 30 * 24 * 60 * 60;
const MAX_TTL_SECONDS: u64 = 10 * 365 * 24 * 60 * 60;
const SALT_LEN: usize = 16;

/// Which result shape the in-memory core issues.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IssueMode {
    Session,
    TokenPair,
}

impl FromStr for IssueMode {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "session" => Ok(Self::Session),
            "token" | "token_pair" | "api" => Ok(Self::TokenPair),
            _ => Err(()),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum TokenKind {
    Access,
    Refresh,
    Session,
}

#[derive(Debug, Clone)]
struct IssuedToken {
    user_id: UserId,
    kind: TokenKind,
    expires_at: DateTime<Utc>,
    // refresh tokens remember the access token issued alongside them
    paired_access: Option<String>,
}

impl IssuedToken {
    fn is_live(&self, now: DateTime<Utc>) -> bool {
        self.expires_at > now
    }
}

#[derive(Debug, Default)]
struct Store {
    users: HashMap<UserId, Identity>,
    by_email: HashMap<String, UserId>,
    tokens: HashMap<String, IssuedToken>,
}

/// Process-local auth core for development and tests.
///
/// Tokens are random UUIDs; passwords are kept as Argon2 PHC strings in
/// `Identity::password_hash`. Expired tokens are pruned whenever new ones are
/// issued. Nothing survives a restart.
#[derive(Clone, Debug)]
pub struct InMemoryCore {
    mode: IssueMode,
    access_token_ttl: TimeDelta,
    store: Arc<RwLock<Store>>,
}

impl InMemoryCore {
    pub fn new(mode: IssueMode, access_token_ttl_seconds: u64) -> Self {
        Self {
            mode,
            access_token_ttl: seconds(access_token_ttl_seconds),
            store: Arc::new(RwLock::new(Store::default())),
        }
    }

    pub fn mode(&self) -> IssueMode {
        self.mode
    }

    fn issue(&self, store: &mut Store, user: Identity) -> AuthResult {
        let now = Utc::now();
        store.tokens.retain(|_, t| t.is_live(now));

        match self.mode {
            IssueMode::Session => {
                let token = new_token();
                let expires_at = now + seconds(SESSION_TTL_SECONDS);
                store.tokens.insert(
                    token.clone(),
                    IssuedToken {
                        user_id: user.id.clone(),
                        kind: TokenKind::Session,
                        expires_at,
                        paired_access: None,
                    },
                );

                AuthResult::Session {
                    session: Session {
                        token,
                        expires_at: Some(expires_at),
                    },
                    user,
                }
            }
            IssueMode::TokenPair => {
                let access_token = new_token();
                let refresh_token = new_token();
                store.tokens.insert(
                    access_token.clone(),
                    IssuedToken {
                        user_id: user.id.clone(),
                        kind: TokenKind::Access,
                        expires_at: now + self.access_token_ttl,
                        paired_access: None,
                    },
                );
                store.tokens.insert(
                    refresh_token.clone(),
                    IssuedToken {
                        user_id: user.id.clone(),
                        kind: TokenKind::Refresh,
                        expires_at: now + seconds(REFRESH_TOKEN_TTL_SECONDS),
                        paired_access: Some(access_token.clone()),
                    },
                );

                AuthResult::TokenPair(TokenPair {
                    access_token,
                    refresh_token: Some(refresh_token),
                    expires_in: Some(self.access_token_ttl.num_seconds().max(0) as u64),
                    token_type: Some("Bearer".to_string()),
                    user,
                })
            }
        }
    }
}

#[async_trait]
impl AuthCore for InMemoryCore {
    fn backend_name(&self) -> &'static str {
        "memory"
    }

    async fn lookup_identity_by_token(&self, token: &str) -> CoreResult<Option<Identity>> {
        let store = self.store.read().await;

        let identity = store
            .tokens
            .get(token)
            .filter(|t| matches!(t.kind, TokenKind::Access | TokenKind::Session))
            .filter(|t| t.is_live(Utc::now()))
            .and_then(|t| store.users.get(&t.user_id))
            .cloned();

        Ok(identity)
    }

    async fn login(&self, email: &str, password: &str) -> CoreResult<AuthResult> {
        let candidate = {
            let store = self.store.read().await;
            store
                .by_email
                .get(&normalize_email(email))
                .and_then(|id| store.users.get(id))
                .cloned()
        };

        // hash check runs outside the lock
        let user = candidate
            .filter(|user| {
                user.password_hash
                    .as_deref()
                    .is_some_and(|stored| verify_password(stored, password))
            })
            .ok_or(CoreError::InvalidCredentials)?;

        let mut store = self.store.write().await;
        Ok(self.issue(&mut store, user))
    }

    async fn register(&self, account: &NewAccount) -> CoreResult<AuthResult> {
        let email = normalize_email(&account.email);
        let password_hash = hash_password(&account.password)?;
        let mut store = self.store.write().await;

        if store.by_email.contains_key(&email) {
            return Err(CoreError::EmailTaken);
        }

        let now = Utc::now();
        let user = Identity {
            id: UserId::from(Uuid::new_v4().to_string()),
            email: email.clone(),
            name: account.name.clone(),
            email_verified: false,
            created_at: now,
            updated_at: now,
            password_hash: Some(password_hash),
        };

        store.by_email.insert(email, user.id.clone());
        store.users.insert(user.id.clone(), user.clone());

        Ok(self.issue(&mut store, user))
    }

    async fn refresh(&self, refresh_token: &str) -> CoreResult<AuthResult> {
        // session mode hands the session token out as the refresh token
        let accepted = match self.mode {
            IssueMode::Session => TokenKind::Session,
            IssueMode::TokenPair => TokenKind::Refresh,
        };

        let mut store = self.store.write().await;

        let issued = store
            .tokens
            .get(refresh_token)
            .filter(|t| t.kind == accepted && t.is_live(Utc::now()))
            .cloned()
            .ok_or(CoreError::InvalidCredentials)?;
        store.tokens.remove(refresh_token);
        if let Some(access) = &issued.paired_access {
            store.tokens.remove(access);
        }

        let user = store
            .users
            .get(&issued.user_id)
            .cloned()
            .ok_or(CoreError::InvalidCredentials)?;

        Ok(self.issue(&mut store, user))
    }
}

fn new_token() -> String {
    Uuid::new_v4().simple().to_string()
}

fn seconds(n: u64) -> TimeDelta {
    TimeDelta::try_seconds(n.min(MAX_TTL_SECONDS) as i64).unwrap_or_else(TimeDelta::zero)
}

fn normalize_email(email: &str) -> String {
    email.trim().to_ascii_lowercase()
}

fn hash_password(password: &str) -> CoreResult<String> {
    let mut salt_bytes = [0u8; SALT_LEN];
    getrandom::getrandom(&mut salt_bytes).map_err(|e| CoreError::Internal(e.to_string()))?;
    let salt =
        SaltString::encode_b64(&salt_bytes).map_err(|e| CoreError::Internal(e.to_string()))?;

    let phc = Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| CoreError::Internal(e.to_string()))?
        .to_string();
    Ok(phc)
}

fn verify_password(stored: &str, password: &str) -> bool {
    PasswordHash::new(stored).is_ok_and(|parsed| {
        Argon2::default()
            .verify_password(password.as_bytes(), &parsed)
            .is_ok()
    })
}
