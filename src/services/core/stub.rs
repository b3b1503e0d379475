//! Scriptable `AuthCore` for unit tests.
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use chrono::{TimeZone, Utc};
use uuid::Uuid;

use super::client::{AuthCore, CoreError, CoreResult};
use super::types::{AuthResult, Identity, NewAccount, UserId};

pub(crate) fn identity(email: &str) -> Identity {
    let created = Utc.with_ymd_and_hms(2024, 1, 15, 10, 30, 0).unwrap();
    Identity {
        id: UserId::from(Uuid::new_v4().to_string()),
        email: email.to_string(),
        name: Some("Ada Lovelace".to_string()),
        email_verified: true,
        created_at: created,
        updated_at: created,
        password_hash: Some("salt$digest".to_string()),
    }
}

/// Known tokens resolve; everything else is `None`. Counts lookups.
#[derive(Default)]
pub(crate) struct StubCore {
    identities: HashMap<String, Identity>,
    failing: bool,
    lookups: AtomicUsize,
}

impl StubCore {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn with_token(mut self, token: &str, identity: Identity) -> Self {
        self.identities.insert(token.to_string(), identity);
        self
    }

    /// Every lookup fails as if the backend were down.
    pub(crate) fn failing() -> Self {
        Self {
            failing: true,
            ..Self::default()
        }
    }

    pub(crate) fn lookups(&self) -> usize {
        self.lookups.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl AuthCore for StubCore {
    fn backend_name(&self) -> &'static str {
        "stub"
    }

    async fn lookup_identity_by_token(&self, token: &str) -> CoreResult<Option<Identity>> {
        self.lookups.fetch_add(1, Ordering::SeqCst);
        if self.failing {
            return Err(CoreError::Unavailable("stub backend down".to_string()));
        }
        Ok(self.identities.get(token).cloned())
    }

    async fn login(&self, _email: &str, _password: &str) -> CoreResult<AuthResult> {
        Err(CoreError::InvalidCredentials)
    }

    async fn register(&self, _account: &NewAccount) -> CoreResult<AuthResult> {
        Err(CoreError::EmailTaken)
    }

    async fn refresh(&self, _refresh_token: &str) -> CoreResult<AuthResult> {
        Err(CoreError::Unavailable("stub backend down".to_string()))
    }
}
