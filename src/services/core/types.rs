/*
 * Responsibility
 * - Types exchanged with the auth core (Identity / AuthResult / NewAccount)
 * - Classifying a raw core result into session or token-pair shape
 */
use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Lifetime of a core session, in seconds (7 days).
pub const SESSION_TTL_SECONDS: u64 = 7 * 24 * 60 * 60;

/// Identity id as the core reports it. Cores differ (integers, UUIDs,
/// prefixed strings), so it is kept opaque and rendered back unchanged.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum UserId {
    Num(i64),
    Str(String),
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Num(n) => write!(f, "{n}"),
            Self::Str(s) => f.write_str(s),
        }
    }
}

impl From<String> for UserId {
    fn from(s: String) -> Self {
        Self::Str(s)
    }
}

/// Authenticated principal as reported by the core.
///
/// Not `Serialize`: responses go through `UserView`, which exposes a fixed subset.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Identity {
    pub id: UserId,
    pub email: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default, alias = "emailVerified")]
    pub email_verified: bool,
    #[serde(alias = "createdAt")]
    pub created_at: DateTime<Utc>,
    #[serde(alias = "updatedAt")]
    pub updated_at: DateTime<Utc>,
    /// Core-internal. Never rendered.
    #[serde(default)]
    pub password_hash: Option<String>,
}

/// Session issued by the core in session mode.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Session {
    pub token: String,
    #[serde(default)]
    pub expires_at: Option<DateTime<Utc>>,
}

/// Token pair issued by the core in API mode.
///
/// `expires_in` / `token_type` are optional on the wire; defaults are applied
/// when the result is rendered.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct TokenPair {
    pub access_token: String,
    #[serde(default)]
    pub refresh_token: Option<String>,
    #[serde(default)]
    pub expires_in: Option<u64>,
    #[serde(default)]
    pub token_type: Option<String>,
    pub user: Identity,
}

/// Output of login / register / refresh.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthResult {
    Session { session: Session, user: Identity },
    TokenPair(TokenPair),
}

#[derive(Deserialize)]
struct SessionEnvelope {
    session: Session,
    user: Identity,
}

impl AuthResult {
    /// Classify a raw JSON result.
    ///
    /// A `session` key without an `access_token` key is session mode; anything
    /// else is read as a token pair.
    pub fn from_json(value: serde_json::Value) -> Result<Self, serde_json::Error> {
        let is_session = value.get("session").is_some() && value.get("access_token").is_none();

        if is_session {
            let SessionEnvelope { session, user } = serde_json::from_value(value)?;
            Ok(Self::Session { session, user })
        } else {
            serde_json::from_value(value).map(Self::TokenPair)
        }
    }

    pub fn user(&self) -> &Identity {
        match self {
            Self::Session { user, .. } => user,
            Self::TokenPair(pair) => &pair.user,
        }
    }
}

/// Registration input handed to the core.
#[derive(Debug, Clone)]
pub struct NewAccount {
    pub email: String,
    pub password: String,
    pub name: Option<String>,
}
