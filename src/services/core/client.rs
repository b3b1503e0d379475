//! Auth core interface used by the resolver and the auth handlers.
use async_trait::async_trait;
use thiserror::Error;

use super::types::{AuthResult, Identity, NewAccount};

/// Result type for core operations.
pub type CoreResult<T> = Result<T, CoreError>;

/// Core-layer errors.
///
/// `InvalidCredentials` / `EmailTaken` are answers; `Unavailable` /
/// `InvalidResponse` mean the core could not give one; `Internal` is a local
/// fault in an in-process core. Kept independent from
/// `AppError` so callers decide how each maps to HTTP.
#[derive(Debug, Error)]
pub enum CoreError {
    #[error("invalid credentials")]
    InvalidCredentials,
    #[error("email already registered")]
    EmailTaken,
    #[error("auth core unavailable: {0}")]
    Unavailable(String),
    #[error("auth core returned an unexpected response: {0}")]
    InvalidResponse(String),
    #[error("auth core internal error: {0}")]
    Internal(String),
}

/// The opaque authentication engine.
///
/// Token validation, expiry and revocation all live behind this trait.
/// Implementations must be shareable across requests (`Arc<dyn AuthCore>`).
#[async_trait]
pub trait AuthCore: Send + Sync + 'static {
    // Returns the backend name (for logging).
    fn backend_name(&self) -> &'static str;

    // Resolve a raw token to the identity it belongs to.
    //
    // Returns:
    // - `Ok(Some(_))` token is valid
    // - `Ok(None)`    unknown / expired / revoked token
    // - `Err(_)`      the core itself failed
    async fn lookup_identity_by_token(&self, token: &str) -> CoreResult<Option<Identity>>;

    async fn login(&self, email: &str, password: &str) -> CoreResult<AuthResult>;

    async fn register(&self, account: &NewAccount) -> CoreResult<AuthResult>;

    async fn refresh(&self, refresh_token: &str) -> CoreResult<AuthResult>;
}
