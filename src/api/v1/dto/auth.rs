/*
 * Responsibility
 * - Request DTOs for the auth routes, validated through `validator` derives
 * - AuthResponse: one public shape for both session and token-pair results
 */
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::api::v1::dto::users::UserView;
use crate::services::core::{AuthResult, NewAccount, SESSION_TTL_SECONDS};

pub const DEFAULT_EXPIRES_IN: u64 = 3600;
pub const DEFAULT_TOKEN_TYPE: &str = "Bearer";

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AuthResponse {
    pub access_token: String,
    pub refresh_token: Option<String>,
    pub expires_in: u64,
    pub token_type: String,
    pub user: UserView,
}

impl From<AuthResult> for AuthResponse {
    fn from(result: AuthResult) -> Self {
        match result {
            // session mode: the session token doubles as both tokens
            AuthResult::Session { session, user } => Self {
                access_token: session.token.clone(),
                refresh_token: Some(session.token),
                expires_in: SESSION_TTL_SECONDS,
                token_type: DEFAULT_TOKEN_TYPE.to_string(),
                user: UserView::from(&user),
            },
            AuthResult::TokenPair(pair) => Self {
                access_token: pair.access_token,
                refresh_token: pair.refresh_token,
                expires_in: pair.expires_in.unwrap_or(DEFAULT_EXPIRES_IN),
                token_type: pair
                    .token_type
                    .unwrap_or_else(|| DEFAULT_TOKEN_TYPE.to_string()),
                user: UserView::from(&pair.user),
            },
        }
    }
}

/// `GET /auth/session` body.
#[derive(Debug, Serialize)]
pub struct SessionResponse {
    pub authenticated: bool,
    pub user: Option<UserView>,
}

#[derive(Debug, Deserialize, Validate)]
pub struct LoginRequest {
    #[serde(default)]
    #[validate(email(message = "Email is invalid"))]
    pub email: String,
    #[serde(default)]
    #[validate(length(min = 1, message = "Password is required"))]
    pub password: String,
}

#[derive(Debug, Deserialize, Validate)]
pub struct RegisterRequest {
    #[serde(default)]
    #[validate(email(message = "Email is invalid"))]
    pub email: String,
    #[serde(default)]
    #[validate(length(min = 8, message = "Password must be at least 8 characters"))]
    pub password: String,
    #[validate(length(max = 100, message = "Name must be at most 100 characters"))]
    pub name: Option<String>,
}

impl RegisterRequest {
    pub fn into_account(self) -> NewAccount {
        NewAccount {
            email: self.email.trim().to_string(),
            password: self.password,
            name: self
                .name
                .map(|n| n.trim().to_string())
                .filter(|n| !n.is_empty()),
        }
    }
}

#[derive(Debug, Deserialize, Validate)]
pub struct RefreshRequest {
    #[serde(default)]
    #[validate(length(min = 1, message = "Refresh token is required"))]
    pub refresh_token: String,
}
