//! Auth core reached over HTTP.
//!
//! Wire contract (all `POST`, JSON bodies):
//! - `/lookup`   `{token}` -> `{user: Identity | null}`
//! - `/login`    `{email, password}` -> auth result
//! - `/register` `{email, password, name}` -> auth result
//! - `/refresh`  `{refresh_token}` -> auth result
//!
//! Auth results are classified with `AuthResult::from_json`.
//! No client-side timeout: the HTTP layer's request deadline bounds the call.
use async_trait::async_trait;
use reqwest::StatusCode;
use serde::Deserialize;
use serde_json::{Value, json};

use super::client::{AuthCore, CoreError, CoreResult};
use super::types::{AuthResult, Identity, NewAccount};

#[derive(Deserialize)]
struct LookupResponse {
    #[serde(default)]
    user: Option<Identity>,
}

#[derive(Clone, Debug)]
pub struct RemoteCore {
    client: reqwest::Client,
    base_url: String,
}

impl RemoteCore {
    // Create a client for a base URL like `http://auth-core:8080/v1`
    pub fn new(base_url: &str) -> CoreResult<Self> {
        let client = reqwest::Client::builder()
            .build()
            .map_err(|e| CoreError::Unavailable(e.to_string()))?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    async fn post(&self, path: &str, body: Value) -> CoreResult<reqwest::Response> {
        self.client
            .post(format!("{}{}", self.base_url, path))
            .json(&body)
            .send()
            .await
            .map_err(|e| CoreError::Unavailable(e.to_string()))
    }

    async fn auth_call(&self, path: &str, body: Value) -> CoreResult<AuthResult> {
        let resp = self.post(path, body).await?;

        match resp.status() {
            status if status.is_success() => {
                let value: Value = resp
                    .json()
                    .await
                    .map_err(|e| CoreError::InvalidResponse(e.to_string()))?;

                AuthResult::from_json(value).map_err(|e| CoreError::InvalidResponse(e.to_string()))
            }
            StatusCode::UNAUTHORIZED => Err(CoreError::InvalidCredentials),
            StatusCode::CONFLICT => Err(CoreError::EmailTaken),
            status => Err(CoreError::Unavailable(format!("{path} returned {status}"))),
        }
    }
}

#[async_trait]
impl AuthCore for RemoteCore {
    fn backend_name(&self) -> &'static str {
        "remote"
    }

    async fn lookup_identity_by_token(&self, token: &str) -> CoreResult<Option<Identity>> {
        let resp = self.post("/lookup", json!({ "token": token })).await?;

        match resp.status() {
            status if status.is_success() => {
                let body: LookupResponse = resp
                    .json()
                    .await
                    .map_err(|e| CoreError::InvalidResponse(e.to_string()))?;
                Ok(body.user)
            }
            // the core's way of saying "no such token"
            StatusCode::UNAUTHORIZED | StatusCode::NOT_FOUND => Ok(None),
            status => Err(CoreError::Unavailable(format!("/lookup returned {status}"))),
        }
    }

    async fn login(&self, email: &str, password: &str) -> CoreResult<AuthResult> {
        self.auth_call("/login", json!({ "email": email, "password": password }))
            .await
    }

    async fn register(&self, account: &NewAccount) -> CoreResult<AuthResult> {
        self.auth_call(
            "/register",
            json!({
                "email": account.email,
                "password": account.password,
                "name": account.name,
            }),
        )
        .await
    }

    async fn refresh(&self, refresh_token: &str) -> CoreResult<AuthResult> {
        self.auth_call("/refresh", json!({ "refresh_token": refresh_token }))
            .await
    }
}
