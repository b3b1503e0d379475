/*
 * Responsibility
 * - Pull the raw credential out of a request's headers
 *   1. `Authorization: Bearer <token>` (exact, case-sensitive prefix)
 *   2. cookie `<cookie_name>` (default `access_token`)
 * - Never fails: absence is `None`
 */
use axum::http::{
    HeaderMap,
    header::{AUTHORIZATION, COOKIE},
};

pub const BEARER_PREFIX: &str = "Bearer ";
pub const DEFAULT_COOKIE_NAME: &str = "access_token";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CredentialSource {
    Header,
    Cookie,
}

/// Opaque token as submitted by the client, untouched.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Credential {
    pub token: String,
    pub source: CredentialSource,
}

impl Credential {
    pub fn as_str(&self) -> &str {
        &self.token
    }
}

/// Header wins over cookie when both are present.
pub fn extract(headers: &HeaderMap, cookie_name: &str) -> Option<Credential> {
    if let Some(token) = bearer_token(headers) {
        return Some(Credential {
            token: token.to_string(),
            source: CredentialSource::Header,
        });
    }

    cookie_value(headers, cookie_name).map(|token| Credential {
        token: token.to_string(),
        source: CredentialSource::Cookie,
    })
}

fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(AUTHORIZATION)?
        .to_str()
        .ok()?
        .strip_prefix(BEARER_PREFIX)
}

fn cookie_value<'a>(headers: &'a HeaderMap, name: &str) -> Option<&'a str> {
    headers
        .get_all(COOKIE)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .flat_map(|v| v.split(';'))
        .find_map(|pair| {
            let (key, value) = pair.trim_start().split_once('=')?;
            (key.trim() == name).then_some(value)
        })
}
