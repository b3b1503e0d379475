/*
 * Responsibility
 * - Public view of an Identity
 * - Exactly six fields; timestamps as RFC 3339 with numeric offset
 */
use chrono::{DateTime, SecondsFormat, Utc};
use serde::Serialize;
use crate::services::core::{Identity, UserId};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserView {
    pub id: UserId,
    pub email: String,
    pub name: Option<String>,
    pub email_verified: bool,
    pub created_at: String,
    pub updated_at: String,
}

impl From<&Identity> for UserView {
    fn from(identity: &Identity) -> Self {
        Self {
            id: identity.id.clone(),
            email: identity.email.clone(),
            name: identity.name.clone(),
            email_verified: identity.email_verified,
            created_at: format_timestamp(&identity.created_at),
            updated_at: format_timestamp(&identity.updated_at),
        }
    }
}

// 2024-01-15T10:30:00+00:00
pub fn format_timestamp(ts: &DateTime<Utc>) -> String {
    ts.to_rfc3339_opts(SecondsFormat::Secs, false)
}
