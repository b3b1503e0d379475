/*
 * Responsibility
 * - The authenticated context handlers see
 * - Produced by the resolver (via middleware or extractor); handlers only receive this type
 *
 * Notes
 * - Token validation lives in the auth core, not here
 * - Fixed as a contract, separate from the resolution plumbing
 */
use crate::services::core::{Identity, UserId};

/// Context attached to an authenticated request.
///
/// Immutable for the rest of the request once resolved.
#[derive(Debug, Clone)]
pub struct AuthCtx {
    pub identity: Identity,
}

impl AuthCtx {
    pub fn new(identity: Identity) -> Self {
        Self { identity }
    }

    pub fn user_id(&self) -> &UserId {
        &self.identity.id
    }
}
