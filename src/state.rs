/*
 * Responsibility
 * - Shared context bound to the Router (AppState)
 *   - core: the auth core, resolver: credential -> identity, cookie_name
 * - Cheap to Clone (everything inside is Arc)
 */
use std::sync::Arc;

use crate::services::auth::IdentityResolver;
use crate::services::core::AuthCore;

#[derive(Clone)]
pub struct AppState {
    pub core: Arc<dyn AuthCore>,
    pub resolver: IdentityResolver,
    pub cookie_name: Arc<str>,
}

impl AppState {
    pub fn new(core: Arc<dyn AuthCore>, cookie_name: &str) -> Self {
        Self {
            resolver: IdentityResolver::new(core.clone()),
            core,
            cookie_name: Arc::from(cookie_name),
        }
    }
}
