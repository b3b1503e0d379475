/// Factory: build the `AuthCore` backend from application `Config`.
use std::sync::Arc;

use crate::config::Config;
use crate::error::AppError;
use crate::services::core::{AuthCore, InMemoryCore, RemoteCore};

pub fn build_auth_core(config: &Config) -> Result<Arc<dyn AuthCore>, AppError> {
    match config.core_url.as_deref() {
        Some(url) => {
            let core = RemoteCore::new(url).map_err(|e| {
                tracing::error!(error = %e, "failed to build remote auth core client");
                AppError::Internal
            })?;
            tracing::info!(url, "using remote auth core");
            Ok(Arc::new(core))
        }
        None => {
            let core = InMemoryCore::new(config.issue_mode, config.access_token_ttl_seconds);
            tracing::warn!(mode = ?core.mode(), "using in-memory auth core (development only)");
            Ok(Arc::new(core))
        }
    }
}
