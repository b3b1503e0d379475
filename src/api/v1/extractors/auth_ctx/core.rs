use axum::extract::{FromRequestParts, OptionalFromRequestParts};
use axum::http::request::Parts;

use crate::error::AppError;
use crate::services::auth::credential;
use crate::state::AppState;

use super::AuthCtx;

/// Extractor that hands the handler an `AuthCtx`.
///
/// - `AuthUser`: resolution is mandatory; missing/invalid credentials reject with 401.
/// - `Option<AuthUser>`: resolution is optional; missing/invalid credentials give `None`.
///
/// Either way a core failure rejects with 503. If the access middleware already
/// resolved the request, its `AuthCtx` is reused and the core is not asked again.
#[derive(Debug, Clone)]
pub struct AuthUser(pub AuthCtx);

async fn resolve_parts(
    parts: &Parts,
    state: &AppState,
    optional: bool,
) -> Result<Option<AuthCtx>, AppError> {
    if let Some(ctx) = parts.extensions.get::<AuthCtx>() {
        return Ok(Some(ctx.clone()));
    }

    let credential = credential::extract(&parts.headers, &state.cookie_name);
    let identity = state
        .resolver
        .resolve(credential.as_ref(), optional)
        .await?
        .into_identity()?;

    Ok(identity.map(AuthCtx::new))
}

impl FromRequestParts<AppState> for AuthUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        resolve_parts(parts, state, false)
            .await?
            .map(AuthUser)
            .ok_or_else(AppError::authentication_required)
    }
}

impl OptionalFromRequestParts<AppState> for AuthUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Option<Self>, Self::Rejection> {
        Ok(resolve_parts(parts, state, true).await?.map(AuthUser))
    }
}
