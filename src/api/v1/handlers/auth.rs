/*
 * Responsibility
 * - /auth/register, /auth/login, /auth/refresh: ValidatedJson → core → AuthResponse
 * - /auth/session: optional resolution, never 401
 */
use axum::{Json, extract::State, http::StatusCode};

use crate::{
    api::v1::{
        dto::{
            auth::{AuthResponse, LoginRequest, RefreshRequest, RegisterRequest, SessionResponse},
            users::UserView,
        },
        extractors::{AuthUser, ValidatedJson},
    },
    error::AppError,
    state::AppState,
};

pub async fn register(
    State(state): State<AppState>,
    ValidatedJson(req): ValidatedJson<RegisterRequest>,
) -> Result<(StatusCode, Json<AuthResponse>), AppError> {
    let result = state.core.register(&req.into_account()).await?;
    tracing::info!(user_id = %result.user().id, "account registered");

    Ok((StatusCode::CREATED, Json(AuthResponse::from(result))))
}

pub async fn login(
    State(state): State<AppState>,
    ValidatedJson(req): ValidatedJson<LoginRequest>,
) -> Result<Json<AuthResponse>, AppError> {
    let result = state.core.login(req.email.trim(), &req.password).await?;
    tracing::info!(user_id = %result.user().id, "login succeeded");

    Ok(Json(AuthResponse::from(result)))
}

pub async fn refresh(
    State(state): State<AppState>,
    ValidatedJson(req): ValidatedJson<RefreshRequest>,
) -> Result<Json<AuthResponse>, AppError> {
    let result = state.core.refresh(&req.refresh_token).await?;

    Ok(Json(AuthResponse::from(result)))
}

pub async fn session(user: Option<AuthUser>) -> Json<SessionResponse> {
    let user = user.map(|AuthUser(ctx)| UserView::from(&ctx.identity));

    Json(SessionResponse {
        authenticated: user.is_some(),
        user,
    })
}
