/*
 * Responsibility
 * - /users/me: the caller's own identity
 * - Mounted behind the access middleware, so AuthUser is already resolved
 */
use axum::Json;

use crate::api::v1::{dto::users::UserView, extractors::AuthUser};

pub async fn me(AuthUser(ctx): AuthUser) -> Json<UserView> {
    Json(UserView::from(&ctx.identity))
}
