/*
 * Responsibility
 * - URL layout of v1
 * - /health and the /auth routes are public (session resolves optionally)
 * - /users routes sit behind the required-auth middleware
 */
use axum::{
    Router,
    routing::{get, post},
};

use crate::api::v1::handlers::{auth, health::health, users};
use crate::middleware::auth::access;
use crate::state::AppState;

pub fn routes(state: AppState) -> Router<AppState> {
    let public = Router::new()
        .route("/health", get(health))
        .route("/auth/register", post(auth::register))
        .route("/auth/login", post(auth::login))
        .route("/auth/refresh", post(auth::refresh))
        .route("/auth/session", get(auth::session));

    let protected = access::apply(Router::new().route("/users/me", get(users::me)), state);

    public.merge(protected)
}
