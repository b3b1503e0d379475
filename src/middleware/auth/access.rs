//! Required resolution for a whole route group → AuthCtx in request extensions.
//!
//! - credential (`Authorization: Bearer` / cookie) → resolver → core lookup (once)
//! - Resolved: `AuthCtx` is inserted and the `AuthUser` extractor reuses it
//! - Failed: short-circuits with the 401 body; the handler never runs
//! - core error: 503

use axum::{
    Router,
    body::Body,
    extract::State,
    http::Request,
    middleware::{self, Next},
    response::Response,
};

use crate::api::v1::extractors::AuthCtx;
use crate::error::AppError;
use crate::services::auth::credential;
use crate::state::AppState;

/// Apply the required-auth middleware to every route of `router`.
///
/// Example:
/// ```ignore
/// let me = Router::new().route("/users/me", get(me));
/// let me = middleware::auth::access::apply(me, state.clone());
/// ```
pub fn apply(router: Router<AppState>, state: AppState) -> Router<AppState> {
    // route_layer: unmatched paths still 404 instead of 401
    router.route_layer(middleware::from_fn_with_state(state, access_middleware))
}

async fn access_middleware(
    State(state): State<AppState>,
    mut req: Request<Body>,
    next: Next,
) -> Result<Response, AppError> {
    let credential = credential::extract(req.headers(), &state.cookie_name);

    let identity = state
        .resolver
        .resolve(credential.as_ref(), false)
        .await?
        .into_identity()?
        .ok_or_else(AppError::authentication_required)?;

    let ctx = AuthCtx::new(identity);
    tracing::debug!(user_id = %ctx.user_id(), "request authenticated");

    // middleware → extractor hand-off
    req.extensions_mut().insert(ctx);

    Ok(next.run(req).await)
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use axum::{
        body::to_bytes,
        http::{StatusCode, header},
        routing::get,
    };
    use tower::ServiceExt;

    use super::*;
    use crate::api::v1::extractors::AuthUser;
    use crate::services::core::stub::{StubCore, identity};

    async fn whoami(AuthUser(ctx): AuthUser) -> String {
        ctx.identity.email
    }

    fn app(core: Arc<StubCore>) -> Router {
        let state = AppState::new(core, "access_token");
        let protected = apply(Router::new().route("/whoami", get(whoami)), state.clone());
        protected.with_state(state)
    }

    fn request(authorization: Option<&str>) -> Request<Body> {
        let mut builder = Request::builder().uri("/whoami");
        if let Some(value) = authorization {
            builder = builder.header(header::AUTHORIZATION, value);
        }
        builder.body(Body::empty()).unwrap()
    }

    #[tokio::test]
    async fn authenticated_request_reaches_handler_with_single_lookup() {
        let core = Arc::new(StubCore::new().with_token("good", identity("ada@example.com")));

        let response = app(core.clone())
            .oneshot(request(Some("Bearer good")))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        assert_eq!(&body[..], b"ada@example.com");
        // the extractor reused the middleware's AuthCtx
        assert_eq!(core.lookups(), 1);
    }

    #[tokio::test]
    async fn missing_token_short_circuits() {
        let core = Arc::new(StubCore::new());

        let response = app(core.clone()).oneshot(request(None)).await.unwrap();

        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(core.lookups(), 0);
    }

    #[tokio::test]
    async fn invalid_token_short_circuits() {
        let core = Arc::new(StubCore::new());

        let response = app(core).oneshot(request(Some("Bearer stale"))).await.unwrap();

        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn core_outage_is_503() {
        let response = app(Arc::new(StubCore::failing()))
            .oneshot(request(Some("Bearer good")))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
    }
}
