/*
 * Responsibility
 * - tracing / panic hook setup
 * - Config → auth core → AppState → Router
 * - Router-level middleware (CORS / HTTP layers)
 * - axum::serve()
 */
use std::{panic, process, time::Duration};

use anyhow::Result;
use axum::Router;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::{api, config::Config, middleware, services::core::build_auth_core, state::AppState};

fn init_tracing() {
    // RUST_LOG wins when set, e.g. RUST_LOG=info,authgate=debug,tower_http=debug
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info,tower_http=info"));

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer())
        .init();
}

fn init_panic_hook(abort_on_panic: bool) {
    let default_hook = panic::take_hook();

    panic::set_hook(Box::new(move |info| {
        tracing::error!(?info, "panic");

        // development: crash loudly; production: default hook, keep serving
        if abort_on_panic {
            process::abort();
        } else {
            default_hook(info);
        }
    }))
}

pub async fn run() -> Result<()> {
    init_tracing();
    let config = Config::from_env()?;
    init_panic_hook(!config.app_env.is_production());

    tracing::info!(
        "starting authgate in {:?} mode on {}",
        config.app_env,
        config.addr
    );

    let core = build_auth_core(&config)?;
    let state = AppState::new(core, &config.cookie_name);
    let app = build_router(state, &config);

    let listener = tokio::net::TcpListener::bind(config.addr).await?;
    axum::serve(listener, app).await?;
    Ok(())
}

pub fn build_router(state: AppState, config: &Config) -> Router {
    let router = Router::new()
        .nest("/api/v1", api::v1::routes(state.clone()))
        .with_state(state);

    let router = middleware::cors::apply(router, config);
    middleware::http::apply(
        router,
        Duration::from_secs(config.request_timeout_seconds),
    )
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use axum::{
        body::{Body, to_bytes},
        http::{Method, Request, StatusCode, header},
    };
    use serde_json::{Value, json};
    use tower::ServiceExt;

    use super::*;
    use crate::services::core::{InMemoryCore, IssueMode};

    fn config() -> Config {
        Config::from_lookup(|_| None).unwrap()
    }

    fn app(mode: IssueMode) -> Router {
        let core = Arc::new(InMemoryCore::new(mode, 3600));
        build_router(AppState::new(core, "access_token"), &config())
    }

    async fn send(app: &Router, req: Request<Body>) -> (StatusCode, Value) {
        let response = app.clone().oneshot(req).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let body = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap()
        };
        (status, body)
    }

    fn post_json(uri: &str, body: Value) -> Request<Body> {
        Request::builder()
            .method(Method::POST)
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    fn get(uri: &str, token: Option<&str>) -> Request<Body> {
        let mut builder = Request::builder().uri(uri);
        if let Some(token) = token {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
        }
        builder.body(Body::empty()).unwrap()
    }

    fn registration() -> Value {
        json!({ "email": "ada@example.com", "password": "correct horse", "name": "Ada" })
    }

    #[tokio::test]
    async fn health_is_public_and_gets_request_id() {
        let response = app(IssueMode::TokenPair)
            .oneshot(get("/api/v1/health", None))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert!(response.headers().contains_key("x-request-id"));
    }

    #[tokio::test]
    async fn register_login_and_me_in_token_pair_mode() {
        let app = app(IssueMode::TokenPair);

        let (status, body) = send(&app, post_json("/api/v1/auth/register", registration())).await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(body["token_type"], "Bearer");
        assert_eq!(body["expires_in"], 3600);
        assert_ne!(body["access_token"], body["refresh_token"]);
        assert_eq!(body["user"]["email"], "ada@example.com");
        assert!(body["user"].get("password_hash").is_none());

        let (status, body) = send(
            &app,
            post_json(
                "/api/v1/auth/login",
                json!({ "email": "ada@example.com", "password": "correct horse" }),
            ),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        let token = body["access_token"].as_str().unwrap().to_string();

        let (status, me) = send(&app, get("/api/v1/users/me", Some(&token))).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(me["email"], "ada@example.com");
        assert_eq!(me["name"], "Ada");
        assert_eq!(me.as_object().unwrap().len(), 6);
    }

    #[tokio::test]
    async fn session_mode_issues_one_token_for_seven_days() {
        let app = app(IssueMode::Session);

        let (status, body) = send(&app, post_json("/api/v1/auth/register", registration())).await;

        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(body["expires_in"], 604_800);
        assert_eq!(body["access_token"], body["refresh_token"]);

        let refresh = body["refresh_token"].as_str().unwrap();
        let (status, renewed) = send(
            &app,
            post_json("/api/v1/auth/refresh", json!({ "refresh_token": refresh })),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_ne!(renewed["access_token"], body["access_token"]);
    }

    #[tokio::test]
    async fn users_me_requires_a_token() {
        let (status, body) = send(&app(IssueMode::TokenPair), get("/api/v1/users/me", None)).await;

        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body, json!({ "message": "no token provided" }));
    }

    #[tokio::test]
    async fn session_endpoint_is_optional() {
        let app = app(IssueMode::TokenPair);

        let (status, body) = send(&app, get("/api/v1/auth/session", Some("stale"))).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!({ "authenticated": false, "user": null }));

        let (_, registered) =
            send(&app, post_json("/api/v1/auth/register", registration())).await;
        let cookie = format!(
            "access_token={}",
            registered["access_token"].as_str().unwrap()
        );
        let req = Request::builder()
            .uri("/api/v1/auth/session")
            .header(header::COOKIE, cookie)
            .body(Body::empty())
            .unwrap();

        let (status, body) = send(&app, req).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["authenticated"], true);
        assert_eq!(body["user"]["email"], "ada@example.com");
    }

    #[tokio::test]
    async fn invalid_payloads_are_400_with_field_errors() {
        let app = app(IssueMode::TokenPair);

        let (status, body) = send(
            &app,
            post_json("/api/v1/auth/register", json!({ "email": "nope", "password": "x" })),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["message"], "Validation failed");
        assert_eq!(body["errors"]["email"], json!(["Email is invalid"]));
        assert_eq!(
            body["errors"]["password"],
            json!(["Password must be at least 8 characters"])
        );

        let malformed = Request::builder()
            .method(Method::POST)
            .uri("/api/v1/auth/login")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from("{not json"))
            .unwrap();
        let (status, body) = send(&app, malformed).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body["errors"]["body"].is_array());
    }

    #[tokio::test]
    async fn duplicate_registration_and_bad_login() {
        let app = app(IssueMode::TokenPair);
        send(&app, post_json("/api/v1/auth/register", registration())).await;

        let (status, body) = send(&app, post_json("/api/v1/auth/register", registration())).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["errors"]["email"], json!(["Email is already registered"]));

        let (status, body) = send(
            &app,
            post_json(
                "/api/v1/auth/login",
                json!({ "email": "ada@example.com", "password": "wrong password" }),
            ),
        )
        .await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body, json!({ "message": "Invalid credentials" }));
    }
}
