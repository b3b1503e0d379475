//! authgate: axum adapter around an external authentication core.
//!
//! Request flow: credential extraction (bearer header, else cookie) →
//! identity resolution through the core → `AuthUser` / `Option<AuthUser>`
//! in handlers, or a uniform JSON error.
pub mod api;
pub mod app;
pub mod config;
pub mod error;
pub mod middleware;
pub mod services;
pub mod state;
