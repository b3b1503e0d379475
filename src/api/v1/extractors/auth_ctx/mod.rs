/*!
 * Authentication context extractor
 *
 * Responsibility:
 * - Give handlers the resolved identity (AuthCtx)
 * - axum wiring lives in core, the type lives in types
 *
 * Public API:
 * - AuthCtx
 * - AuthUser (required) / Option<AuthUser> (optional)
 */

mod core;
mod types;

pub use self::core::AuthUser;
pub use types::AuthCtx;
