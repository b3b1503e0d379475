/*
 * Responsibility
 * - auth: credential extraction + identity resolution
 * - core: the external auth core (trait + backends)
 */
pub mod auth;
pub mod core;
