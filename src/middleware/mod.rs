/*
 * Responsibility
 * - Public surface of the middleware layer
 * - auth (required identity resolution), cors, http (request id / trace / limits)
 */
pub mod auth;
pub mod cors;
pub mod http;
