pub mod auth_ctx;
pub mod validated_json;

pub use auth_ctx::{AuthCtx, AuthUser};
pub use validated_json::ValidatedJson;
