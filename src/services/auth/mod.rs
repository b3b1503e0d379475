pub mod credential;
pub mod resolver;

pub use credential::{Credential, CredentialSource, DEFAULT_COOKIE_NAME};
pub use resolver::{FailureReason, IdentityResolver, ResolutionOutcome};
