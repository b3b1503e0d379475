pub mod client;
pub mod factory;
pub mod memory;
pub mod remote;
pub mod types;

#[cfg(test)]
pub(crate) mod stub;

pub use client::{AuthCore, CoreError, CoreResult};
pub use factory::build_auth_core;
pub use memory::{InMemoryCore, IssueMode};
pub use remote::RemoteCore;
pub use types::{
    AuthResult, Identity, NewAccount, SESSION_TTL_SECONDS, Session, TokenPair, UserId,
};
