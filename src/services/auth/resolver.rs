//! Credential -> identity resolution.
//!
//! A pure decision over one core lookup:
//!
//! | credential | lookup        | optional | outcome                              |
//! |------------|---------------|----------|--------------------------------------|
//! | none       | (not called)  | false    | `Failed("no token provided")`        |
//! | none       | (not called)  | true     | `Absent`                             |
//! | some       | `None`        | false    | `Failed("invalid or expired token")` |
//! | some       | `None`        | true     | `Absent`                             |
//! | some       | `Some(id)`    | any      | `Resolved(id)`                       |
//! | some       | `Err(e)`      | any      | `Err(e)` (never `Absent`)            |
//!
//! No caching, no retries.
use std::{fmt, sync::Arc};

use crate::services::auth::credential::Credential;
use crate::services::core::{AuthCore, CoreResult, Identity};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureReason {
    MissingCredential,
    InvalidCredential,
}

impl FailureReason {
    pub fn message(&self) -> &'static str {
        match self {
            Self::MissingCredential => "no token provided",
            Self::InvalidCredential => "invalid or expired token",
        }
    }
}

impl fmt::Display for FailureReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.message())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResolutionOutcome {
    Resolved(Identity),
    /// Only produced for optional resolutions.
    Absent,
    Failed(FailureReason),
}

impl ResolutionOutcome {
    fn absent_or_failed(optional: bool, reason: FailureReason) -> Self {
        if optional {
            Self::Absent
        } else {
            Self::Failed(reason)
        }
    }

    /// Collapse into what a call site consumes: an identity, its absence, or the failure.
    pub fn into_identity(self) -> Result<Option<Identity>, FailureReason> {
        match self {
            Self::Resolved(identity) => Ok(Some(identity)),
            Self::Absent => Ok(None),
            Self::Failed(reason) => Err(reason),
        }
    }

    fn label(&self) -> &'static str {
        match self {
            Self::Resolved(_) => "resolved",
            Self::Absent => "absent",
            Self::Failed(_) => "failed",
        }
    }
}

#[derive(Clone)]
pub struct IdentityResolver {
    core: Arc<dyn AuthCore>,
}

impl IdentityResolver {
    pub fn new(core: Arc<dyn AuthCore>) -> Self {
        Self { core }
    }

    pub async fn resolve(
        &self,
        credential: Option<&Credential>,
        optional: bool,
    ) -> CoreResult<ResolutionOutcome> {
        let Some(credential) = credential else {
            let outcome =
                ResolutionOutcome::absent_or_failed(optional, FailureReason::MissingCredential);
            tracing::debug!(optional, outcome = outcome.label(), "no credential on request");
            return Ok(outcome);
        };

        let found = self
            .core
            .lookup_identity_by_token(credential.as_str())
            .await
            .inspect_err(|err| {
                tracing::warn!(
                    backend = self.core.backend_name(),
                    error = %err,
                    "identity lookup failed"
                );
            })?;

        let outcome = match found {
            Some(identity) => ResolutionOutcome::Resolved(identity),
            None => ResolutionOutcome::absent_or_failed(optional, FailureReason::InvalidCredential),
        };

        tracing::debug!(
            backend = self.core.backend_name(),
            source = ?credential.source,
            optional,
            outcome = outcome.label(),
            "identity resolution"
        );

        Ok(outcome)
    }
}

impl fmt::Debug for IdentityResolver {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("IdentityResolver")
            .field("backend", &self.core.backend_name())
            .finish()
    }
}
