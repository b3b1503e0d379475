/*
 * Responsibility
 * - App-wide AppError and the single error -> HTTP mapping (IntoResponse)
 * - Body: {"message": ..., "errors"?: {field: [messages]}}
 * - Converts resolver failures / core errors / body rejections uniformly
 */
use std::collections::BTreeMap;

use axum::{
    Json,
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use thiserror::Error;

use crate::services::auth::FailureReason;
use crate::services::core::CoreError;

pub const DEFAULT_AUTH_MESSAGE: &str = "Authentication required";
pub const DEFAULT_VALIDATION_MESSAGE: &str = "Validation failed";

/// Field name -> messages, in the order they were added.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ValidationErrors(BTreeMap<String, Vec<String>>);

impl ValidationErrors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.0.entry(field.into()).or_default().push(message.into());
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn get(&self, field: &str) -> Option<&[String]> {
        self.0.get(field).map(Vec::as_slice)
    }

}

impl From<validator::ValidationErrors> for ValidationErrors {
    fn from(source: validator::ValidationErrors) -> Self {
        let mut errors = Self::new();
        for (field, failures) in source.field_errors() {
            for failure in failures {
                // derives without a custom message only carry a code
                let message = failure
                    .message
                    .as_ref()
                    .map(|m| m.to_string())
                    .unwrap_or_else(|| failure.code.to_string());
                errors.add(field.to_string(), message);
            }
        }
        errors
    }
}

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub errors: Option<ValidationErrors>,
}

#[derive(Debug, Error)]
pub enum AppError {
    #[error("{0}")]
    Unauthorized(String),
    #[error("{message}")]
    Validation {
        message: String,
        errors: ValidationErrors,
    },
    #[error("Authentication service unavailable")]
    CoreUnavailable,
    #[error("internal server error")]
    Internal,
}

impl AppError {
    pub fn unauthorized(message: impl Into<String>) -> Self {
        Self::Unauthorized(message.into())
    }

    pub fn authentication_required() -> Self {
        Self::unauthorized(DEFAULT_AUTH_MESSAGE)
    }

    pub fn validation(errors: ValidationErrors) -> Self {
        Self::Validation {
            message: DEFAULT_VALIDATION_MESSAGE.to_string(),
            errors,
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            AppError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            AppError::Validation { .. } => StatusCode::BAD_REQUEST,
            AppError::CoreUnavailable => StatusCode::SERVICE_UNAVAILABLE,
            AppError::Internal => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        let body = match self {
            AppError::Validation { message, errors } => ErrorResponse {
                message,
                errors: Some(errors),
            },
            other => ErrorResponse {
                message: other.to_string(),
                errors: None,
            },
        };

        (status, Json(body)).into_response()
    }
}

impl From<FailureReason> for AppError {
    fn from(reason: FailureReason) -> Self {
        tracing::warn!(reason = %reason, "authentication failed");
        AppError::unauthorized(reason.message())
    }
}

impl From<ValidationErrors> for AppError {
    fn from(errors: ValidationErrors) -> Self {
        AppError::validation(errors)
    }
}

impl From<validator::ValidationErrors> for AppError {
    fn from(errors: validator::ValidationErrors) -> Self {
        AppError::validation(errors.into())
    }
}

impl From<CoreError> for AppError {
    fn from(e: CoreError) -> Self {
        match e {
            CoreError::InvalidCredentials => AppError::unauthorized("Invalid credentials"),
            CoreError::EmailTaken => {
                let mut errors = ValidationErrors::new();
                errors.add("email", "Email is already registered");
                AppError::validation(errors)
            }
            // Infrastructure trouble is its own failure, never an auth answer
            CoreError::Unavailable(_) | CoreError::InvalidResponse(_) => {
                tracing::error!(error = %e, "auth core failure");
                AppError::CoreUnavailable
            }
            CoreError::Internal(_) => {
                tracing::error!(error = %e, "auth core internal error");
                AppError::Internal
            }
        }
    }
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        let mut errors = ValidationErrors::new();
        errors.add("body", rejection.body_text());
        AppError::validation(errors)
    }
}
