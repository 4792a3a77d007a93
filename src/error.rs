//! Gateway error types with HTTP status code mapping.
//!
//! [`GatewayError`] is the central error type for the gateway. Each variant
//! maps to a specific HTTP status code and structured JSON error response.

use std::fmt;

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;
use utoipa::ToSchema;

use crate::domain::participant::Tier;
use crate::domain::validation::FieldError;

/// Structured JSON error response body.
///
/// All error responses follow this shape:
/// ```json
/// {
///   "error": {
///     "code": 1001,
///     "message": "validation failed",
///     "fields": [{ "field": "tax_id", "message": "invalid tax id" }]
///   }
/// }
/// ```
#[derive(Debug, Serialize, ToSchema)]
pub struct ErrorResponse {
    /// Structured error payload.
    pub error: ErrorBody,
}

/// Inner error body with numeric code and human-readable message.
#[derive(Debug, Serialize, ToSchema)]
pub struct ErrorBody {
    /// Numeric error code (see [`GatewayError`] code ranges).
    pub code: u32,
    /// Human-readable error message.
    pub message: String,
    /// Optional additional details.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
    /// Per-field validation failures, rendered next to the offending input.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub fields: Vec<FieldError>,
}

/// Store operation that failed, used to pick the generic user-facing message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreAction {
    /// Reading records.
    Load,
    /// Creating or updating records.
    Save,
    /// Removing records.
    Delete,
}

impl fmt::Display for StoreAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let verb = match self {
            Self::Load => "load",
            Self::Save => "save",
            Self::Delete => "delete",
        };
        f.write_str(verb)
    }
}

/// Server-side error enum with HTTP status code mapping.
///
/// # Error Code Ranges
///
/// | Range     | Category           | HTTP Status                   |
/// |-----------|--------------------|-------------------------------|
/// | 1000–1999 | Validation         | 400 Bad Request               |
/// | 2000–2999 | Auth / State       | 401 / 404 / 409               |
/// | 3000–3999 | Server             | 500 / 502                     |
#[derive(Debug, thiserror::Error)]
pub enum GatewayError {
    /// One or more input fields failed validation.
    #[error("validation failed")]
    Validation(Vec<FieldError>),

    /// Request is malformed or not applicable to the target resource.
    #[error("invalid request: {0}")]
    InvalidRequest(String),

    /// Login rejected. Deliberately identical for unknown email and wrong
    /// password.
    #[error("invalid email or password")]
    InvalidCredentials,

    /// The first-user bootstrap could not persist the admin credential.
    #[error("failed to create admin account")]
    BootstrapFailed(String),

    /// Admin endpoint called without a live session.
    #[error("admin session required")]
    Unauthorized,

    /// Participant with the given ID was not found.
    #[error("participant not found: {0}")]
    ParticipantNotFound(uuid::Uuid),

    /// The requested registration tier is not open.
    #[error("{0} registration is currently unavailable")]
    RegistrationClosed(Tier),

    /// Delete issued without a matching confirmation step.
    #[error("deletion of participant {0} was not confirmed")]
    DeletionNotConfirmed(uuid::Uuid),

    /// Record store failure. The detail is logged, never returned.
    #[error("failed to {action}")]
    Store {
        /// Operation that failed.
        action: StoreAction,
        /// Backend error text for operators.
        detail: String,
    },

    /// The notification transport could not be reached for any recipient.
    #[error("notification service unavailable: {0}")]
    NotificationUnavailable(String),

    /// Internal server error.
    #[error("internal error: {0}")]
    Internal(String),
}

impl GatewayError {
    /// Shorthand for a single-field validation failure.
    #[must_use]
    pub fn field(field: &str, message: impl Into<String>) -> Self {
        Self::Validation(vec![FieldError::new(field, message)])
    }

    /// Returns the numeric error code for this variant.
    #[must_use]
    pub const fn error_code(&self) -> u32 {
        match self {
            Self::Validation(_) => 1001,
            Self::InvalidRequest(_) => 1002,
            Self::InvalidCredentials => 2001,
            Self::Unauthorized => 2002,
            Self::ParticipantNotFound(_) => 2003,
            Self::RegistrationClosed(_) => 2004,
            Self::DeletionNotConfirmed(_) => 2005,
            Self::Internal(_) => 3000,
            Self::Store { .. } => 3001,
            Self::BootstrapFailed(_) => 3002,
            Self::NotificationUnavailable(_) => 3003,
        }
    }

    /// Returns the HTTP status code for this variant.
    #[must_use]
    pub const fn status_code(&self) -> StatusCode {
        match self {
            Self::Validation(_) | Self::InvalidRequest(_) => StatusCode::BAD_REQUEST,
            Self::InvalidCredentials | Self::Unauthorized => StatusCode::UNAUTHORIZED,
            Self::ParticipantNotFound(_) => StatusCode::NOT_FOUND,
            Self::RegistrationClosed(_) | Self::DeletionNotConfirmed(_) => StatusCode::CONFLICT,
            Self::NotificationUnavailable(_) => StatusCode::BAD_GATEWAY,
            Self::Store { .. } | Self::BootstrapFailed(_) | Self::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

impl IntoResponse for GatewayError {
    fn into_response(self) -> Response {
        match &self {
            Self::Store { action, detail } => {
                tracing::error!(%action, detail, "store operation failed");
            }
            Self::BootstrapFailed(detail) => {
                tracing::error!(detail, "admin bootstrap failed");
            }
            Self::Internal(detail) => tracing::error!(detail, "internal error"),
            _ => {}
        }

        let status = self.status_code();
        let code = self.error_code();
        let message = self.to_string();
        let fields = match self {
            Self::Validation(fields) => fields,
            _ => Vec::new(),
        };
        let body = ErrorResponse {
            error: ErrorBody {
                code,
                message,
                details: None,
                fields,
            },
        };
        let mut response = axum::Json(body).into_response();
        *response.status_mut() = status;
        response
    }
}
