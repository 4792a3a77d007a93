//! Admin authentication payloads.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::service::{LoginOutcome, LoginSuccess};

/// Request body for `POST /admin/auth/login`.
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct LoginRequest {
    /// Admin email.
    #[serde(default)]
    pub email: String,
    /// Plaintext password.
    #[serde(default)]
    pub password: String,
}

/// Response body for a successful login.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct LoginResponse {
    /// Bearer token for subsequent admin calls.
    pub token: String,
    /// Normalized admin email.
    pub email: String,
    /// Whether the account was created by this login.
    pub outcome: LoginOutcome,
}

impl From<LoginSuccess> for LoginResponse {
    fn from(success: LoginSuccess) -> Self {
        Self {
            token: success.token.to_string(),
            email: success.email,
            outcome: success.outcome,
        }
    }
}

/// Whether the next login bootstraps the admin account.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct FirstUserResponse {
    /// `true` while no admin credential exists.
    pub first_user: bool,
}

/// The admin behind the presented token.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct SessionResponse {
    /// Admin email.
    pub email: String,
}
