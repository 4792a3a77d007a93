//! Request extractors shared by the admin handlers.

use axum::extract::FromRequestParts;
use axum::http::header::AUTHORIZATION;
use axum::http::request::Parts;

use crate::app_state::AppState;
use crate::domain::SessionToken;
use crate::error::GatewayError;

/// A live admin session resolved from `Authorization: Bearer <token>`.
///
/// Rejects with [`GatewayError::Unauthorized`] when the header is missing,
/// malformed, or names an unknown or expired session.
#[derive(Debug, Clone)]
pub struct AdminAuth {
    /// Session token presented by the client.
    pub token: SessionToken,
    /// Admin email the session belongs to.
    pub email: String,
}

impl FromRequestParts<AppState> for AdminAuth {
    type Rejection = GatewayError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let token = bearer_token(parts).ok_or(GatewayError::Unauthorized)?;
        let email = state.credentials.authenticate(token).await?;
        Ok(Self { token, email })
    }
}

fn bearer_token(parts: &Parts) -> Option<SessionToken> {
    let value = parts.headers.get(AUTHORIZATION)?.to_str().ok()?;
    let (scheme, token) = value.split_once(' ')?;
    if !scheme.eq_ignore_ascii_case("bearer") {
        return None;
    }
    token.trim().parse().ok()
}
