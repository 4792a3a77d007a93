//! Admin authentication: first-user probe, login, logout, session check.

use axum::extract::State;
use axum::http::StatusCode;
use axum::routing::{get, post};
use axum::{Json, Router};

use crate::api::dto::{FirstUserResponse, LoginRequest, LoginResponse, SessionResponse};
use crate::api::extract::AdminAuth;
use crate::app_state::AppState;
use crate::error::{ErrorResponse, GatewayError};

/// `GET /admin/auth/first-user` — Whether the next login creates the admin.
///
/// # Errors
///
/// Returns [`GatewayError::Store`] if the credential store cannot be read.
#[utoipa::path(
    get,
    path = "/api/v1/admin/auth/first-user",
    tag = "Admin Auth",
    summary = "First-user probe",
    description = "`true` while no admin credential exists; the next successful login then creates it.",
    responses(
        (status = 200, description = "Bootstrap state", body = FirstUserResponse),
        (status = 500, description = "Store failure", body = ErrorResponse),
    )
)]
pub async fn first_user(State(state): State<AppState>) -> Result<Json<FirstUserResponse>, GatewayError> {
    let first_user = state.credentials.is_first_user().await?;
    Ok(Json(FirstUserResponse { first_user }))
}

/// `POST /admin/auth/login` — Bootstrap or verify, then open a session.
///
/// # Errors
///
/// Returns [`GatewayError`] on blank fields, wrong credentials or a failed
/// bootstrap.
#[utoipa::path(
    post,
    path = "/api/v1/admin/auth/login",
    tag = "Admin Auth",
    summary = "Admin login",
    description = "On a fresh install the first login stores the submitted credentials as the admin account. Afterwards the credentials are verified.",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Session opened", body = LoginResponse),
        (status = 400, description = "Blank email or password", body = ErrorResponse),
        (status = 401, description = "Invalid email or password", body = ErrorResponse),
        (status = 500, description = "Bootstrap failed", body = ErrorResponse),
    )
)]
pub async fn login(
    State(state): State<AppState>,
    Json(req): Json<LoginRequest>,
) -> Result<Json<LoginResponse>, GatewayError> {
    let success = state.credentials.login(&req.email, &req.password).await?;
    Ok(Json(LoginResponse::from(success)))
}

/// `POST /admin/auth/logout` — End the current session.
///
/// # Errors
///
/// Returns [`GatewayError::Unauthorized`] without a live session.
#[utoipa::path(
    post,
    path = "/api/v1/admin/auth/logout",
    tag = "Admin Auth",
    summary = "Admin logout",
    security(("bearer" = [])),
    responses(
        (status = 204, description = "Session closed"),
        (status = 401, description = "No live session", body = ErrorResponse),
    )
)]
pub async fn logout(State(state): State<AppState>, auth: AdminAuth) -> StatusCode {
    state.credentials.logout(auth.token).await;
    tracing::info!(email = %auth.email, "admin logged out");
    StatusCode::NO_CONTENT
}

/// `GET /admin/auth/session` — Who the token belongs to.
///
/// # Errors
///
/// Returns [`GatewayError::Unauthorized`] without a live session.
#[utoipa::path(
    get,
    path = "/api/v1/admin/auth/session",
    tag = "Admin Auth",
    summary = "Current session",
    security(("bearer" = [])),
    responses(
        (status = 200, description = "Live session", body = SessionResponse),
        (status = 401, description = "No live session", body = ErrorResponse),
    )
)]
pub async fn session(auth: AdminAuth) -> Json<SessionResponse> {
    Json(SessionResponse { email: auth.email })
}

/// Admin authentication routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/admin/auth/first-user", get(first_user))
        .route("/admin/auth/login", post(login))
        .route("/admin/auth/logout", post(logout))
        .route("/admin/auth/session", get(session))
}
