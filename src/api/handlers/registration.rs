//! Public registration endpoint.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::post;
use axum::{Json, Router};

use crate::api::dto::ParticipantDto;
use crate::app_state::AppState;
use crate::domain::Tier;
use crate::domain::participant::UnknownValue;
use crate::domain::validation::RegistrationForm;
use crate::error::{ErrorResponse, GatewayError};

/// `POST /registrations/{tier}` — Register for the free or paid tier.
///
/// # Errors
///
/// Returns [`GatewayError`] on an unknown tier, a closed tier, invalid
/// fields or store failure.
#[utoipa::path(
    post,
    path = "/api/v1/registrations/{tier}",
    tag = "Registration",
    summary = "Register a participant",
    description = "Validates the form and creates the participant. Paid registrations start with a pending payment.",
    params(("tier" = String, Path, description = "`free` or `paid`")),
    request_body = RegistrationForm,
    responses(
        (status = 201, description = "Participant registered", body = ParticipantDto),
        (status = 400, description = "Unknown tier or invalid fields", body = ErrorResponse),
        (status = 409, description = "Tier is closed", body = ErrorResponse),
        (status = 500, description = "Store failure", body = ErrorResponse),
    )
)]
pub async fn register(
    State(state): State<AppState>,
    Path(tier): Path<String>,
    Json(form): Json<RegistrationForm>,
) -> Result<impl IntoResponse, GatewayError> {
    let tier: Tier = tier
        .parse()
        .map_err(|e: UnknownValue| GatewayError::InvalidRequest(e.to_string()))?;
    let participant = state.participants.register(tier, &form).await?;
    Ok((StatusCode::CREATED, Json(ParticipantDto::from(participant))))
}

/// Registration routes.
pub fn routes() -> Router<AppState> {
    Router::new().route("/registrations/{tier}", post(register))
}
