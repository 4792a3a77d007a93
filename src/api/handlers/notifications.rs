//! Admin bulk notification handlers.

use axum::extract::State;
use axum::routing::{get, post};
use axum::{Json, Router};

use crate::api::dto::{RecipientDto, SendRequest};
use crate::api::extract::AdminAuth;
use crate::app_state::AppState;
use crate::domain::ParticipantId;
use crate::error::{ErrorResponse, GatewayError};
use crate::service::BulkSendReport;

/// `GET /admin/notifications/recipients` — Participants who confirmed
/// attendance.
///
/// # Errors
///
/// Returns [`GatewayError::Unauthorized`] without a live session.
#[utoipa::path(
    get,
    path = "/api/v1/admin/notifications/recipients",
    tag = "Notifications",
    summary = "List eligible recipients",
    security(("bearer" = [])),
    responses(
        (status = 200, description = "Confirmed attendees", body = Vec<RecipientDto>),
        (status = 401, description = "No live session", body = ErrorResponse),
    )
)]
pub async fn recipients(State(state): State<AppState>, _auth: AdminAuth) -> Json<Vec<RecipientDto>> {
    let eligible = state.notifications.eligible().await;
    Json(eligible.iter().map(RecipientDto::from).collect())
}

/// `POST /admin/notifications/send` — Send the event confirmation to the
/// selected attendees.
///
/// # Errors
///
/// Returns [`GatewayError`] for an invalid selection or when the delivery
/// service was unreachable for every recipient.
#[utoipa::path(
    post,
    path = "/api/v1/admin/notifications/send",
    tag = "Notifications",
    summary = "Send confirmations",
    description = "Messages go out one at a time with a pause between sends. Individual failures are reported, not fatal.",
    security(("bearer" = [])),
    request_body = SendRequest,
    responses(
        (status = 200, description = "Batch report", body = BulkSendReport),
        (status = 400, description = "Empty or ineligible selection", body = ErrorResponse),
        (status = 401, description = "No live session", body = ErrorResponse),
        (status = 502, description = "Delivery service unreachable", body = ErrorResponse),
    )
)]
pub async fn send(
    State(state): State<AppState>,
    auth: AdminAuth,
    Json(req): Json<SendRequest>,
) -> Result<Json<BulkSendReport>, GatewayError> {
    let ids: Vec<ParticipantId> = req.participant_ids.into_iter().map(ParticipantId::from).collect();
    tracing::info!(email = %auth.email, recipients = ids.len(), "bulk notification requested");
    let report = state.notifications.send_confirmations(&ids).await?;
    Ok(Json(report))
}

/// Admin notification routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/admin/notifications/recipients", get(recipients))
        .route("/admin/notifications/send", post(send))
}
