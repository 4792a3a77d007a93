//! Admin participant handlers: list, view, export, stats, edit, toggles,
//! confirmed deletion and reload.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::http::header::{CONTENT_DISPOSITION, CONTENT_TYPE};
use axum::response::IntoResponse;
use axum::routing::{get, patch, post};
use axum::{Json, Router};
use uuid::Uuid;

use crate::api::dto::{ParticipantDto, ParticipantListResponse, ReloadResponse};
use crate::api::extract::AdminAuth;
use crate::app_state::AppState;
use crate::domain::validation::ProfileEdit;
use crate::domain::{ParticipantId, RegistryStats, ViewUpdate};
use crate::error::{ErrorResponse, GatewayError};
use crate::service::DeletionPreview;

/// `GET /admin/participants` — Current page of the session's view.
///
/// # Errors
///
/// Returns [`GatewayError::Unauthorized`] without a live session.
#[utoipa::path(
    get,
    path = "/api/v1/admin/participants",
    tag = "Participants",
    summary = "List participants",
    description = "Returns the page selected by the session's search, tier filter, sort and page size.",
    security(("bearer" = [])),
    responses(
        (status = 200, description = "Current page", body = ParticipantListResponse),
        (status = 401, description = "No live session", body = ErrorResponse),
    )
)]
pub async fn list_participants(
    State(state): State<AppState>,
    auth: AdminAuth,
) -> Result<Json<ParticipantListResponse>, GatewayError> {
    let (view, page) = state.participants.list_page(auth.token).await?;
    Ok(Json(ParticipantListResponse::new(view, &page)))
}

/// `PATCH /admin/participants/view` — Change search, filter, sort, page
/// size or page.
///
/// # Errors
///
/// Returns [`GatewayError`] for an unsupported page size or without a
/// live session.
#[utoipa::path(
    patch,
    path = "/api/v1/admin/participants/view",
    tag = "Participants",
    summary = "Update list view",
    description = "Search, tier filter and sort changes return to page 1. A page outside the current range is ignored.",
    security(("bearer" = [])),
    request_body = ViewUpdate,
    responses(
        (status = 200, description = "Page after the update", body = ParticipantListResponse),
        (status = 400, description = "Unsupported page size", body = ErrorResponse),
        (status = 401, description = "No live session", body = ErrorResponse),
    )
)]
pub async fn update_view(
    State(state): State<AppState>,
    auth: AdminAuth,
    Json(update): Json<ViewUpdate>,
) -> Result<Json<ParticipantListResponse>, GatewayError> {
    let (view, page) = state.participants.update_view(auth.token, &update).await?;
    Ok(Json(ParticipantListResponse::new(view, &page)))
}

/// `GET /admin/participants/export` — CSV of the filtered, sorted list.
///
/// # Errors
///
/// Returns [`GatewayError::Unauthorized`] without a live session.
#[utoipa::path(
    get,
    path = "/api/v1/admin/participants/export",
    tag = "Participants",
    summary = "Export participants",
    description = "Every participant matching the session's filters, in view order, ignoring pagination.",
    security(("bearer" = [])),
    responses(
        (status = 200, description = "CSV file", content_type = "text/csv", body = String),
        (status = 401, description = "No live session", body = ErrorResponse),
    )
)]
pub async fn export_participants(
    State(state): State<AppState>,
    auth: AdminAuth,
) -> Result<impl IntoResponse, GatewayError> {
    let file = state.participants.export(auth.token).await?;
    let disposition = format!("attachment; filename=\"{}\"", file.file_name);
    Ok((
        [
            (CONTENT_TYPE, "text/csv; charset=utf-8".to_string()),
            (CONTENT_DISPOSITION, disposition),
        ],
        file.body,
    ))
}

/// `GET /admin/participants/stats` — Registry counters.
///
/// # Errors
///
/// Returns [`GatewayError::Unauthorized`] without a live session.
#[utoipa::path(
    get,
    path = "/api/v1/admin/participants/stats",
    tag = "Participants",
    summary = "Participant statistics",
    security(("bearer" = [])),
    responses(
        (status = 200, description = "Counters over every participant", body = RegistryStats),
        (status = 401, description = "No live session", body = ErrorResponse),
    )
)]
pub async fn stats(State(state): State<AppState>, _auth: AdminAuth) -> Json<RegistryStats> {
    Json(state.participants.stats().await)
}

/// `POST /admin/participants/reload` — Re-read participants and event
/// configuration from the store.
///
/// # Errors
///
/// Returns [`GatewayError::Store`] on store failure; the previous copy is
/// kept.
#[utoipa::path(
    post,
    path = "/api/v1/admin/participants/reload",
    tag = "Participants",
    summary = "Reload from store",
    security(("bearer" = [])),
    responses(
        (status = 200, description = "Registry reloaded", body = ReloadResponse),
        (status = 401, description = "No live session", body = ErrorResponse),
        (status = 500, description = "Store failure", body = ErrorResponse),
    )
)]
pub async fn reload(
    State(state): State<AppState>,
    _auth: AdminAuth,
) -> Result<Json<ReloadResponse>, GatewayError> {
    state.event_config.load().await?;
    let participant_count = state.participants.load().await?;
    Ok(Json(ReloadResponse { participant_count }))
}

/// `GET /admin/participants/{id}` — One participant.
///
/// # Errors
///
/// Returns [`GatewayError::ParticipantNotFound`] for an unknown id.
#[utoipa::path(
    get,
    path = "/api/v1/admin/participants/{id}",
    tag = "Participants",
    summary = "Get participant",
    security(("bearer" = [])),
    params(("id" = Uuid, Path, description = "Participant id")),
    responses(
        (status = 200, description = "Participant", body = ParticipantDto),
        (status = 401, description = "No live session", body = ErrorResponse),
        (status = 404, description = "Unknown participant", body = ErrorResponse),
    )
)]
pub async fn get_participant(
    State(state): State<AppState>,
    _auth: AdminAuth,
    Path(id): Path<Uuid>,
) -> Result<Json<ParticipantDto>, GatewayError> {
    let participant = state.participants.get(ParticipantId::from(id)).await?;
    Ok(Json(ParticipantDto::from(participant)))
}

/// `PATCH /admin/participants/{id}` — Edit profile fields.
///
/// # Errors
///
/// Returns [`GatewayError`] on invalid fields, an unknown id or store
/// failure.
#[utoipa::path(
    patch,
    path = "/api/v1/admin/participants/{id}",
    tag = "Participants",
    summary = "Edit participant",
    description = "Only the submitted fields change. Tax id, tier and registration date are fixed.",
    security(("bearer" = [])),
    params(("id" = Uuid, Path, description = "Participant id")),
    request_body = ProfileEdit,
    responses(
        (status = 200, description = "Updated participant", body = ParticipantDto),
        (status = 400, description = "Invalid fields", body = ErrorResponse),
        (status = 401, description = "No live session", body = ErrorResponse),
        (status = 404, description = "Unknown participant", body = ErrorResponse),
        (status = 500, description = "Store failure", body = ErrorResponse),
    )
)]
pub async fn edit_participant(
    State(state): State<AppState>,
    _auth: AdminAuth,
    Path(id): Path<Uuid>,
    Json(edit): Json<ProfileEdit>,
) -> Result<Json<ParticipantDto>, GatewayError> {
    let participant = state
        .participants
        .edit_profile(ParticipantId::from(id), &edit)
        .await?;
    Ok(Json(ParticipantDto::from(participant)))
}

/// `POST /admin/participants/{id}/payment/toggle` — Flip a paid
/// registration between pending and approved.
///
/// # Errors
///
/// Returns [`GatewayError`] for a free registration, an unknown id or
/// store failure.
#[utoipa::path(
    post,
    path = "/api/v1/admin/participants/{id}/payment/toggle",
    tag = "Participants",
    summary = "Toggle payment status",
    security(("bearer" = [])),
    params(("id" = Uuid, Path, description = "Participant id")),
    responses(
        (status = 200, description = "Updated participant", body = ParticipantDto),
        (status = 400, description = "Free registration", body = ErrorResponse),
        (status = 401, description = "No live session", body = ErrorResponse),
        (status = 404, description = "Unknown participant", body = ErrorResponse),
        (status = 500, description = "Store failure", body = ErrorResponse),
    )
)]
pub async fn toggle_payment(
    State(state): State<AppState>,
    _auth: AdminAuth,
    Path(id): Path<Uuid>,
) -> Result<Json<ParticipantDto>, GatewayError> {
    let participant = state.participants.toggle_payment(ParticipantId::from(id)).await?;
    Ok(Json(ParticipantDto::from(participant)))
}

/// `POST /admin/participants/{id}/attendance/toggle` — Flip attendance
/// confirmation.
///
/// # Errors
///
/// Returns [`GatewayError`] for an unknown id or store failure.
#[utoipa::path(
    post,
    path = "/api/v1/admin/participants/{id}/attendance/toggle",
    tag = "Participants",
    summary = "Toggle attendance",
    security(("bearer" = [])),
    params(("id" = Uuid, Path, description = "Participant id")),
    responses(
        (status = 200, description = "Updated participant", body = ParticipantDto),
        (status = 401, description = "No live session", body = ErrorResponse),
        (status = 404, description = "Unknown participant", body = ErrorResponse),
        (status = 500, description = "Store failure", body = ErrorResponse),
    )
)]
pub async fn toggle_attendance(
    State(state): State<AppState>,
    _auth: AdminAuth,
    Path(id): Path<Uuid>,
) -> Result<Json<ParticipantDto>, GatewayError> {
    let participant = state
        .participants
        .toggle_attendance(ParticipantId::from(id))
        .await?;
    Ok(Json(ParticipantDto::from(participant)))
}

/// `POST /admin/participants/{id}/deletion` — Preview a deletion and arm
/// the confirmation.
///
/// # Errors
///
/// Returns [`GatewayError::ParticipantNotFound`] for an unknown id.
#[utoipa::path(
    post,
    path = "/api/v1/admin/participants/{id}/deletion",
    tag = "Participants",
    summary = "Prepare deletion",
    description = "Returns the participant's identifying details and records the id as this session's pending deletion.",
    security(("bearer" = [])),
    params(("id" = Uuid, Path, description = "Participant id")),
    responses(
        (status = 200, description = "Deletion armed", body = DeletionPreview),
        (status = 401, description = "No live session", body = ErrorResponse),
        (status = 404, description = "Unknown participant", body = ErrorResponse),
    )
)]
pub async fn prepare_deletion(
    State(state): State<AppState>,
    auth: AdminAuth,
    Path(id): Path<Uuid>,
) -> Result<Json<DeletionPreview>, GatewayError> {
    let preview = state
        .participants
        .prepare_delete(auth.token, ParticipantId::from(id))
        .await?;
    Ok(Json(preview))
}

/// `DELETE /admin/participants/{id}` — Permanently delete a participant.
///
/// # Errors
///
/// Returns [`GatewayError::DeletionNotConfirmed`] unless the deletion was
/// prepared first in this session.
#[utoipa::path(
    delete,
    path = "/api/v1/admin/participants/{id}",
    tag = "Participants",
    summary = "Delete participant",
    description = "Irreversible. Requires a prior `POST /deletion` for the same id in the same session.",
    security(("bearer" = [])),
    params(("id" = Uuid, Path, description = "Participant id")),
    responses(
        (status = 204, description = "Participant deleted"),
        (status = 401, description = "No live session", body = ErrorResponse),
        (status = 404, description = "Unknown participant", body = ErrorResponse),
        (status = 409, description = "Deletion not confirmed", body = ErrorResponse),
        (status = 500, description = "Store failure", body = ErrorResponse),
    )
)]
pub async fn delete_participant(
    State(state): State<AppState>,
    auth: AdminAuth,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, GatewayError> {
    state
        .participants
        .delete(auth.token, ParticipantId::from(id))
        .await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Admin participant routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/admin/participants", get(list_participants))
        .route("/admin/participants/view", patch(update_view))
        .route("/admin/participants/export", get(export_participants))
        .route("/admin/participants/stats", get(stats))
        .route("/admin/participants/reload", post(reload))
        .route(
            "/admin/participants/{id}",
            get(get_participant)
                .patch(edit_participant)
                .delete(delete_participant),
        )
        .route("/admin/participants/{id}/payment/toggle", post(toggle_payment))
        .route(
            "/admin/participants/{id}/attendance/toggle",
            post(toggle_attendance),
        )
        .route("/admin/participants/{id}/deletion", post(prepare_deletion))
}
