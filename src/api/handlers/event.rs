//! Event configuration: public read, admin replace.

use axum::extract::State;
use axum::routing::{get, put};
use axum::{Json, Router};

use crate::api::dto::EventResponse;
use crate::api::extract::AdminAuth;
use crate::app_state::AppState;
use crate::domain::EventConfiguration;
use crate::error::{ErrorResponse, GatewayError};

/// `GET /event` — Current event configuration and theme.
#[utoipa::path(
    get,
    path = "/api/v1/event",
    tag = "Event",
    summary = "Get event configuration",
    description = "Returns the event configuration with every theme color resolved to hex.",
    responses(
        (status = 200, description = "Event configuration", body = EventResponse),
    )
)]
pub async fn get_event(State(state): State<AppState>) -> Json<EventResponse> {
    Json(EventResponse {
        event: state.event_config.current().await,
        theme: state.event_config.theme().await,
    })
}

/// `PUT /admin/event` — Replace the event configuration.
///
/// # Errors
///
/// Returns [`GatewayError`] on invalid fields or store failure.
#[utoipa::path(
    put,
    path = "/api/v1/admin/event",
    tag = "Event",
    summary = "Save event configuration",
    description = "Validates and stores the configuration, replacing the previous record wholesale.",
    security(("bearer" = [])),
    request_body = EventConfiguration,
    responses(
        (status = 200, description = "Configuration saved", body = EventResponse),
        (status = 400, description = "Invalid fields", body = ErrorResponse),
        (status = 401, description = "No live session", body = ErrorResponse),
        (status = 500, description = "Store failure", body = ErrorResponse),
    )
)]
pub async fn save_event(
    State(state): State<AppState>,
    auth: AdminAuth,
    Json(config): Json<EventConfiguration>,
) -> Result<Json<EventResponse>, GatewayError> {
    let event = state.event_config.save(config).await?;
    tracing::debug!(email = %auth.email, "event configuration replaced");
    Ok(Json(EventResponse {
        event,
        theme: state.event_config.theme().await,
    }))
}

/// Event routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/event", get(get_event))
        .route("/admin/event", put(save_event))
}
