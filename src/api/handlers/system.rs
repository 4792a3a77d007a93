//! System endpoints: health check, landing summary, unknown-route redirect.

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Redirect};
use axum::routing::get;
use axum::{Json, Router};
use chrono::Utc;
use serde::Serialize;
use utoipa::ToSchema;

use crate::api::dto::LandingResponse;
use crate::app_state::AppState;

/// Health check response.
#[derive(Debug, Serialize, ToSchema)]
pub struct HealthResponse {
    status: String,
    timestamp: String,
    version: String,
}

/// `GET /health` — Service health status.
#[utoipa::path(
    get,
    path = "/health",
    tag = "System",
    summary = "Health check",
    description = "Returns service health status, version, and current timestamp.",
    responses(
        (status = 200, description = "Service is healthy", body = HealthResponse),
    )
)]
pub async fn health_handler() -> impl IntoResponse {
    (
        StatusCode::OK,
        Json(HealthResponse {
            status: "healthy".to_string(),
            timestamp: Utc::now().to_rfc3339(),
            version: env!("CARGO_PKG_VERSION").to_string(),
        }),
    )
}

/// `GET /` — Landing page summary.
#[utoipa::path(
    get,
    path = "/",
    tag = "System",
    summary = "Landing summary",
    description = "Event headline, both registration offers and the resolved theme.",
    responses(
        (status = 200, description = "Landing summary", body = LandingResponse),
    )
)]
pub async fn landing_handler(State(state): State<AppState>) -> Json<LandingResponse> {
    let event = state.event_config.current().await;
    let theme = state.event_config.theme().await;
    Json(LandingResponse::new(event, theme))
}

/// Any unknown route lands on `/`.
pub async fn fallback_handler() -> Redirect {
    Redirect::to("/")
}

/// System routes mounted at the root level (not under /api/v1).
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/", get(landing_handler))
        .route("/health", get(health_handler))
}
