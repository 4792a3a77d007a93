//! REST API layer: router construction, DTOs, handlers.

pub mod dto;
pub mod extract;
pub mod handlers;
pub mod openapi;

use axum::Router;

use crate::app_state::AppState;

/// Builds the complete Axum router with all REST endpoints.
///
/// Public and admin resources live under `/api/v1`; the landing summary
/// and health check sit at the root. Any other path redirects to `/`.
pub fn build_router() -> Router<AppState> {
    let router = Router::new()
        .nest("/api/v1", handlers::routes())
        .merge(handlers::system::routes())
        .fallback(handlers::system::fallback_handler);
    with_docs(router)
}

#[cfg(feature = "swagger-ui")]
fn with_docs(router: Router<AppState>) -> Router<AppState> {
    use utoipa::OpenApi;
    use utoipa_swagger_ui::SwaggerUi;

    router.merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", openapi::ApiDoc::openapi()))
}

#[cfg(not(feature = "swagger-ui"))]
fn with_docs(router: Router<AppState>) -> Router<AppState> {
    use axum::Json;
    use axum::routing::get;
    use utoipa::OpenApi;

    router.route("/api-docs/openapi.json", get(|| async { Json(openapi::ApiDoc::openapi()) }))
}
