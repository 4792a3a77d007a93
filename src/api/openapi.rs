//! OpenAPI document assembled from the handler annotations.

use utoipa::openapi::security::{Http, HttpAuthScheme, SecurityScheme};
use utoipa::{Modify, OpenApi};

use crate::api::dto::{
    EventResponse, FirstUserResponse, LandingResponse, LoginRequest, LoginResponse,
    OfferSummary, PaginationMeta, ParticipantDto, ParticipantListResponse, RecipientDto,
    ReloadResponse, SendRequest, SessionResponse,
};
use crate::api::handlers::{auth, event, notifications, participants, registration, system};
use crate::error::{ErrorBody, ErrorResponse};

/// OpenAPI description of the public and admin REST surface.
#[derive(Debug, OpenApi)]
#[openapi(
    info(title = "signup-gateway", description = "Event registration and admin API"),
    paths(
        system::health_handler,
        system::landing_handler,
        event::get_event,
        event::save_event,
        registration::register,
        auth::first_user,
        auth::login,
        auth::logout,
        auth::session,
        participants::list_participants,
        participants::update_view,
        participants::export_participants,
        participants::stats,
        participants::reload,
        participants::get_participant,
        participants::edit_participant,
        participants::toggle_payment,
        participants::toggle_attendance,
        participants::prepare_deletion,
        participants::delete_participant,
        notifications::recipients,
        notifications::send,
    ),
    components(schemas(
        ErrorResponse,
        ErrorBody,
        EventResponse,
        LandingResponse,
        OfferSummary,
        LoginRequest,
        LoginResponse,
        FirstUserResponse,
        SessionResponse,
        PaginationMeta,
        ParticipantDto,
        ParticipantListResponse,
        ReloadResponse,
        RecipientDto,
        SendRequest,
    )),
    modifiers(&BearerAuth),
    tags(
        (name = "System", description = "Health and landing"),
        (name = "Event", description = "Event configuration"),
        (name = "Registration", description = "Public sign-up"),
        (name = "Admin Auth", description = "Admin login and sessions"),
        (name = "Participants", description = "Participant administration"),
        (name = "Notifications", description = "Bulk confirmation messages"),
    )
)]
pub struct ApiDoc;

/// Registers the `bearer` security scheme used by admin endpoints.
#[derive(Debug)]
struct BearerAuth;

impl Modify for BearerAuth {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi.components.get_or_insert_with(Default::default);
        components.add_security_scheme("bearer", SecurityScheme::Http(Http::new(HttpAuthScheme::Bearer)));
    }
}
