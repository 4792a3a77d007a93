//! Participant payloads for registration and the admin panel.

use chrono::{DateTime, NaiveDate, Utc};
use serde::Serialize;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::api::dto::PaginationMeta;
use crate::domain::participant::{Gender, PaymentStatus, RevenueBracket, Sector, Tier};
use crate::domain::{Page, Participant, ViewState, phone, tax_id};

/// A participant as shown to clients.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct ParticipantDto {
    /// Participant id.
    pub id: Uuid,
    /// Full name.
    pub full_name: String,
    /// Tax id, 11 digits.
    pub tax_id: String,
    /// Tax id as `000.000.000-00`.
    pub tax_id_display: String,
    /// Email address.
    pub email: String,
    /// Phone, 10 or 11 digits.
    pub phone: String,
    /// Phone as `(00) 00000-0000`.
    pub phone_display: String,
    /// Birth date.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub birth_date: Option<NaiveDate>,
    /// Gender.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gender: Option<Gender>,
    /// City.
    pub city: String,
    /// Two-letter state code.
    pub state: String,
    /// Company name.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub company_name: Option<String>,
    /// Annual revenue bracket.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub revenue_bracket: Option<RevenueBracket>,
    /// Business sector.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sector: Option<Sector>,
    /// Registration tier.
    pub tier: Tier,
    /// Payment status.
    pub payment_status: PaymentStatus,
    /// Registration timestamp.
    pub registered_at: DateTime<Utc>,
    /// Whether the participant confirmed attendance.
    pub attendance_confirmed: bool,
}

impl From<&Participant> for ParticipantDto {
    fn from(p: &Participant) -> Self {
        Self {
            id: p.id.into(),
            full_name: p.full_name.clone(),
            tax_id: p.tax_id.clone(),
            tax_id_display: tax_id::format_display(&p.tax_id),
            email: p.email.clone(),
            phone: p.phone.clone(),
            phone_display: phone::format_display(&p.phone),
            birth_date: p.birth_date,
            gender: p.gender,
            city: p.city.clone(),
            state: p.state.clone(),
            company_name: p.company_name.clone(),
            revenue_bracket: p.revenue_bracket,
            sector: p.sector,
            tier: p.tier,
            payment_status: p.payment_status,
            registered_at: p.registered_at,
            attendance_confirmed: p.attendance_confirmed,
        }
    }
}

impl From<Participant> for ParticipantDto {
    fn from(p: Participant) -> Self {
        Self::from(&p)
    }
}

/// One page of the admin participant list.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct ParticipantListResponse {
    /// The session's view state after the request.
    pub view: ViewState,
    /// Participants on this page.
    pub data: Vec<ParticipantDto>,
    /// Pagination metadata.
    pub pagination: PaginationMeta,
}

impl ParticipantListResponse {
    /// Builds the response from a computed page.
    #[must_use]
    pub fn new(view: ViewState, page: &Page) -> Self {
        Self {
            view,
            data: page.items.iter().map(ParticipantDto::from).collect(),
            pagination: PaginationMeta::from(page),
        }
    }
}

/// Response body for `POST /admin/participants/reload`.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct ReloadResponse {
    /// Participants mirrored from the store.
    pub participant_count: usize,
}
