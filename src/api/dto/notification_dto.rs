//! Bulk notification payloads.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::domain::Participant;
use crate::domain::participant::Tier;

/// A participant who can receive the confirmation message.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct RecipientDto {
    /// Participant id.
    pub id: Uuid,
    /// Full name.
    pub full_name: String,
    /// Email address.
    pub email: String,
    /// Registration tier.
    pub tier: Tier,
}

impl From<&Participant> for RecipientDto {
    fn from(p: &Participant) -> Self {
        Self {
            id: p.id.into(),
            full_name: p.full_name.clone(),
            email: p.email.clone(),
            tier: p.tier,
        }
    }
}

/// Request body for `POST /admin/notifications/send`.
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct SendRequest {
    /// Selected recipients; each must have confirmed attendance.
    #[serde(default)]
    pub participant_ids: Vec<Uuid>,
}
