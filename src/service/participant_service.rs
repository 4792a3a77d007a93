//! Participant service: registration, admin mutations, views and export.

use std::sync::Arc;

use chrono::Utc;
use serde::Serialize;
use utoipa::ToSchema;
use uuid::Uuid;

use super::event_config_service::EventConfigService;
use super::store_failure;
use crate::domain::export;
use crate::domain::participant::{Participant, ParticipantPatch, Tier};
use crate::domain::session::{SessionStore, SessionToken};
use crate::domain::validation::{ProfileEdit, RegistrationForm, validate_profile_edit, validate_registration};
use crate::domain::view::{Page, ViewState, ViewUpdate, compute_view, filter_and_sort};
use crate::domain::{ParticipantId, ParticipantRegistry, RegistryStats};
use crate::error::{GatewayError, StoreAction};
use crate::persistence::{ParticipantStore, StoreError};

/// Details echoed back before an irreversible delete.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct DeletionPreview {
    /// Participant id.
    pub id: Uuid,
    /// Full name.
    pub full_name: String,
    /// Email.
    pub email: String,
    /// Tax id digits.
    pub tax_id: String,
    /// Registration tier.
    pub tier: Tier,
}

/// A rendered export file.
#[derive(Debug, Clone)]
pub struct ExportFile {
    /// Suggested download name.
    pub file_name: String,
    /// CSV body.
    pub body: String,
}

/// Orchestrates every participant operation.
///
/// Writes go to the store first and are mirrored into the
/// [`ParticipantRegistry`] only on success.
#[derive(Debug, Clone)]
pub struct ParticipantService {
    store: Arc<dyn ParticipantStore>,
    registry: Arc<ParticipantRegistry>,
    sessions: Arc<SessionStore>,
    events: Arc<EventConfigService>,
}

impl ParticipantService {
    /// Creates a new `ParticipantService`.
    #[must_use]
    pub fn new(
        store: Arc<dyn ParticipantStore>,
        registry: Arc<ParticipantRegistry>,
        sessions: Arc<SessionStore>,
        events: Arc<EventConfigService>,
    ) -> Self {
        Self {
            store,
            registry,
            sessions,
            events,
        }
    }

    /// Returns the in-memory registry.
    #[must_use]
    pub fn registry(&self) -> &Arc<ParticipantRegistry> {
        &self.registry
    }

    /// Mirrors the full participant collection into the registry.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::Store`] on store failure; the registry keeps
    /// its last-known-good contents.
    pub async fn load(&self) -> Result<usize, GatewayError> {
        let participants = self
            .store
            .list()
            .await
            .map_err(store_failure(StoreAction::Load))?;
        let count = participants.len();
        self.registry.replace_all(participants).await;
        tracing::info!(count, "participant registry loaded");
        Ok(count)
    }

    /// Public signup for `tier`.
    ///
    /// # Errors
    ///
    /// - [`GatewayError::RegistrationClosed`] if the tier is not open.
    /// - [`GatewayError::Validation`] for invalid fields; nothing is stored.
    /// - [`GatewayError::Store`] on store failure.
    pub async fn register(&self, tier: Tier, form: &RegistrationForm) -> Result<Participant, GatewayError> {
        if !self.events.current().await.is_available(tier) {
            return Err(GatewayError::RegistrationClosed(tier));
        }
        let new = validate_registration(form, tier, Utc::now().date_naive())
            .map_err(GatewayError::Validation)?;

        let participant = self
            .store
            .insert(&new)
            .await
            .map_err(store_failure(StoreAction::Save))?;
        self.registry.insert_front(participant.clone()).await;

        tracing::info!(id = %participant.id, %tier, "participant registered");
        Ok(participant)
    }

    /// Current page of the session's view.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::Unauthorized`] if the session is gone.
    pub async fn list_page(&self, token: SessionToken) -> Result<(ViewState, Page), GatewayError> {
        let view = self
            .sessions
            .with_view(token, |v| v.clone())
            .await
            .ok_or(GatewayError::Unauthorized)?;
        let page = compute_view(&self.registry.snapshot().await, &view);
        Ok((view, page))
    }

    /// Applies view changes to the session and returns the resulting page.
    ///
    /// # Errors
    ///
    /// - [`GatewayError::Validation`] for a page size outside the options.
    /// - [`GatewayError::Unauthorized`] if the session is gone.
    pub async fn update_view(
        &self,
        token: SessionToken,
        update: &ViewUpdate,
    ) -> Result<(ViewState, Page), GatewayError> {
        let participants = self.registry.snapshot().await;
        let view = self
            .sessions
            .with_view(token, |v| update.apply(v, &participants).map(|()| v.clone()))
            .await
            .ok_or(GatewayError::Unauthorized)?
            .map_err(|size| GatewayError::field("page_size", format!("unsupported page size {size}")))?;
        let page = compute_view(&participants, &view);
        Ok((view, page))
    }

    /// Exports the session's whole filtered and sorted set, ignoring
    /// pagination.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::Unauthorized`] if the session is gone.
    pub async fn export(&self, token: SessionToken) -> Result<ExportFile, GatewayError> {
        let view = self
            .sessions
            .with_view(token, |v| v.clone())
            .await
            .ok_or(GatewayError::Unauthorized)?;
        let participants = self.registry.snapshot().await;
        let rows = filter_and_sort(&participants, &view);
        Ok(ExportFile {
            file_name: export::file_name(Utc::now().date_naive()),
            body: export::to_csv(rows),
        })
    }

    /// Dashboard counters.
    pub async fn stats(&self) -> RegistryStats {
        self.registry.stats().await
    }

    /// One participant.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::ParticipantNotFound`] if absent.
    pub async fn get(&self, id: ParticipantId) -> Result<Participant, GatewayError> {
        self.registry
            .get(id)
            .await
            .ok_or(GatewayError::ParticipantNotFound(*id.as_uuid()))
    }

    /// Admin profile edit.
    ///
    /// # Errors
    ///
    /// - [`GatewayError::Validation`] for invalid fields.
    /// - [`GatewayError::ParticipantNotFound`] if absent.
    /// - [`GatewayError::Store`] on store failure.
    pub async fn edit_profile(&self, id: ParticipantId, edit: &ProfileEdit) -> Result<Participant, GatewayError> {
        let patch = validate_profile_edit(edit, Utc::now().date_naive()).map_err(GatewayError::Validation)?;
        let current = self.get(id).await?;
        if patch.is_empty() {
            return Ok(current);
        }
        self.apply(id, &patch).await
    }

    /// Flips a paid registration between approved and pending.
    ///
    /// # Errors
    ///
    /// - [`GatewayError::Validation`] for free registrations.
    /// - [`GatewayError::ParticipantNotFound`] if absent.
    /// - [`GatewayError::Store`] on store failure.
    pub async fn toggle_payment(&self, id: ParticipantId) -> Result<Participant, GatewayError> {
        let current = self.get(id).await?;
        let Some(next) = current.toggled_payment_status() else {
            return Err(GatewayError::field(
                "payment_status",
                "free registrations have no payment to toggle",
            ));
        };
        let updated = self.apply(id, &ParticipantPatch::payment(next)).await?;
        tracing::info!(%id, status = %next, "payment status changed");
        Ok(updated)
    }

    /// Flips the attendance-confirmed flag.
    ///
    /// # Errors
    ///
    /// - [`GatewayError::ParticipantNotFound`] if absent.
    /// - [`GatewayError::Store`] on store failure.
    pub async fn toggle_attendance(&self, id: ParticipantId) -> Result<Participant, GatewayError> {
        let current = self.get(id).await?;
        let confirmed = !current.attendance_confirmed;
        let updated = self.apply(id, &ParticipantPatch::attendance(confirmed)).await?;
        tracing::info!(%id, confirmed, "attendance changed");
        Ok(updated)
    }

    /// First step of a delete: echoes the participant back and records it
    /// as the session's pending deletion.
    ///
    /// # Errors
    ///
    /// - [`GatewayError::ParticipantNotFound`] if absent.
    /// - [`GatewayError::Unauthorized`] if the session is gone.
    pub async fn prepare_delete(&self, token: SessionToken, id: ParticipantId) -> Result<DeletionPreview, GatewayError> {
        let p = self.get(id).await?;
        if !self.sessions.set_pending_deletion(token, id).await {
            return Err(GatewayError::Unauthorized);
        }
        Ok(DeletionPreview {
            id: *id.as_uuid(),
            full_name: p.full_name,
            email: p.email,
            tax_id: p.tax_id,
            tier: p.tier,
        })
    }

    /// Irreversibly deletes a participant previously confirmed with
    /// [`Self::prepare_delete`] in the same session.
    ///
    /// # Errors
    ///
    /// - [`GatewayError::DeletionNotConfirmed`] without a matching
    ///   confirmation.
    /// - [`GatewayError::ParticipantNotFound`] if the store no longer has it.
    /// - [`GatewayError::Store`] on store failure; the confirmation stays
    ///   pending so the call can be retried.
    pub async fn delete(&self, token: SessionToken, id: ParticipantId) -> Result<(), GatewayError> {
        if !self.sessions.take_pending_deletion(token, id).await {
            return Err(GatewayError::DeletionNotConfirmed(*id.as_uuid()));
        }

        match self.store.delete(id).await {
            Ok(()) => {}
            Err(StoreError::NotFound) => {
                self.registry.remove(id).await;
                return Err(GatewayError::ParticipantNotFound(*id.as_uuid()));
            }
            Err(e) => {
                self.sessions.set_pending_deletion(token, id).await;
                return Err(store_failure(StoreAction::Delete)(e));
            }
        }

        self.registry.remove(id).await;
        tracing::info!(%id, "participant deleted");
        Ok(())
    }

    async fn apply(&self, id: ParticipantId, patch: &ParticipantPatch) -> Result<Participant, GatewayError> {
        match self.store.update(id, patch).await {
            Ok(stored) => {
                self.registry.apply_patch(id, patch).await;
                Ok(stored)
            }
            Err(StoreError::NotFound) => {
                self.registry.remove(id).await;
                Err(GatewayError::ParticipantNotFound(*id.as_uuid()))
            }
            Err(e) => Err(store_failure(StoreAction::Save)(e)),
        }
    }
}
