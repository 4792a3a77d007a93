//! Service layer: business logic orchestration.
//!
//! Services validate input, call the record store, and only then update
//! the in-memory mirrors, so a failed store call never leaves the registry
//! or the cached event configuration ahead of storage.

pub mod credential_service;
pub mod event_config_service;
pub mod notification_service;
pub mod participant_service;

pub use credential_service::{CredentialService, LoginOutcome, LoginSuccess};
pub use event_config_service::EventConfigService;
pub use notification_service::{BulkSendReport, NotificationService};
pub use participant_service::{DeletionPreview, ExportFile, ParticipantService};

use crate::error::{GatewayError, StoreAction};
use crate::persistence::StoreError;

/// Maps a store failure to the generic operation-level error.
pub(crate) fn store_failure(action: StoreAction) -> impl FnOnce(StoreError) -> GatewayError {
    move |err| GatewayError::Store {
        action,
        detail: err.to_string(),
    }
}
