//! Persistence layer: record-store traits and their implementations.
//!
//! Services talk to storage only through the traits below. The
//! PostgreSQL implementation backs production runs; [`MemoryStore`] backs
//! tests and runs with persistence disabled.

pub mod memory;
pub mod models;
pub mod postgres;

use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::credential::AdminCredential;
use crate::domain::event_config::EventConfiguration;
use crate::domain::participant::{NewParticipant, Participant, ParticipantPatch};
use crate::domain::participant_id::ParticipantId;

pub use memory::MemoryStore;
pub use postgres::PostgresStore;

/// Failure reported by a record store.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// The addressed record does not exist.
    #[error("record not found")]
    NotFound,
    /// The backend failed (connection, query, decoding).
    #[error("storage backend error: {0}")]
    Backend(String),
}

impl From<sqlx::Error> for StoreError {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::RowNotFound => Self::NotFound,
            other => Self::Backend(other.to_string()),
        }
    }
}

/// The `participants` collection.
#[async_trait]
pub trait ParticipantStore: Send + Sync + std::fmt::Debug {
    /// All participants, newest registration first.
    async fn list(&self) -> Result<Vec<Participant>, StoreError>;

    /// One participant by id.
    async fn get(&self, id: ParticipantId) -> Result<Option<Participant>, StoreError>;

    /// Persists a registration; the store assigns id and timestamp.
    async fn insert(&self, new: &NewParticipant) -> Result<Participant, StoreError>;

    /// Applies a partial update. [`StoreError::NotFound`] if absent.
    async fn update(&self, id: ParticipantId, patch: &ParticipantPatch) -> Result<Participant, StoreError>;

    /// Removes a participant. [`StoreError::NotFound`] if absent.
    async fn delete(&self, id: ParticipantId) -> Result<(), StoreError>;
}

/// The singleton `event_settings` collection.
#[async_trait]
pub trait EventSettingsStore: Send + Sync + std::fmt::Debug {
    /// The most recently written record, if any.
    async fn fetch(&self) -> Result<Option<(Uuid, EventConfiguration)>, StoreError>;

    /// The most recently written record, inserting `default` first when the
    /// collection is empty. Concurrent callers observe the same row.
    async fn get_or_create(
        &self,
        default: &EventConfiguration,
    ) -> Result<(Uuid, EventConfiguration), StoreError>;

    /// Inserts a record and returns its id.
    async fn insert(&self, config: &EventConfiguration) -> Result<Uuid, StoreError>;

    /// Replaces record `id`. When that row is gone the collection is cleared
    /// and the record inserted anew; the returned id is the surviving row.
    async fn replace(&self, id: Uuid, config: &EventConfiguration) -> Result<Uuid, StoreError>;
}

/// The `admin_credentials` collection.
#[async_trait]
pub trait CredentialStore: Send + Sync + std::fmt::Debug {
    /// Number of stored credentials.
    async fn count(&self) -> Result<u64, StoreError>;

    /// Credential for a normalized email.
    async fn find_by_email(&self, email: &str) -> Result<Option<AdminCredential>, StoreError>;

    /// Inserts the credential only if the collection is empty, atomically.
    /// Returns `None` when another credential already exists.
    async fn insert_if_empty(
        &self,
        email: &str,
        password_hash: &str,
    ) -> Result<Option<AdminCredential>, StoreError>;
}
