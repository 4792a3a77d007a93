//! In-memory record store.
//!
//! Implements every store trait behind [`tokio::sync::RwLock`]s. Used when
//! persistence is disabled and throughout the test suite; the
//! `set_unavailable` switch simulates a backend outage.

use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;
use uuid::Uuid;

use super::{CredentialStore, EventSettingsStore, ParticipantStore, StoreError};
use crate::domain::credential::AdminCredential;
use crate::domain::event_config::EventConfiguration;
use crate::domain::participant::{NewParticipant, Participant, ParticipantPatch};
use crate::domain::participant_id::ParticipantId;

/// Process-local store for participants, event settings and credentials.
#[derive(Debug, Default)]
pub struct MemoryStore {
    participants: RwLock<Vec<Participant>>,
    settings: RwLock<Vec<(Uuid, EventConfiguration)>>,
    credentials: RwLock<Vec<AdminCredential>>,
    unavailable: AtomicBool,
}

impl MemoryStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes every subsequent call fail with [`StoreError::Backend`] while
    /// `down` is `true`.
    pub fn set_unavailable(&self, down: bool) {
        self.unavailable.store(down, Ordering::SeqCst);
    }

    fn check(&self) -> Result<(), StoreError> {
        if self.unavailable.load(Ordering::SeqCst) {
            Err(StoreError::Backend("store unavailable".to_string()))
        } else {
            Ok(())
        }
    }
}

#[async_trait]
impl ParticipantStore for MemoryStore {
    async fn list(&self) -> Result<Vec<Participant>, StoreError> {
        self.check()?;
        Ok(self.participants.read().await.clone())
    }

    async fn get(&self, id: ParticipantId) -> Result<Option<Participant>, StoreError> {
        self.check()?;
        Ok(self
            .participants
            .read()
            .await
            .iter()
            .find(|p| p.id == id)
            .cloned())
    }

    async fn insert(&self, new: &NewParticipant) -> Result<Participant, StoreError> {
        self.check()?;
        let participant = Participant::from_new(ParticipantId::new(), Utc::now(), new.clone());
        self.participants
            .write()
            .await
            .insert(0, participant.clone());
        Ok(participant)
    }

    async fn update(&self, id: ParticipantId, patch: &ParticipantPatch) -> Result<Participant, StoreError> {
        self.check()?;
        let mut list = self.participants.write().await;
        let entry = list
            .iter_mut()
            .find(|p| p.id == id)
            .ok_or(StoreError::NotFound)?;
        entry.apply(patch);
        Ok(entry.clone())
    }

    async fn delete(&self, id: ParticipantId) -> Result<(), StoreError> {
        self.check()?;
        let mut list = self.participants.write().await;
        let index = list
            .iter()
            .position(|p| p.id == id)
            .ok_or(StoreError::NotFound)?;
        list.remove(index);
        Ok(())
    }
}

#[async_trait]
impl EventSettingsStore for MemoryStore {
    async fn fetch(&self) -> Result<Option<(Uuid, EventConfiguration)>, StoreError> {
        self.check()?;
        Ok(self.settings.read().await.last().cloned())
    }

    async fn get_or_create(
        &self,
        default: &EventConfiguration,
    ) -> Result<(Uuid, EventConfiguration), StoreError> {
        self.check()?;
        let mut rows = self.settings.write().await;
        if let Some(row) = rows.last() {
            return Ok(row.clone());
        }
        let row = (Uuid::new_v4(), default.clone());
        rows.push(row.clone());
        Ok(row)
    }

    async fn insert(&self, config: &EventConfiguration) -> Result<Uuid, StoreError> {
        self.check()?;
        let id = Uuid::new_v4();
        self.settings.write().await.push((id, config.clone()));
        Ok(id)
    }

    async fn replace(&self, id: Uuid, config: &EventConfiguration) -> Result<Uuid, StoreError> {
        self.check()?;
        let mut rows = self.settings.write().await;
        if let Some(index) = rows.iter().position(|(row_id, _)| *row_id == id) {
            rows.remove(index);
            rows.push((id, config.clone()));
            return Ok(id);
        }
        rows.clear();
        let new_id = Uuid::new_v4();
        rows.push((new_id, config.clone()));
        Ok(new_id)
    }
}

#[async_trait]
impl CredentialStore for MemoryStore {
    async fn count(&self) -> Result<u64, StoreError> {
        self.check()?;
        Ok(self.credentials.read().await.len() as u64)
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<AdminCredential>, StoreError> {
        self.check()?;
        Ok(self
            .credentials
            .read()
            .await
            .iter()
            .find(|c| c.email == email)
            .cloned())
    }

    async fn insert_if_empty(
        &self,
        email: &str,
        password_hash: &str,
    ) -> Result<Option<AdminCredential>, StoreError> {
        self.check()?;
        let mut creds = self.credentials.write().await;
        if !creds.is_empty() {
            return Ok(None);
        }
        let credential = AdminCredential {
            id: Uuid::new_v4(),
            email: email.to_string(),
            password_hash: password_hash.to_string(),
        };
        creds.push(credential.clone());
        Ok(Some(credential))
    }
}
