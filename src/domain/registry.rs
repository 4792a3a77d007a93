//! In-memory mirror of the participants collection.
//!
//! [`ParticipantRegistry`] holds the canonical list in store order (newest
//! registration first) behind a [`tokio::sync::RwLock`]. Derived views,
//! stats and exports read a snapshot; the service layer writes through
//! after each successful store call so the mirror never runs ahead of the
//! store.

use tokio::sync::RwLock;

use super::ParticipantId;
use super::participant::{Participant, ParticipantPatch};
use super::stats::RegistryStats;

/// Canonical participant list shared by every admin session.
#[derive(Debug, Default)]
pub struct ParticipantRegistry {
    participants: RwLock<Vec<Participant>>,
}

impl ParticipantRegistry {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces the whole list, re-sorting newest first.
    pub async fn replace_all(&self, mut participants: Vec<Participant>) {
        participants.sort_by(|a, b| b.registered_at.cmp(&a.registered_at));
        *self.participants.write().await = participants;
    }

    /// Adds a just-registered participant at the front.
    pub async fn insert_front(&self, participant: Participant) {
        self.participants.write().await.insert(0, participant);
    }

    /// Applies `patch` to the participant, returning the updated record.
    pub async fn apply_patch(&self, id: ParticipantId, patch: &ParticipantPatch) -> Option<Participant> {
        let mut list = self.participants.write().await;
        let entry = list.iter_mut().find(|p| p.id == id)?;
        entry.apply(patch);
        Some(entry.clone())
    }

    /// Removes the participant, returning it if it was present.
    pub async fn remove(&self, id: ParticipantId) -> Option<Participant> {
        let mut list = self.participants.write().await;
        let index = list.iter().position(|p| p.id == id)?;
        Some(list.remove(index))
    }

    /// Looks up a participant by id.
    pub async fn get(&self, id: ParticipantId) -> Option<Participant> {
        self.participants
            .read()
            .await
            .iter()
            .find(|p| p.id == id)
            .cloned()
    }

    /// Clones the full list in store order.
    pub async fn snapshot(&self) -> Vec<Participant> {
        self.participants.read().await.clone()
    }

    /// Dashboard counters over the full list.
    pub async fn stats(&self) -> RegistryStats {
        RegistryStats::compute(&self.participants.read().await)
    }

    /// Number of participants.
    pub async fn len(&self) -> usize {
        self.participants.read().await.len()
    }

    /// Returns `true` if nobody is registered.
    pub async fn is_empty(&self) -> bool {
        self.participants.read().await.is_empty()
    }
}
