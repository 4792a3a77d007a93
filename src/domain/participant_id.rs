//! Type-safe participant identifier.
//!
//! [`ParticipantId`] is a newtype wrapper around [`uuid::Uuid`] so that
//! participant identifiers cannot be confused with session tokens or the
//! event-settings record id.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Opaque unique identifier assigned by the record store on creation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ParticipantId(uuid::Uuid);

impl ParticipantId {
    /// Creates a new random `ParticipantId` (UUID v4).
    #[must_use]
    pub fn new() -> Self {
        Self(uuid::Uuid::new_v4())
    }

    /// Creates a `ParticipantId` from an existing [`uuid::Uuid`].
    #[must_use]
    pub const fn from_uuid(uuid: uuid::Uuid) -> Self {
        Self(uuid)
    }

    /// Returns the inner [`uuid::Uuid`].
    #[must_use]
    pub const fn as_uuid(&self) -> &uuid::Uuid {
        &self.0
    }
}

impl Default for ParticipantId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for ParticipantId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<uuid::Uuid> for ParticipantId {
    fn from(uuid: uuid::Uuid) -> Self {
        Self(uuid)
    }
}

impl From<ParticipantId> for uuid::Uuid {
    fn from(id: ParticipantId) -> Self {
        id.0
    }
}
