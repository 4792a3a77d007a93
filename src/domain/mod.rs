//! Domain layer: participants, event configuration, views and sessions.
//!
//! Everything here is free of HTTP and storage concerns. The participant
//! registry mirrors the store in memory, views and exports are pure
//! functions over it, and admin sessions carry per-admin view state.

pub mod color;
pub mod credential;
pub mod event_config;
pub mod export;
pub mod participant;
pub mod participant_id;
pub mod phone;
pub mod registry;
pub mod session;
pub mod stats;
pub mod tax_id;
pub mod validation;
pub mod view;

pub use credential::{AdminCredential, CredentialHasher};
pub use event_config::EventConfiguration;
pub use participant::{Participant, ParticipantPatch, PaymentStatus, Tier};
pub use participant_id::ParticipantId;
pub use registry::ParticipantRegistry;
pub use session::{SessionStore, SessionToken};
pub use stats::RegistryStats;
pub use view::{Page, SortKey, TierFilter, ViewState, ViewUpdate};
