//! # signup-gateway
//!
//! REST API for a single event's registration site: public free and paid
//! sign-ups, an admin panel over the participant list, CSV export, event
//! configuration and bulk confirmation messages.
//!
//! ## Architecture
//!
//! ```text
//! Clients (HTTP)
//!     │
//!     ├── REST Handlers (api/)
//!     │
//!     ├── ParticipantService, CredentialService,
//!     │   EventConfigService, NotificationService (service/)
//!     │
//!     ├── ParticipantRegistry, SessionStore (domain/)
//!     │
//!     ├── Record store: PostgreSQL or in-memory (persistence/)
//!     └── Email delivery: EmailJS or log-only (notifier/)
//! ```

pub mod api;
pub mod app_state;
pub mod config;
pub mod domain;
pub mod error;
pub mod notifier;
pub mod persistence;
pub mod service;
