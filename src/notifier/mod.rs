//! Outbound notification delivery.
//!
//! The [`Notifier`] trait sends one templated message to one recipient.
//! [`EmailJsNotifier`] talks to the EmailJS REST API; [`LogNotifier`]
//! records sends through `tracing` when no email credentials are set.

pub mod emailjs;
pub mod logging;

use async_trait::async_trait;
use serde::Serialize;

pub use emailjs::{EmailJsConfig, EmailJsNotifier};
pub use logging::LogNotifier;

/// Message addressee.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Recipient {
    /// Email address.
    pub email: String,
    /// Display name.
    pub name: String,
}

/// Event details substituted into the message template.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TemplateContext {
    /// Event name.
    pub event_name: String,
    /// Event date.
    pub date: String,
    /// Venue.
    pub location: String,
    /// Time of day.
    pub time: String,
}

/// Delivery failure for a single message.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum NotifyError {
    /// The delivery service could not be reached or failed on its side.
    #[error("notification service unavailable: {0}")]
    Unavailable(String),
    /// The delivery service refused this message.
    #[error("message rejected: {0}")]
    Rejected(String),
}

/// Sends one templated message to one recipient.
#[async_trait]
pub trait Notifier: Send + Sync + std::fmt::Debug {
    /// Delivers the message built from `context` to `recipient`.
    async fn send(&self, recipient: &Recipient, context: &TemplateContext) -> Result<(), NotifyError>;
}
