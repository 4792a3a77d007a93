//! Shared application state injected into all Axum handlers.

use std::sync::Arc;
use std::time::Duration;

use crate::config::GatewayConfig;
use crate::domain::credential::HashError;
use crate::domain::{CredentialHasher, ParticipantRegistry, SessionStore};
use crate::notifier::Notifier;
use crate::persistence::{CredentialStore, EventSettingsStore, ParticipantStore};
use crate::service::{CredentialService, EventConfigService, NotificationService, ParticipantService};

/// Shared application state available to all handlers via Axum's
/// `State` extractor.
#[derive(Debug, Clone)]
pub struct AppState {
    /// Admin bootstrap, login and sessions.
    pub credentials: Arc<CredentialService>,
    /// Registrations and participant administration.
    pub participants: Arc<ParticipantService>,
    /// Event configuration and theme.
    pub event_config: Arc<EventConfigService>,
    /// Bulk notifications.
    pub notifications: Arc<NotificationService>,
}

/// Storage backends the services are wired to.
#[derive(Debug, Clone)]
pub struct Stores {
    /// Participants collection.
    pub participants: Arc<dyn ParticipantStore>,
    /// Event settings collection.
    pub event_settings: Arc<dyn EventSettingsStore>,
    /// Admin credentials collection.
    pub credentials: Arc<dyn CredentialStore>,
}

impl Stores {
    /// Uses one backend for every collection.
    pub fn single<S>(store: Arc<S>) -> Self
    where
        S: ParticipantStore + EventSettingsStore + CredentialStore + 'static,
    {
        Self {
            participants: Arc::clone(&store) as Arc<dyn ParticipantStore>,
            event_settings: Arc::clone(&store) as Arc<dyn EventSettingsStore>,
            credentials: store,
        }
    }
}

impl AppState {
    /// Wires the services together. Nothing is loaded from storage yet; call
    /// [`Self::load`] before serving.
    #[must_use]
    pub fn new(
        stores: Stores,
        notifier: Arc<dyn Notifier>,
        hasher: CredentialHasher,
        session_ttl: chrono::Duration,
        notify_delay: Duration,
    ) -> Self {
        let sessions = Arc::new(SessionStore::new(session_ttl));
        let registry = Arc::new(ParticipantRegistry::new());
        let event_config = Arc::new(EventConfigService::new(stores.event_settings));

        let credentials = Arc::new(CredentialService::new(
            stores.credentials,
            hasher,
            Arc::clone(&sessions),
        ));
        let participants = Arc::new(ParticipantService::new(
            stores.participants,
            Arc::clone(&registry),
            sessions,
            Arc::clone(&event_config),
        ));
        let notifications = Arc::new(NotificationService::new(
            notifier,
            registry,
            Arc::clone(&event_config),
            notify_delay,
        ));

        Self {
            credentials,
            participants,
            event_config,
            notifications,
        }
    }

    /// Wires the services with the tunables from `config`.
    ///
    /// # Errors
    ///
    /// Returns [`HashError`] if the configured hash cost is rejected.
    pub fn from_config(
        config: &GatewayConfig,
        stores: Stores,
        notifier: Arc<dyn Notifier>,
    ) -> Result<Self, HashError> {
        let hasher =
            CredentialHasher::new(config.password_hash_memory_kib, config.password_hash_iterations)?;
        Ok(Self::new(
            stores,
            notifier,
            hasher,
            chrono::Duration::minutes(config.session_ttl_minutes),
            Duration::from_millis(config.notify_delay_ms),
        ))
    }

    /// Loads the event configuration and mirrors the participant collection.
    ///
    /// # Errors
    ///
    /// Returns the first store failure.
    pub async fn load(&self) -> Result<(), crate::error::GatewayError> {
        self.event_config.load().await?;
        self.participants.load().await?;
        Ok(())
    }
}
