//! Event configuration: get-or-create, save, and the cached copy.

use std::sync::Arc;

use tokio::sync::RwLock;
use uuid::Uuid;

use super::store_failure;
use crate::domain::color::ResolvedTheme;
use crate::domain::event_config::EventConfiguration;
use crate::error::{GatewayError, StoreAction};
use crate::persistence::EventSettingsStore;

#[derive(Debug, Clone)]
struct Cached {
    id: Option<Uuid>,
    config: EventConfiguration,
    theme: ResolvedTheme,
}

impl Cached {
    fn new(id: Option<Uuid>, config: EventConfiguration) -> Self {
        let theme = config.theme.resolve();
        Self { id, config, theme }
    }
}

/// Owns the singleton event configuration and its resolved theme.
///
/// Until [`Self::load`] succeeds the built-in default is served.
#[derive(Debug)]
pub struct EventConfigService {
    store: Arc<dyn EventSettingsStore>,
    cached: RwLock<Cached>,
}

impl EventConfigService {
    /// Creates a service serving the default configuration until loaded.
    #[must_use]
    pub fn new(store: Arc<dyn EventSettingsStore>) -> Self {
        Self {
            store,
            cached: RwLock::new(Cached::new(None, EventConfiguration::default())),
        }
    }

    /// Reads the latest stored record, creating the default when none exists.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::Store`] on store failure; the cached copy is
    /// left unchanged.
    pub async fn load(&self) -> Result<EventConfiguration, GatewayError> {
        let (id, config) = self
            .store
            .get_or_create(&EventConfiguration::default())
            .await
            .map_err(store_failure(StoreAction::Load))?;
        tracing::debug!(%id, name = %config.name, "event configuration loaded");

        *self.cached.write().await = Cached::new(Some(id), config.clone());
        Ok(config)
    }

    /// Current configuration.
    pub async fn current(&self) -> EventConfiguration {
        self.cached.read().await.config.clone()
    }

    /// Current theme with every color resolved to hex.
    pub async fn theme(&self) -> ResolvedTheme {
        self.cached.read().await.theme.clone()
    }

    /// Validates and stores `config`, replacing the record wholesale.
    ///
    /// # Errors
    ///
    /// - [`GatewayError::Validation`] if a field is invalid.
    /// - [`GatewayError::Store`] on store failure.
    pub async fn save(&self, config: EventConfiguration) -> Result<EventConfiguration, GatewayError> {
        config.validate().map_err(GatewayError::Validation)?;

        let mut cached = self.cached.write().await;
        let target = match cached.id {
            Some(id) => id,
            None => {
                self.store
                    .get_or_create(&config)
                    .await
                    .map_err(store_failure(StoreAction::Save))?
                    .0
            }
        };
        let id = self
            .store
            .replace(target, &config)
            .await
            .map_err(store_failure(StoreAction::Save))?;

        *cached = Cached::new(Some(id), config.clone());
        tracing::info!(%id, name = %config.name, "event configuration saved");
        Ok(config)
    }
}
