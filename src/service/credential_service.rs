//! Admin bootstrap and login.
//!
//! The first login against an empty credential collection creates the
//! admin account from the submitted email and password. Every later login
//! is verified against the stored hash. Unknown emails and wrong passwords
//! produce the same [`GatewayError::InvalidCredentials`].

use std::sync::Arc;

use serde::Serialize;
use utoipa::ToSchema;

use super::store_failure;
use crate::domain::credential::CredentialHasher;
use crate::domain::session::{SessionStore, SessionToken};
use crate::domain::validation::FieldError;
use crate::error::{GatewayError, StoreAction};
use crate::persistence::CredentialStore;

/// Which transition a successful login took.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum LoginOutcome {
    /// The submitted credentials became the admin account.
    Bootstrapped,
    /// The submitted credentials matched the stored account.
    Verified,
}

/// Result of a successful login.
#[derive(Debug, Clone)]
pub struct LoginSuccess {
    /// Bearer token for the new session.
    pub token: SessionToken,
    /// Normalized admin email.
    pub email: String,
    /// Transition taken.
    pub outcome: LoginOutcome,
}

/// Credential bootstrap, verification and session issuance.
#[derive(Debug, Clone)]
pub struct CredentialService {
    store: Arc<dyn CredentialStore>,
    hasher: CredentialHasher,
    sessions: Arc<SessionStore>,
}

impl CredentialService {
    /// Creates a new `CredentialService`.
    #[must_use]
    pub fn new(
        store: Arc<dyn CredentialStore>,
        hasher: CredentialHasher,
        sessions: Arc<SessionStore>,
    ) -> Self {
        Self {
            store,
            hasher,
            sessions,
        }
    }

    /// Returns the session store.
    #[must_use]
    pub fn sessions(&self) -> &Arc<SessionStore> {
        &self.sessions
    }

    /// Whether no admin account exists yet. Advisory only; [`Self::login`]
    /// decides again at submit time.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::Store`] if the count cannot be read.
    pub async fn is_first_user(&self) -> Result<bool, GatewayError> {
        let count = self
            .store
            .count()
            .await
            .map_err(store_failure(StoreAction::Load))?;
        Ok(count == 0)
    }

    /// Runs the bootstrap or verify transition and opens a session.
    ///
    /// # Errors
    ///
    /// - [`GatewayError::Validation`] for a blank email or password.
    /// - [`GatewayError::BootstrapFailed`] if the first credential cannot
    ///   be stored.
    /// - [`GatewayError::InvalidCredentials`] for any verify failure.
    pub async fn login(&self, email: &str, password: &str) -> Result<LoginSuccess, GatewayError> {
        let email = email.trim().to_lowercase();
        let mut errors = Vec::new();
        if email.is_empty() {
            errors.push(FieldError::new("email", "required"));
        }
        if password.is_empty() {
            errors.push(FieldError::new("password", "required"));
        }
        if !errors.is_empty() {
            return Err(GatewayError::Validation(errors));
        }

        let outcome = if self.is_first_user().await? && self.bootstrap(&email, password).await? {
            LoginOutcome::Bootstrapped
        } else {
            self.verify(&email, password).await?;
            LoginOutcome::Verified
        };

        let token = self.sessions.open(&email).await;
        tracing::info!(%email, ?outcome, "admin logged in");
        Ok(LoginSuccess {
            token,
            email,
            outcome,
        })
    }

    /// Ends the session. Returns `false` if it was already gone.
    pub async fn logout(&self, token: SessionToken) -> bool {
        self.sessions.close(token).await
    }

    /// Resolves a bearer token to the admin email.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::Unauthorized`] for unknown or expired tokens.
    pub async fn authenticate(&self, token: SessionToken) -> Result<String, GatewayError> {
        self.sessions
            .authenticate(token)
            .await
            .ok_or(GatewayError::Unauthorized)
    }

    /// Stores the first credential. Returns `false` if another caller won
    /// the race, in which case the caller verifies instead.
    async fn bootstrap(&self, email: &str, password: &str) -> Result<bool, GatewayError> {
        let hasher = self.hasher.clone();
        let password = password.to_string();
        let hash = tokio::task::spawn_blocking(move || hasher.hash(&password))
            .await
            .map_err(|e| GatewayError::Internal(e.to_string()))?
            .map_err(|e| GatewayError::BootstrapFailed(e.to_string()))?;

        match self.store.insert_if_empty(email, &hash).await {
            Ok(Some(_)) => {
                tracing::info!(email, "admin account bootstrapped");
                Ok(true)
            }
            Ok(None) => {
                tracing::info!(email, "bootstrap lost to a concurrent login; verifying instead");
                Ok(false)
            }
            Err(e) => Err(GatewayError::BootstrapFailed(e.to_string())),
        }
    }

    async fn verify(&self, email: &str, password: &str) -> Result<(), GatewayError> {
        let credential = match self.store.find_by_email(email).await {
            Ok(Some(c)) => c,
            Ok(None) => {
                tracing::debug!(email, "login rejected: unknown email");
                return Err(GatewayError::InvalidCredentials);
            }
            Err(e) => {
                tracing::error!(email, error = %e, "login rejected: credential lookup failed");
                return Err(GatewayError::InvalidCredentials);
            }
        };

        let hasher = self.hasher.clone();
        let password = password.to_string();
        let stored = credential.password_hash;
        let matches = tokio::task::spawn_blocking(move || hasher.verify(&password, &stored))
            .await
            .map_err(|e| GatewayError::Internal(e.to_string()))?;

        if matches {
            Ok(())
        } else {
            tracing::debug!(email, "login rejected: password mismatch");
            Err(GatewayError::InvalidCredentials)
        }
    }
}
