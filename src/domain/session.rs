//! Process-local admin sessions.
//!
//! Each successful login opens a session addressed by an opaque bearer
//! token. The session carries the admin's list view settings and any
//! pending deletion, so two admins browsing at once never see each other's
//! filters. Sessions expire after a sliding TTL and are never persisted.

use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Duration, Utc};
use tokio::sync::RwLock;
use uuid::Uuid;

use super::ParticipantId;
use super::view::ViewState;

/// Opaque bearer token identifying an admin session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SessionToken(Uuid);

impl SessionToken {
    fn generate() -> Self {
        Self(Uuid::new_v4())
    }
}

impl fmt::Display for SessionToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl FromStr for SessionToken {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Uuid::parse_str(s).map(Self)
    }
}

/// State held for one logged-in admin.
#[derive(Debug, Clone)]
pub struct AdminSession {
    /// Admin email the session belongs to.
    pub email: String,
    /// When the session was opened.
    pub opened_at: DateTime<Utc>,
    /// When the session lapses unless used again.
    pub expires_at: DateTime<Utc>,
    /// Participant list view settings.
    pub view: ViewState,
    /// Participant awaiting delete confirmation.
    pub pending_deletion: Option<ParticipantId>,
}

/// All live admin sessions.
#[derive(Debug)]
pub struct SessionStore {
    ttl: Duration,
    sessions: RwLock<HashMap<SessionToken, AdminSession>>,
}

impl SessionStore {
    /// Creates an empty store whose sessions live `ttl` past their last use.
    #[must_use]
    pub fn new(ttl: Duration) -> Self {
        Self {
            ttl,
            sessions: RwLock::new(HashMap::new()),
        }
    }

    /// Opens a session for `email` and returns its token.
    pub async fn open(&self, email: &str) -> SessionToken {
        self.open_at(email, Utc::now()).await
    }

    async fn open_at(&self, email: &str, now: DateTime<Utc>) -> SessionToken {
        let token = SessionToken::generate();
        let mut sessions = self.sessions.write().await;
        sessions.retain(|_, s| s.expires_at > now);
        sessions.insert(
            token,
            AdminSession {
                email: email.to_string(),
                opened_at: now,
                expires_at: now + self.ttl,
                view: ViewState::default(),
                pending_deletion: None,
            },
        );
        token
    }

    /// Ends a session. Returns `false` if it did not exist.
    pub async fn close(&self, token: SessionToken) -> bool {
        self.sessions.write().await.remove(&token).is_some()
    }

    /// Validates `token` and extends its expiry, returning the admin email.
    pub async fn authenticate(&self, token: SessionToken) -> Option<String> {
        self.authenticate_at(token, Utc::now()).await
    }

    async fn authenticate_at(&self, token: SessionToken, now: DateTime<Utc>) -> Option<String> {
        let mut sessions = self.sessions.write().await;
        sessions.retain(|_, s| s.expires_at > now);
        let session = sessions.get_mut(&token)?;
        session.expires_at = now + self.ttl;
        Some(session.email.clone())
    }

    /// Runs `f` against the session's view settings.
    pub async fn with_view<R>(&self, token: SessionToken, f: impl FnOnce(&mut ViewState) -> R) -> Option<R> {
        let mut sessions = self.sessions.write().await;
        sessions.get_mut(&token).map(|s| f(&mut s.view))
    }

    /// Records `id` as the participant awaiting delete confirmation.
    pub async fn set_pending_deletion(&self, token: SessionToken, id: ParticipantId) -> bool {
        let mut sessions = self.sessions.write().await;
        match sessions.get_mut(&token) {
            Some(s) => {
                s.pending_deletion = Some(id);
                true
            }
            None => false,
        }
    }

    /// Clears the pending deletion if it is `id`.
    ///
    /// Returns `false` (and leaves any other pending id in place) otherwise.
    pub async fn take_pending_deletion(&self, token: SessionToken, id: ParticipantId) -> bool {
        let mut sessions = self.sessions.write().await;
        match sessions.get_mut(&token) {
            Some(s) if s.pending_deletion == Some(id) => {
                s.pending_deletion = None;
                true
            }
            _ => false,
        }
    }

    /// Number of live (possibly expired but not yet purged) sessions.
    pub async fn len(&self) -> usize {
        self.sessions.read().await.len()
    }

    /// Returns `true` if no session is held.
    pub async fn is_empty(&self) -> bool {
        self.sessions.read().await.is_empty()
    }
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;
    use crate::domain::view::TierFilter;

    fn store() -> SessionStore {
        SessionStore::new(Duration::minutes(30))
    }

    #[tokio::test]
    async fn open_authenticate_close() {
        let sessions = store();
        let token = sessions.open("admin@event.com").await;
        assert_eq!(
            sessions.authenticate(token).await.as_deref(),
            Some("admin@event.com")
        );
        assert!(sessions.close(token).await);
        assert!(sessions.authenticate(token).await.is_none());
        assert!(!sessions.close(token).await);
    }

    #[tokio::test]
    async fn expiry_slides_on_use() {
        let sessions = store();
        let t0 = Utc::now();
        let token = sessions.open_at("a@b.com", t0).await;

        let t1 = t0 + Duration::minutes(20);
        assert!(sessions.authenticate_at(token, t1).await.is_some());
        let t2 = t1 + Duration::minutes(20);
        assert!(sessions.authenticate_at(token, t2).await.is_some());

        let t3 = t2 + Duration::minutes(31);
        assert!(sessions.authenticate_at(token, t3).await.is_none());
        assert!(sessions.is_empty().await);
    }

    #[tokio::test]
    async fn opening_purges_expired_sessions() {
        let sessions = store();
        let t0 = Utc::now();
        let _ = sessions.open_at("old@b.com", t0).await;
        let _ = sessions.open_at("new@b.com", t0 + Duration::hours(1)).await;
        assert_eq!(sessions.len().await, 1);
    }

    #[tokio::test]
    async fn authenticating_purges_expired_sessions() {
        let sessions = store();
        let t0 = Utc::now();
        let _ = sessions.open_at("old@b.com", t0).await;
        let live = sessions.open_at("new@b.com", t0 + Duration::minutes(20)).await;
        assert_eq!(sessions.len().await, 2);

        let later = t0 + Duration::minutes(35);
        assert!(sessions.authenticate_at(live, later).await.is_some());
        assert_eq!(sessions.len().await, 1);
    }

    #[tokio::test]
    async fn views_are_per_session() {
        let sessions = store();
        let a = sessions.open("a@b.com").await;
        let b = sessions.open("b@b.com").await;

        let _ = sessions.with_view(a, |v| v.set_tier(TierFilter::Paid)).await;
        let Some(tier_b) = sessions.with_view(b, |v| v.tier()).await else {
            panic!("session b should exist");
        };
        assert_eq!(tier_b, TierFilter::All);

        let unknown: SessionToken = SessionToken::generate();
        assert!(sessions.with_view(unknown, |v| v.page()).await.is_none());
    }

    #[tokio::test]
    async fn pending_deletion_must_match() {
        let sessions = store();
        let token = sessions.open("a@b.com").await;
        let target = ParticipantId::new();
        let other = ParticipantId::new();

        assert!(!sessions.take_pending_deletion(token, target).await);
        assert!(sessions.set_pending_deletion(token, target).await);
        assert!(!sessions.take_pending_deletion(token, other).await);
        assert!(sessions.take_pending_deletion(token, target).await);
        assert!(!sessions.take_pending_deletion(token, target).await);
    }

    #[test]
    fn token_parses_from_display() {
        let token = SessionToken::generate();
        assert_eq!(token.to_string().parse::<SessionToken>().ok(), Some(token));
        assert!("not-a-token".parse::<SessionToken>().is_err());
    }
}
