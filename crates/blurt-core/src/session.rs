//! Shared handle to the current authenticated session.

use std::sync::{Arc, PoisonError, RwLock};

use crate::auth::{AuthResult, Session, SessionPersistence};

/// Owns the process's "who is signed in" state.
///
/// Front ends and services share one handle and derive authentication
/// state from the session itself instead of a separate flag, so the two
/// can never disagree. An optional [`SessionPersistence`] backend is
/// written through on every change.
#[derive(Clone, Default)]
pub struct SessionHandle {
    current: Arc<RwLock<Option<Session>>>,
    store: Option<Arc<dyn SessionPersistence>>,
}

impl SessionHandle {
    /// Creates a handle with no persistence; sessions live for the
    /// process only.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a handle backed by `store`, restoring any persisted
    /// session that is still valid.
    ///
    /// Restore failures degrade to a signed-out handle rather than
    /// blocking startup.
    #[must_use]
    pub fn with_persistence(store: Arc<dyn SessionPersistence>) -> Self {
        let restored = match store.load_session() {
            Ok(Some(session)) if session.is_expired() => {
                tracing::info!("Stored session has expired; starting signed out");
                if let Err(error) = store.clear_session() {
                    tracing::warn!("Failed to clear expired stored session: {error}");
                }
                None
            }
            Ok(session) => session,
            Err(error) => {
                tracing::warn!("Failed to restore session: {error}");
                None
            }
        };
        Self {
            current: Arc::new(RwLock::new(restored)),
            store: Some(store),
        }
    }

    /// Returns the current session, dropping it first if it has expired.
    #[must_use]
    pub fn current(&self) -> Option<Session> {
        let session = self
            .current
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone();
        match session {
            Some(session) if session.is_expired() => {
                tracing::debug!("Dropping expired session for user {}", session.user_id);
                if let Err(error) = self.clear() {
                    tracing::warn!("Failed to clear expired session: {error}");
                }
                None
            }
            other => other,
        }
    }

    /// The signed-in user's id, if any.
    #[must_use]
    pub fn user_id(&self) -> Option<String> {
        self.current().map(|session| session.user_id)
    }

    #[must_use]
    pub fn is_authenticated(&self) -> bool {
        self.current().is_some()
    }

    /// Makes `session` current, persisting it first so a storage failure
    /// leaves the handle signed out rather than half-established.
    pub fn establish(&self, session: Session) -> AuthResult<()> {
        if let Some(store) = &self.store {
            store.save_session(&session)?;
        }
        *self.current.write().unwrap_or_else(PoisonError::into_inner) = Some(session);
        Ok(())
    }

    /// Signs out locally and clears any persisted session.
    ///
    /// The in-memory session is dropped even when the persistence
    /// backend fails.
    pub fn clear(&self) -> AuthResult<()> {
        *self.current.write().unwrap_or_else(PoisonError::into_inner) = None;
        if let Some(store) = &self.store {
            store.clear_session()?;
        }
        Ok(())
    }
}
