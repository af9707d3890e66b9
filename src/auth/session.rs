//! Client session state.
//!
//! [`AuthState`] owns the in-memory [`Session`] and mirrors its token to a
//! [`TokenStore`]. It is created once at startup and shared by `Arc`; only
//! login, logout and the unauthorized-response handler change it.

use std::sync::Arc;

use tokio::sync::RwLock;
use tracing::{error, info, warn};

use super::identity::{user_from_token, User};
use super::token_store::TokenStore;
use crate::error::{DriveError, Result};

/// Coarse session state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    /// No token held.
    LoggedOut,
    /// A token is held (not necessarily still accepted by the server).
    LoggedIn,
}

/// The current session: a token and the identity derived from it.
///
/// `user` is present exactly when `token` is.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Session {
    token: Option<String>,
    user: Option<User>,
}

impl Session {
    /// An empty, logged-out session.
    pub fn logged_out() -> Self {
        Self::default()
    }

    /// Build a session around a token, deriving its display identity.
    pub fn from_token(token: impl Into<String>) -> Self {
        let token = token.into();
        let user = user_from_token(&token);
        Self {
            token: Some(token),
            user: Some(user),
        }
    }

    /// The bearer token, if any.
    pub fn token(&self) -> Option<&str> {
        self.token.as_deref()
    }

    /// The display identity, if logged in.
    pub fn user(&self) -> Option<&User> {
        self.user.as_ref()
    }

    /// Whether a token is held.
    pub fn is_authenticated(&self) -> bool {
        self.token.is_some()
    }

    /// The coarse state of this session.
    pub fn state(&self) -> SessionState {
        if self.is_authenticated() {
            SessionState::LoggedIn
        } else {
            SessionState::LoggedOut
        }
    }
}

/// Holder of the process-wide session.
pub struct AuthState {
    store: Arc<dyn TokenStore>,
    session: RwLock<Session>,
}

impl AuthState {
    /// Create a logged-out holder over `store` without reading it.
    pub fn new(store: Arc<dyn TokenStore>) -> Self {
        Self {
            store,
            session: RwLock::new(Session::logged_out()),
        }
    }

    /// Create a holder whose initial state comes from the persisted token.
    ///
    /// The token is trusted as-is; it is only found to be stale when the
    /// server first answers 401.
    pub fn restore(store: Arc<dyn TokenStore>) -> Result<Self> {
        let session = match store.load()? {
            Some(token) if !token.is_empty() => {
                info!("restored persisted session");
                Session::from_token(token)
            }
            _ => Session::logged_out(),
        };
        Ok(Self {
            store,
            session: RwLock::new(session),
        })
    }

    /// Snapshot of the current session.
    pub async fn session(&self) -> Session {
        self.session.read().await.clone()
    }

    /// Current bearer token, if any.
    pub async fn token(&self) -> Option<String> {
        self.session.read().await.token.clone()
    }

    /// Current display identity, if any.
    pub async fn user(&self) -> Option<User> {
        self.session.read().await.user.clone()
    }

    /// Whether a token is held.
    pub async fn is_authenticated(&self) -> bool {
        self.session.read().await.is_authenticated()
    }

    /// Current coarse state.
    pub async fn state(&self) -> SessionState {
        self.session.read().await.state()
    }

    /// Start a session from a freshly issued token.
    ///
    /// The token is persisted before the in-memory session changes, so a
    /// storage failure leaves the previous session untouched.
    pub async fn establish(&self, token: impl Into<String>) -> Result<User> {
        let next = Session::from_token(token);
        if let Some(token) = next.token() {
            let token = token.to_string();
            self.with_store(move |store| store.save(&token)).await?;
        }
        let user = next.user.clone().unwrap_or_else(User::fallback);
        *self.session.write().await = next;
        info!(email = %user.email, "session established");
        Ok(user)
    }

    /// End the session (logout). Calling this on a logged-out holder is a no-op.
    pub async fn clear(&self) -> Result<()> {
        *self.session.write().await = Session::logged_out();
        self.with_store(|store| store.remove()).await
    }

    /// Tear the session down after the server rejected the token.
    ///
    /// Ends in the same state as [`AuthState::clear`], but a storage failure is
    /// logged instead of returned so the caller still sees the original
    /// unauthorized error.
    pub async fn expire(&self) {
        let was_authenticated = {
            let mut session = self.session.write().await;
            let was = session.is_authenticated();
            *session = Session::logged_out();
            was
        };

        if was_authenticated {
            warn!("server rejected session token, session cleared");
        }
        if let Err(e) = self.with_store(|store| store.remove()).await {
            error!("failed to remove persisted token: {}", e);
        }
    }

    /// Run a store operation on the blocking pool, outside the session lock.
    async fn with_store<T, F>(&self, op: F) -> Result<T>
    where
        F: FnOnce(&dyn TokenStore) -> Result<T> + Send + 'static,
        T: Send + 'static,
    {
        let store = self.store.clone();
        tokio::task::spawn_blocking(move || op(store.as_ref()))
            .await
            .map_err(|e| DriveError::Storage(format!("token store task failed: {}", e)))?
    }
}

impl std::fmt::Debug for AuthState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthState").finish_non_exhaustive()
    }
}
