//! Session state: the auth token and the signed-in user's profile.
//!
//! Only the token is durable. A session restored at start-up therefore has
//! a token but no profile until the user signs in again; the token alone is
//! enough for order history, while checkout also needs the profile.

use secrecy::SecretString;
use thiserror::Error;

use crate::error::{clear_sentry_user, set_sentry_user};
use crate::gateway::{AuthResponse, GatewayError, UserProfile};
use crate::storage::TokenStore;

/// Errors from signing in or registering.
#[derive(Debug, Error)]
pub enum SessionError {
    /// The API rejected the request or could not be reached.
    #[error(transparent)]
    Gateway(#[from] GatewayError),
}

/// In-memory session. Both fields absent means guest.
#[derive(Clone, Default)]
pub struct Session {
    token: Option<SecretString>,
    user: Option<UserProfile>,
}

impl std::fmt::Debug for Session {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session")
            .field("token", &self.token.as_ref().map(|_| "[REDACTED]"))
            .field("user", &self.user)
            .finish()
    }
}

impl Session {
    /// A guest session.
    #[must_use]
    pub const fn guest() -> Self {
        Self {
            token: None,
            user: None,
        }
    }

    /// Session holding a token and profile.
    #[must_use]
    pub const fn signed_in(token: SecretString, user: UserProfile) -> Self {
        Self {
            token: Some(token),
            user: Some(user),
        }
    }

    /// True when a token is held.
    #[must_use]
    pub const fn is_authenticated(&self) -> bool {
        self.token.is_some()
    }

    #[must_use]
    pub const fn token(&self) -> Option<&SecretString> {
        self.token.as_ref()
    }

    #[must_use]
    pub const fn user(&self) -> Option<&UserProfile> {
        self.user.as_ref()
    }
}

/// A [`Session`] together with the store its token is persisted to.
pub struct SessionContext {
    session: Session,
    store: Box<dyn TokenStore>,
}

impl std::fmt::Debug for SessionContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionContext")
            .field("session", &self.session)
            .finish_non_exhaustive()
    }
}

impl SessionContext {
    /// Restore the session from `store` without validating the token.
    ///
    /// An unreadable store is logged and treated as a guest session.
    #[must_use]
    pub fn restore(store: Box<dyn TokenStore>) -> Self {
        let token = match store.load() {
            Ok(token) => token,
            Err(e) => {
                tracing::warn!(error = %e, "Could not read stored token, starting as guest");
                None
            }
        };

        if token.is_some() {
            tracing::debug!("Restored session token");
        }

        Self {
            session: Session { token, user: None },
            store,
        }
    }

    #[must_use]
    pub const fn session(&self) -> &Session {
        &self.session
    }

    /// The backing token store.
    #[must_use]
    pub fn store(&self) -> &dyn TokenStore {
        self.store.as_ref()
    }

    /// Adopt the token and profile from a successful auth response.
    ///
    /// The in-memory session is updated even if persisting the token fails;
    /// the failure is logged and the session simply won't survive a restart.
    pub fn establish(&mut self, auth: AuthResponse) {
        let token = SecretString::from(auth.token);

        if let Err(e) = self.store.save(&token) {
            tracing::warn!(error = %e, "Could not persist session token");
        }

        set_sentry_user(&auth.user.id, auth.user.email.as_deref());
        tracing::info!(user_id = %auth.user.id, "Signed in");

        self.session = Session::signed_in(token, auth.user);
    }

    /// Drop the session and the durable token.
    pub fn clear(&mut self) {
        if let Err(e) = self.store.remove() {
            tracing::warn!(error = %e, "Could not remove stored token");
        }
        clear_sentry_user();
        self.session = Session::guest();
    }
}
