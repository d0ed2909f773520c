//! Backend session service bridge.
//!
//! Contract for the opaque identity/session backend the client talks to.
//! The backend owns credential verification, token issuance, and session
//! lifetime; this core is purely an orchestration boundary over it. Session
//! state reaches the core two ways: a one-shot [`AuthBackend::get_session`]
//! fetch at startup and a live [`AuthBackend::on_session_change`]
//! subscription that fires on every backend-side session transition.

use crate::error::BackendError;
use crate::identity::ProviderKind;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Externally-issued user identity.
///
/// Immutable once obtained; a re-authentication replaces the whole value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Identity {
    /// Opaque user id issued by the backend.
    pub user_id: String,
    /// E-mail address associated with the identity.
    pub email: String,
    /// Provider that originated this identity.
    pub provider: ProviderKind,
}

impl Identity {
    pub fn new(
        user_id: impl Into<String>,
        email: impl Into<String>,
        provider: ProviderKind,
    ) -> Self {
        Self {
            user_id: user_id.into(),
            email: email.into(),
            provider,
        }
    }
}

/// Live authentication session issued by the backend.
///
/// At most one session exists per process; absence is represented as
/// `Option::None` by the session store, never as an error value. Expiry
/// metadata is opaque to this core - the backend owns renewal.
///
/// # Security
///
/// Tokens must never be logged; the `Debug` implementation redacts them.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    /// Access token for backend API calls.
    pub access_token: String,
    /// Refresh token, when the backend issued one.
    pub refresh_token: Option<String>,
    /// Identity bound to this session, when known.
    pub identity: Option<Identity>,
    /// Expiry timestamp reported by the backend (opaque passthrough).
    pub expires_at: Option<DateTime<Utc>>,
}

impl Session {
    /// Session carrying only an access token.
    pub fn new(access_token: impl Into<String>) -> Self {
        Self {
            access_token: access_token.into(),
            refresh_token: None,
            identity: None,
            expires_at: None,
        }
    }

    /// Attach a refresh token.
    pub fn with_refresh_token(mut self, token: impl Into<String>) -> Self {
        self.refresh_token = Some(token.into());
        self
    }

    /// Attach the owning identity.
    pub fn with_identity(mut self, identity: Identity) -> Self {
        self.identity = Some(identity);
        self
    }

    /// Attach the backend-reported expiry timestamp.
    pub fn with_expires_at(mut self, expires_at: DateTime<Utc>) -> Self {
        self.expires_at = Some(expires_at);
        self
    }
}

impl fmt::Debug for Session {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Session")
            .field("access_token", &"[REDACTED]")
            .field(
                "refresh_token",
                &self.refresh_token.as_ref().map(|_| "[REDACTED]"),
            )
            .field("identity", &self.identity)
            .field("expires_at", &self.expires_at)
            .finish()
    }
}

/// Callback invoked with the new session value on every backend-side change.
pub type SessionChangeListener = Box<dyn Fn(Option<Session>) + Send + Sync>;

/// Guard for a live session-change subscription.
///
/// The subscription stays active while the guard is alive; dropping it (or
/// calling [`ChangeSubscription::unsubscribe`]) detaches the listener.
pub struct ChangeSubscription {
    cancel: Option<Box<dyn FnOnce() + Send>>,
}

impl ChangeSubscription {
    /// Wrap a cancellation action.
    pub fn new(cancel: impl FnOnce() + Send + 'static) -> Self {
        Self {
            cancel: Some(Box::new(cancel)),
        }
    }

    /// Subscription with no teardown action (useful for test doubles).
    pub fn noop() -> Self {
        Self { cancel: None }
    }

    /// Detach the listener explicitly.
    pub fn unsubscribe(mut self) {
        if let Some(cancel) = self.cancel.take() {
            cancel();
        }
    }
}

impl Drop for ChangeSubscription {
    fn drop(&mut self) {
        if let Some(cancel) = self.cancel.take() {
            cancel();
        }
    }
}

impl fmt::Debug for ChangeSubscription {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ChangeSubscription")
            .field("active", &self.cancel.is_some())
            .finish()
    }
}

/// Opaque backend identity/session service.
///
/// All methods are suspension points; the caller yields until the backend
/// answers. Session-establishing calls (`sign_in_with_password`,
/// `sign_in_with_id_token`, the OAuth redirect round-trip) do not return the
/// session directly - the backend delivers it through the change
/// subscription, keeping the session store the single source of truth.
#[async_trait]
pub trait AuthBackend: Send + Sync {
    /// Register a new account. The backend may require e-mail verification
    /// before a session exists; `redirect_url` is where the verification
    /// link lands.
    async fn sign_up(
        &self,
        email: &str,
        password: &str,
        redirect_url: &str,
    ) -> Result<(), BackendError>;

    /// Verify password credentials. On success the backend emits the new
    /// session through the change subscription.
    async fn sign_in_with_password(&self, email: &str, password: &str)
        -> Result<(), BackendError>;

    /// Exchange a native identity token for a backend session.
    async fn sign_in_with_id_token(
        &self,
        provider: ProviderKind,
        token: &str,
    ) -> Result<(), BackendError>;

    /// Begin a browser-redirect OAuth flow. Returns once the redirect is
    /// initiated; the eventual session arrives via the change subscription
    /// after the round-trip completes.
    async fn sign_in_with_oauth(
        &self,
        provider: ProviderKind,
        redirect_url: &str,
    ) -> Result<(), BackendError>;

    /// Terminate the backend session. Emits a session-cleared change event.
    async fn sign_out(&self) -> Result<(), BackendError>;

    /// One-shot fetch of the existing session, if any.
    async fn get_session(&self) -> Result<Option<Session>, BackendError>;

    /// Install a live session-change subscription.
    fn on_session_change(&self, listener: SessionChangeListener) -> ChangeSubscription;
}
