//! Native identity provider bridge.
//!
//! Adapter contract for a platform-supplied sign-in provider (e.g. the
//! Google sign-in SDK embedded in a mobile shell). The provider hands back an
//! opaque identity token which the auth broker exchanges with the backend;
//! this crate never inspects the token itself.

use crate::error::IdentityError;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Identity provider tag attached to identities and token exchanges.
///
/// # Examples
///
/// ```
/// use bridge_traits::identity::ProviderKind;
///
/// assert_eq!(ProviderKind::Google.as_str(), "google");
/// assert_eq!(ProviderKind::parse("google"), Some(ProviderKind::Google));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ProviderKind {
    /// Google identity (native SDK sign-in or browser OAuth).
    Google,
}

impl ProviderKind {
    /// Human-readable display name for this provider.
    pub fn display_name(&self) -> &'static str {
        match self {
            ProviderKind::Google => "Google",
        }
    }

    /// Identifier string used in backend calls and logs.
    pub fn as_str(&self) -> &'static str {
        match self {
            ProviderKind::Google => "google",
        }
    }

    /// Parse a provider kind from its identifier string.
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "google" => Some(ProviderKind::Google),
            _ => None,
        }
    }
}

impl fmt::Display for ProviderKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.display_name())
    }
}

/// Startup configuration for the native identity provider.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IdentityConfig {
    /// OAuth client id registered with the identity provider.
    pub client_id: String,
    /// Scopes requested at sign-in.
    pub scopes: Vec<String>,
    /// Whether to request offline access (refresh token issuance).
    pub grant_offline_access: bool,
}

impl IdentityConfig {
    /// Configuration with the default scope set (`profile`, `email`) and
    /// offline access enabled.
    pub fn new(client_id: impl Into<String>) -> Self {
        Self {
            client_id: client_id.into(),
            scopes: vec!["profile".to_string(), "email".to_string()],
            grant_offline_access: true,
        }
    }

    /// Replace the requested scopes.
    pub fn with_scopes<I, S>(mut self, scopes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.scopes = scopes.into_iter().map(Into::into).collect();
        self
    }

    /// Set the offline-access flag.
    pub fn with_offline_access(mut self, grant: bool) -> Self {
        self.grant_offline_access = grant;
        self
    }
}

/// Result of a nominally successful native sign-in.
///
/// The token is optional: some provider configurations complete the sign-in
/// UI flow yet return no usable id token. Callers must treat the missing
/// token as a failure of their own operation, not of the bridge.
#[derive(Clone, PartialEq, Eq)]
pub struct IdentityCredential {
    /// Opaque id token to exchange with the backend, when present.
    pub id_token: Option<String>,
}

impl IdentityCredential {
    /// Credential carrying a token.
    pub fn with_token(id_token: impl Into<String>) -> Self {
        Self {
            id_token: Some(id_token.into()),
        }
    }

    /// Credential without a token (sign-in UI completed, no token issued).
    pub fn empty() -> Self {
        Self { id_token: None }
    }
}

// Tokens never appear in logs.
impl fmt::Debug for IdentityCredential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("IdentityCredential")
            .field("id_token", &self.id_token.as_ref().map(|_| "[REDACTED]"))
            .finish()
    }
}

/// Adapter over a platform-supplied identity provider.
///
/// Implementations wrap the native SDK exposed by the host shell. The trait
/// is only ever invoked when the runtime environment reports a native
/// identity capability; implementations may assume they run inside the
/// matching shell.
#[async_trait]
pub trait IdentityProvider: Send + Sync {
    /// Initialize the native provider. Called once at process start; calling
    /// it twice has undefined upstream semantics, so the service layer
    /// guards re-entry.
    async fn initialize(&self, config: IdentityConfig) -> Result<(), IdentityError>;

    /// Run the native sign-in flow.
    ///
    /// # Errors
    ///
    /// - [`IdentityError::Cancelled`] - the user dismissed the dialog
    /// - [`IdentityError::Provider`] - misconfiguration or network failure
    async fn sign_in(&self) -> Result<IdentityCredential, IdentityError>;

    /// Sign out of the native provider.
    ///
    /// # Errors
    ///
    /// - [`IdentityError::NotSignedIn`] - no active native session; callers
    ///   must treat this as non-fatal
    async fn sign_out(&self) -> Result<(), IdentityError>;
}
