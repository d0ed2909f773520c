//! # Core Configuration Module
//!
//! Configuration for the client-shell core, built through a validating
//! builder. The configuration is deliberately small: the core orchestrates
//! bridges rather than owning resources, so what it needs is the web origin
//! (for OAuth redirect targets), the native identity provider settings, and
//! a couple of runtime knobs.
//!
//! ## Usage
//!
//! ```
//! use core_runtime::config::CoreConfig;
//!
//! let config = CoreConfig::builder()
//!     .origin("https://app.example.com")
//!     .client_id("client-id.apps.example.com")
//!     .build()
//!     .expect("valid config");
//!
//! assert_eq!(config.redirect_url(), "https://app.example.com/");
//! ```
//!
//! ## Error Handling
//!
//! `build()` fails fast with an actionable message when a required value is
//! missing or malformed; nothing downstream has to re-validate.

use crate::error::{Error, Result};
use bridge_traits::identity::{IdentityConfig, ProviderKind};
use std::time::Duration;
use url::Url;

/// Default timeout applied to backend and native-bridge round-trips.
pub const DEFAULT_AUTH_TIMEOUT: Duration = Duration::from_secs(120);

/// Core configuration for the client shell.
///
/// Construct via [`CoreConfig::builder`].
#[derive(Debug, Clone)]
pub struct CoreConfig {
    /// Web origin of the client, used to derive OAuth redirect targets.
    pub origin: Url,

    /// Native identity provider settings. The client id may be empty for
    /// browser-only hosts; the service layer enforces presence when a native
    /// identity capability is wired up.
    pub identity: IdentityConfig,

    /// Identity provider used for token exchange and OAuth redirects.
    pub provider: ProviderKind,

    /// Event bus buffer capacity.
    pub event_buffer: usize,

    /// Timeout for auth operations crossing into the backend or a native
    /// bridge.
    pub auth_timeout: Duration,
}

impl CoreConfig {
    /// Creates a new builder for constructing a `CoreConfig`.
    pub fn builder() -> CoreConfigBuilder {
        CoreConfigBuilder::default()
    }

    /// Redirect target derived from the configured origin (`{origin}/`).
    pub fn redirect_url(&self) -> String {
        self.origin
            .join("/")
            .map(|url| url.to_string())
            .unwrap_or_else(|_| self.origin.to_string())
    }

    /// Whether a native identity client id was configured.
    pub fn has_identity_client(&self) -> bool {
        !self.identity.client_id.is_empty()
    }

    /// Validates the configuration.
    pub fn validate(&self) -> Result<()> {
        if !matches!(self.origin.scheme(), "http" | "https") {
            return Err(Error::Config(format!(
                "Origin must be an http(s) URL, got scheme '{}'",
                self.origin.scheme()
            )));
        }

        if self.origin.host_str().is_none() {
            return Err(Error::Config("Origin URL has no host".to_string()));
        }

        if self.identity.scopes.is_empty() {
            return Err(Error::Config(
                "Identity scopes cannot be empty. Use .scopes() to set them.".to_string(),
            ));
        }

        if self.event_buffer == 0 {
            return Err(Error::Config(
                "Event buffer capacity must be greater than 0".to_string(),
            ));
        }

        if self.auth_timeout.is_zero() {
            return Err(Error::Config(
                "Auth timeout must be greater than zero".to_string(),
            ));
        }

        Ok(())
    }
}

/// Builder for [`CoreConfig`] instances.
#[derive(Default)]
pub struct CoreConfigBuilder {
    origin: Option<String>,
    client_id: Option<String>,
    scopes: Option<Vec<String>>,
    grant_offline_access: Option<bool>,
    provider: Option<ProviderKind>,
    event_buffer: Option<usize>,
    auth_timeout: Option<Duration>,
}

impl CoreConfigBuilder {
    /// Sets the web origin of the client (required).
    ///
    /// Must be an absolute http(s) URL such as `https://app.example.com`.
    pub fn origin(mut self, origin: impl Into<String>) -> Self {
        self.origin = Some(origin.into());
        self
    }

    /// Sets the OAuth client id for the native identity provider.
    ///
    /// Required only when the host wires up a native identity bridge.
    pub fn client_id(mut self, client_id: impl Into<String>) -> Self {
        self.client_id = Some(client_id.into());
        self
    }

    /// Replaces the identity scopes (default: `profile`, `email`).
    pub fn scopes<I, S>(mut self, scopes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.scopes = Some(scopes.into_iter().map(Into::into).collect());
        self
    }

    /// Sets the offline-access flag (default: true).
    pub fn grant_offline_access(mut self, grant: bool) -> Self {
        self.grant_offline_access = Some(grant);
        self
    }

    /// Sets the identity provider (default: Google).
    pub fn provider(mut self, provider: ProviderKind) -> Self {
        self.provider = Some(provider);
        self
    }

    /// Sets the event bus buffer capacity (default: 100).
    pub fn event_buffer(mut self, capacity: usize) -> Self {
        self.event_buffer = Some(capacity);
        self
    }

    /// Sets the auth operation timeout (default: 120 s).
    pub fn auth_timeout(mut self, timeout: Duration) -> Self {
        self.auth_timeout = Some(timeout);
        self
    }

    /// Builds the final `CoreConfig`, validating as it goes.
    pub fn build(self) -> Result<CoreConfig> {
        let origin = self
            .origin
            .ok_or_else(|| Error::Config("Origin is required. Use .origin() to set it.".to_string()))?;

        let origin = Url::parse(&origin)
            .map_err(|e| Error::Config(format!("Origin is not a valid URL: {}", e)))?;

        let mut identity = IdentityConfig::new(self.client_id.unwrap_or_default());
        if let Some(scopes) = self.scopes {
            identity = identity.with_scopes(scopes);
        }
        if let Some(grant) = self.grant_offline_access {
            identity = identity.with_offline_access(grant);
        }

        let config = CoreConfig {
            origin,
            identity,
            provider: self.provider.unwrap_or(ProviderKind::Google),
            event_buffer: self
                .event_buffer
                .unwrap_or(crate::events::DEFAULT_EVENT_BUFFER_SIZE),
            auth_timeout: self.auth_timeout.unwrap_or(DEFAULT_AUTH_TIMEOUT),
        };

        config.validate()?;

        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builder_with_defaults() {
        let config = CoreConfig::builder()
            .origin("https://app.example.com")
            .build()
            .unwrap();

        assert_eq!(config.provider, ProviderKind::Google);
        assert_eq!(config.event_buffer, 100);
        assert_eq!(config.auth_timeout, DEFAULT_AUTH_TIMEOUT);
        assert_eq!(config.identity.scopes, vec!["profile", "email"]);
        assert!(config.identity.grant_offline_access);
        assert!(!config.has_identity_client());
    }

    #[test]
    fn builder_requires_origin() {
        let result = CoreConfig::builder().build();
        assert!(result.is_err());
        assert!(result
            .unwrap_err()
            .to_string()
            .contains("Origin is required"));
    }

    #[test]
    fn builder_rejects_malformed_origin() {
        let result = CoreConfig::builder().origin("not a url").build();
        assert!(result.is_err());
        assert!(result.unwrap_err().to_string().contains("not a valid URL"));
    }

    #[test]
    fn builder_rejects_non_http_origin() {
        let result = CoreConfig::builder().origin("ftp://app.example.com").build();
        assert!(result.is_err());
        assert!(result.unwrap_err().to_string().contains("http(s)"));
    }

    #[test]
    fn builder_rejects_empty_scopes() {
        let result = CoreConfig::builder()
            .origin("https://app.example.com")
            .scopes(Vec::<String>::new())
            .build();
        assert!(result.is_err());
        assert!(result.unwrap_err().to_string().contains("scopes"));
    }

    #[test]
    fn builder_rejects_zero_event_buffer() {
        let result = CoreConfig::builder()
            .origin("https://app.example.com")
            .event_buffer(0)
            .build();
        assert!(result.is_err());
    }

    #[test]
    fn builder_rejects_zero_timeout() {
        let result = CoreConfig::builder()
            .origin("https://app.example.com")
            .auth_timeout(Duration::ZERO)
            .build();
        assert!(result.is_err());
    }

    #[test]
    fn redirect_url_is_origin_root() {
        let config = CoreConfig::builder()
            .origin("https://app.example.com")
            .build()
            .unwrap();
        assert_eq!(config.redirect_url(), "https://app.example.com/");
    }

    #[test]
    fn client_id_marks_identity_configured() {
        let config = CoreConfig::builder()
            .origin("https://app.example.com")
            .client_id("client-123")
            .build()
            .unwrap();
        assert!(config.has_identity_client());
        assert_eq!(config.identity.client_id, "client-123");
    }
}
