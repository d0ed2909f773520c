//! # Auth Broker
//!
//! Orchestrator for every authentication flow the client shell exposes.
//!
//! ## Overview
//!
//! The broker owns no session state. It chooses between the native identity
//! flow and the browser-redirect flow based on the runtime capability model,
//! delegates to the backend, and lets the backend's change subscription
//! deliver the resulting session into the [`SessionStore`]. Whichever path
//! produced a session, the store is the single source of truth - the broker
//! never assumes its own call established it.
//!
//! ## Flows
//!
//! - `sign_up` / `sign_in`: password flows against the backend. Neither
//!   transitions state directly; sign-up may additionally require e-mail
//!   verification before a session exists.
//! - `sign_in_with_identity`: native token exchange when the environment
//!   exposes a native identity provider, browser-redirect OAuth otherwise.
//!   The redirect variant returns before the round-trip completes.
//! - `sign_out`: best-effort native sign-out (only `NotSignedIn` is
//!   recovered locally), then an unconditional backend sign-out.
//!
//! Every backend or native-bridge round-trip runs under the configured auth
//! timeout.
//!
//! [`SessionStore`]: crate::session_store::SessionStore

use crate::error::{AuthError, AuthResult};
use bridge_traits::backend::AuthBackend;
use bridge_traits::capability::RuntimeEnvironment;
use bridge_traits::identity::IdentityProvider;
use core_runtime::config::CoreConfig;
use core_runtime::events::{AuthFlowEvent, CoreEvent, EventBus};
use std::future::Future;
use std::sync::Arc;
use tokio::time::timeout;
use tracing::{debug, info, instrument, warn};

/// Authentication orchestrator.
///
/// Constructed once by the service layer and shared by handle.
pub struct AuthBroker {
    backend: Arc<dyn AuthBackend>,
    identity: Option<Arc<dyn IdentityProvider>>,
    environment: RuntimeEnvironment,
    config: CoreConfig,
    event_bus: EventBus,
}

impl AuthBroker {
    /// Creates a new broker.
    ///
    /// `identity` may be `None` on hosts without a native identity bridge;
    /// the service layer guarantees it is present whenever the environment
    /// advertises the capability.
    pub fn new(
        backend: Arc<dyn AuthBackend>,
        identity: Option<Arc<dyn IdentityProvider>>,
        environment: RuntimeEnvironment,
        config: CoreConfig,
        event_bus: EventBus,
    ) -> Self {
        Self {
            backend,
            identity,
            environment,
            config,
            event_bus,
        }
    }

    /// The runtime environment this broker was wired for.
    pub fn environment(&self) -> RuntimeEnvironment {
        self.environment
    }

    /// Registers a new account with the backend.
    ///
    /// The verification redirect target is derived from the configured
    /// origin. A successful return does not mean a session exists: the
    /// backend may require e-mail verification, and the eventual state
    /// change arrives through the session store's subscription.
    #[instrument(skip(self, password), fields(email = %email))]
    pub async fn sign_up(&self, email: &str, password: &str) -> AuthResult {
        self.emit_signing_in("sign-up");
        let redirect_url = self.config.redirect_url();
        let result = self
            .bounded(
                "sign-up",
                self.backend.sign_up(email, password, &redirect_url),
            )
            .await;
        self.finish("sign-up", result)
    }

    /// Verifies password credentials with the backend.
    ///
    /// On success the backend's event stream delivers the session to the
    /// store; this call itself does not install it.
    #[instrument(skip(self, password), fields(email = %email))]
    pub async fn sign_in(&self, email: &str, password: &str) -> AuthResult {
        self.emit_signing_in("password");
        let result = self
            .bounded(
                "password sign-in",
                self.backend.sign_in_with_password(email, password),
            )
            .await;
        self.finish("password sign-in", result)
    }

    /// Signs in through the configured identity provider.
    ///
    /// Chooses the native token-exchange flow when the environment exposes a
    /// native identity provider, and the browser-redirect OAuth flow
    /// otherwise. The redirect flow returns before completion - the session
    /// arrives asynchronously through the store's subscription once the
    /// round-trip finishes.
    #[instrument(skip(self))]
    pub async fn sign_in_with_identity(&self) -> AuthResult {
        let result = if self.environment.supports_native_identity() {
            self.native_identity_sign_in().await
        } else {
            self.redirect_sign_in().await
        };
        self.finish("identity sign-in", result)
    }

    /// Signs out of the native provider (best effort) and the backend.
    ///
    /// A missing native session (`NotSignedIn`) is the only locally
    /// recovered failure. Any other native failure still lets the backend
    /// sign-out run - the session must end up cleared - and is reported in
    /// the result afterwards.
    #[instrument(skip(self))]
    pub async fn sign_out(&self) -> AuthResult {
        let mut native_failure = None;

        if self.environment.supports_native_identity() {
            if let Some(identity) = self.identity.as_ref() {
                match self.bounded("native sign-out", identity.sign_out()).await {
                    Ok(()) => debug!("Native sign-out completed"),
                    Err(AuthError::NotSignedIn) => {
                        debug!("No native session to sign out, continuing")
                    }
                    Err(error) => {
                        warn!(%error, "Native sign-out failed");
                        native_failure = Some(error);
                    }
                }
            }
        }

        let result = self
            .bounded("backend sign-out", self.backend.sign_out())
            .await;

        let result = match (result, native_failure) {
            (Ok(()), Some(error)) => Err(error),
            (result, _) => result,
        };
        self.finish("sign-out", result)
    }

    async fn native_identity_sign_in(&self) -> AuthResult {
        let Some(identity) = self.identity.as_ref() else {
            // Wiring bug: the capability was advertised without a bridge.
            return Err(AuthError::Provider(
                "Native identity capability present but no provider bridge is wired".to_string(),
            ));
        };

        self.emit_signing_in("native");
        info!("Starting native identity sign-in");

        let credential = self
            .bounded("native sign-in", identity.sign_in())
            .await?;

        let token = credential.id_token.ok_or(AuthError::MissingToken)?;

        self.bounded(
            "token exchange",
            self.backend
                .sign_in_with_id_token(self.config.provider, &token),
        )
        .await?;

        // The exchange succeeded; the backend's event stream installs the
        // session in the store.
        info!("Identity token exchange completed");
        Ok(())
    }

    async fn redirect_sign_in(&self) -> AuthResult {
        self.emit_signing_in("redirect");
        let redirect_url = self.config.redirect_url();
        info!(%redirect_url, "Starting browser-redirect sign-in");

        self.bounded(
            "oauth redirect",
            self.backend
                .sign_in_with_oauth(self.config.provider, &redirect_url),
        )
        .await
    }

    /// Runs a bridge or backend call under the configured auth timeout.
    async fn bounded<T, E>(
        &self,
        operation: &str,
        call: impl Future<Output = Result<T, E>>,
    ) -> Result<T, AuthError>
    where
        AuthError: From<E>,
    {
        match timeout(self.config.auth_timeout, call).await {
            Ok(result) => result.map_err(AuthError::from),
            Err(_) => {
                warn!(operation, "Auth operation timed out");
                Err(AuthError::Timeout(operation.to_string()))
            }
        }
    }

    fn emit_signing_in(&self, flow: &str) {
        self.event_bus
            .emit(CoreEvent::Auth(AuthFlowEvent::SigningIn {
                flow: flow.to_string(),
            }))
            .ok();
    }

    fn finish(&self, operation: &str, result: AuthResult) -> AuthResult {
        if let Err(error) = &result {
            warn!(operation, %error, "Auth operation failed");
            self.event_bus
                .emit(CoreEvent::Auth(AuthFlowEvent::Failed {
                    message: error.to_string(),
                    recoverable: error.is_recoverable(),
                }))
                .ok();
        }
        result
    }
}

impl std::fmt::Debug for AuthBroker {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthBroker")
            .field("environment", &self.environment)
            .field("has_identity_bridge", &self.identity.is_some())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use bridge_traits::backend::{ChangeSubscription, Session, SessionChangeListener};
    use bridge_traits::capability::Platform;
    use bridge_traits::error::{BackendError, IdentityError};
    use bridge_traits::identity::{IdentityConfig, IdentityCredential, ProviderKind};
    use std::sync::{Mutex, MutexGuard, PoisonError};

    fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
        mutex.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Backend double recording every call it receives.
    #[derive(Default)]
    struct RecordingBackend {
        calls: Mutex<Vec<String>>,
        password_response: Mutex<Option<BackendError>>,
        id_token_response: Mutex<Option<BackendError>>,
        sign_out_response: Mutex<Option<BackendError>>,
    }

    impl RecordingBackend {
        fn calls(&self) -> Vec<String> {
            lock(&self.calls).clone()
        }

        fn record(&self, call: impl Into<String>) {
            lock(&self.calls).push(call.into());
        }

        fn respond<T>(slot: &Mutex<Option<BackendError>>, ok: T) -> Result<T, BackendError> {
            match lock(slot).take() {
                Some(error) => Err(error),
                None => Ok(ok),
            }
        }
    }

    #[async_trait]
    impl AuthBackend for RecordingBackend {
        async fn sign_up(
            &self,
            email: &str,
            _password: &str,
            redirect_url: &str,
        ) -> Result<(), BackendError> {
            self.record(format!("sign_up:{}:{}", email, redirect_url));
            Ok(())
        }

        async fn sign_in_with_password(
            &self,
            email: &str,
            _password: &str,
        ) -> Result<(), BackendError> {
            self.record(format!("password:{}", email));
            Self::respond(&self.password_response, ())
        }

        async fn sign_in_with_id_token(
            &self,
            provider: ProviderKind,
            token: &str,
        ) -> Result<(), BackendError> {
            self.record(format!("id_token:{}:{}", provider.as_str(), token));
            Self::respond(&self.id_token_response, ())
        }

        async fn sign_in_with_oauth(
            &self,
            provider: ProviderKind,
            redirect_url: &str,
        ) -> Result<(), BackendError> {
            self.record(format!("oauth:{}:{}", provider.as_str(), redirect_url));
            Ok(())
        }

        async fn sign_out(&self) -> Result<(), BackendError> {
            self.record("sign_out");
            Self::respond(&self.sign_out_response, ())
        }

        async fn get_session(&self) -> Result<Option<Session>, BackendError> {
            self.record("get_session");
            Ok(None)
        }

        fn on_session_change(&self, _listener: SessionChangeListener) -> ChangeSubscription {
            ChangeSubscription::noop()
        }
    }

    /// Identity provider double with a scripted sign-in outcome.
    struct ScriptedIdentity {
        sign_in: Mutex<Option<Result<IdentityCredential, IdentityError>>>,
        sign_out: Mutex<Option<Result<(), IdentityError>>>,
        sign_in_calls: Mutex<usize>,
    }

    impl ScriptedIdentity {
        fn new(sign_in: Result<IdentityCredential, IdentityError>) -> Arc<Self> {
            Arc::new(Self {
                sign_in: Mutex::new(Some(sign_in)),
                sign_out: Mutex::new(Some(Ok(()))),
                sign_in_calls: Mutex::new(0),
            })
        }

        fn with_sign_out(self: Arc<Self>, response: Result<(), IdentityError>) -> Arc<Self> {
            *lock(&self.sign_out) = Some(response);
            self
        }

        fn sign_in_calls(&self) -> usize {
            *lock(&self.sign_in_calls)
        }
    }

    #[async_trait]
    impl IdentityProvider for ScriptedIdentity {
        async fn initialize(&self, _config: IdentityConfig) -> Result<(), IdentityError> {
            Ok(())
        }

        async fn sign_in(&self) -> Result<IdentityCredential, IdentityError> {
            *lock(&self.sign_in_calls) += 1;
            lock(&self.sign_in)
                .take()
                .unwrap_or(Ok(IdentityCredential::empty()))
        }

        async fn sign_out(&self) -> Result<(), IdentityError> {
            lock(&self.sign_out).take().unwrap_or(Ok(()))
        }
    }

    fn config() -> CoreConfig {
        CoreConfig::builder()
            .origin("https://app.example.com")
            .client_id("client-123")
            .build()
            .unwrap()
    }

    fn broker(
        backend: Arc<RecordingBackend>,
        identity: Option<Arc<ScriptedIdentity>>,
        environment: RuntimeEnvironment,
    ) -> AuthBroker {
        AuthBroker::new(
            backend,
            identity.map(|i| i as Arc<dyn IdentityProvider>),
            environment,
            config(),
            EventBus::new(16),
        )
    }

    #[tokio::test]
    async fn sign_up_builds_redirect_target_from_origin() {
        let backend = Arc::new(RecordingBackend::default());
        let broker = broker(backend.clone(), None, RuntimeEnvironment::browser());

        broker.sign_up("a@b.com", "pw").await.unwrap();

        assert_eq!(
            backend.calls(),
            vec!["sign_up:a@b.com:https://app.example.com/"]
        );
    }

    #[tokio::test]
    async fn sign_in_delegates_to_password_verification() {
        let backend = Arc::new(RecordingBackend::default());
        let broker = broker(backend.clone(), None, RuntimeEnvironment::browser());

        broker.sign_in("a@b.com", "pw").await.unwrap();

        assert_eq!(backend.calls(), vec!["password:a@b.com"]);
    }

    #[tokio::test]
    async fn sign_in_surfaces_validation_errors_verbatim() {
        let backend = Arc::new(RecordingBackend::default());
        *lock(&backend.password_response) =
            Some(BackendError::Validation("invalid email".to_string()));
        let broker = broker(backend, None, RuntimeEnvironment::browser());

        let result = broker.sign_in("not-an-email", "pw").await;

        assert_eq!(
            result,
            Err(AuthError::Validation("invalid email".to_string()))
        );
    }

    #[tokio::test]
    async fn identity_sign_in_on_native_exchanges_token() {
        let backend = Arc::new(RecordingBackend::default());
        let identity = ScriptedIdentity::new(Ok(IdentityCredential::with_token("id-token-1")));
        let broker = broker(
            backend.clone(),
            Some(identity),
            RuntimeEnvironment::native(Platform::Android),
        );

        broker.sign_in_with_identity().await.unwrap();

        assert_eq!(backend.calls(), vec!["id_token:google:id-token-1"]);
    }

    #[tokio::test]
    async fn identity_sign_in_without_token_fails_with_missing_token() {
        let backend = Arc::new(RecordingBackend::default());
        let identity = ScriptedIdentity::new(Ok(IdentityCredential::empty()));
        let broker = broker(
            backend.clone(),
            Some(identity),
            RuntimeEnvironment::native(Platform::Android),
        );

        let result = broker.sign_in_with_identity().await;

        assert_eq!(result, Err(AuthError::MissingToken));
        // No token exchange happened.
        assert!(backend.calls().is_empty());
    }

    #[tokio::test]
    async fn identity_sign_in_maps_native_cancellation() {
        let backend = Arc::new(RecordingBackend::default());
        let identity = ScriptedIdentity::new(Err(IdentityError::Cancelled));
        let broker = broker(
            backend,
            Some(identity),
            RuntimeEnvironment::native(Platform::Android),
        );

        let result = broker.sign_in_with_identity().await;

        assert_eq!(result, Err(AuthError::Cancelled));
    }

    #[tokio::test]
    async fn identity_sign_in_maps_native_provider_errors() {
        let backend = Arc::new(RecordingBackend::default());
        let identity = ScriptedIdentity::new(Err(IdentityError::Provider(
            "bad client configuration".to_string(),
        )));
        let broker = broker(
            backend,
            Some(identity),
            RuntimeEnvironment::native(Platform::Ios),
        );

        let result = broker.sign_in_with_identity().await;

        assert_eq!(
            result,
            Err(AuthError::Provider("bad client configuration".to_string()))
        );
    }

    #[tokio::test]
    async fn identity_sign_in_on_browser_starts_redirect_flow() {
        let backend = Arc::new(RecordingBackend::default());
        let identity = ScriptedIdentity::new(Ok(IdentityCredential::with_token("unused")));
        let broker = broker(
            backend.clone(),
            Some(identity.clone()),
            RuntimeEnvironment::browser(),
        );

        broker.sign_in_with_identity().await.unwrap();

        // The native bridge is never touched from a browser context.
        assert_eq!(identity.sign_in_calls(), 0);
        assert_eq!(
            backend.calls(),
            vec!["oauth:google:https://app.example.com/"]
        );
    }

    #[tokio::test]
    async fn sign_out_swallows_missing_native_session() {
        let backend = Arc::new(RecordingBackend::default());
        let identity = ScriptedIdentity::new(Ok(IdentityCredential::empty()))
            .with_sign_out(Err(IdentityError::NotSignedIn));
        let broker = broker(
            backend.clone(),
            Some(identity),
            RuntimeEnvironment::native(Platform::Android),
        );

        broker.sign_out().await.unwrap();

        // Backend sign-out still ran.
        assert_eq!(backend.calls(), vec!["sign_out"]);
    }

    #[tokio::test]
    async fn sign_out_reports_other_native_failures_after_backend_sign_out() {
        let backend = Arc::new(RecordingBackend::default());
        let identity = ScriptedIdentity::new(Ok(IdentityCredential::empty()))
            .with_sign_out(Err(IdentityError::Provider("token revoke failed".to_string())));
        let broker = broker(
            backend.clone(),
            Some(identity),
            RuntimeEnvironment::native(Platform::Android),
        );

        let result = broker.sign_out().await;

        assert_eq!(
            result,
            Err(AuthError::Provider("token revoke failed".to_string()))
        );
        assert_eq!(backend.calls(), vec!["sign_out"]);
    }

    #[tokio::test]
    async fn sign_out_on_browser_skips_native_bridge() {
        let backend = Arc::new(RecordingBackend::default());
        let broker = broker(backend.clone(), None, RuntimeEnvironment::browser());

        broker.sign_out().await.unwrap();

        assert_eq!(backend.calls(), vec!["sign_out"]);
    }

    #[tokio::test]
    async fn failed_operations_emit_auth_flow_events() {
        let backend = Arc::new(RecordingBackend::default());
        let identity = ScriptedIdentity::new(Err(IdentityError::Cancelled));
        let bus = EventBus::new(16);
        let mut events = bus.subscribe();
        let broker = AuthBroker::new(
            backend,
            Some(identity as Arc<dyn IdentityProvider>),
            RuntimeEnvironment::native(Platform::Android),
            config(),
            bus,
        );

        broker.sign_in_with_identity().await.unwrap_err();

        let mut saw_failed = false;
        while let Ok(event) = events.try_recv() {
            if let CoreEvent::Auth(AuthFlowEvent::Failed { recoverable, .. }) = event {
                assert!(recoverable, "cancellation is retryable");
                saw_failed = true;
            }
        }
        assert!(saw_failed, "expected a Failed auth flow event");
    }
}
