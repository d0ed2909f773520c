//! Core service façade and bootstrap helpers.
//!
//! This crate wires host-provided bridge implementations (backend session
//! service, native identity provider, native playback engine) into the
//! shared client-shell core. The host constructs a [`CoreService`] once at
//! process start with its [`RuntimeEnvironment`] and bridge handles; the
//! service validates the wiring against the environment's capabilities,
//! builds the session store, auth broker, and playback delegator, and hands
//! them out by reference.
//!
//! ## Fail-fast strategy
//!
//! When the environment advertises a native capability but the matching
//! bridge (or its configuration) is missing, construction fails with a
//! descriptive [`CoreError::CapabilityMissing`] instead of deferring the
//! failure to the first sign-in or playback attempt.

pub mod error;

pub use error::{CoreError, Result};

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use bridge_traits::backend::AuthBackend;
use bridge_traits::capability::RuntimeEnvironment;
use bridge_traits::identity::IdentityProvider;
use bridge_traits::playback::PlaybackEngine;
use core_auth::{AuthBroker, SessionStore};
use core_playback::PlaybackDelegator;
use core_runtime::config::CoreConfig;
use core_runtime::events::{CoreEvent, EventBus, Receiver};
use tracing::info;

/// Aggregated handle to the bridge dependencies the core requires.
///
/// The backend is always required; the native bridges are optional and
/// validated against the runtime environment at service construction.
pub struct CoreDependencies {
    pub backend: Arc<dyn AuthBackend>,
    pub identity: Option<Arc<dyn IdentityProvider>>,
    pub playback: Option<Arc<dyn PlaybackEngine>>,
}

impl CoreDependencies {
    /// Dependency bundle with only the backend wired.
    pub fn new(backend: Arc<dyn AuthBackend>) -> Self {
        Self {
            backend,
            identity: None,
            playback: None,
        }
    }

    /// Attach a native identity provider bridge.
    pub fn with_identity(mut self, identity: Arc<dyn IdentityProvider>) -> Self {
        self.identity = Some(identity);
        self
    }

    /// Attach a native playback engine bridge.
    pub fn with_playback(mut self, playback: Arc<dyn PlaybackEngine>) -> Self {
        self.playback = Some(playback);
        self
    }
}

/// Primary façade exposed to host applications.
pub struct CoreService {
    config: CoreConfig,
    environment: RuntimeEnvironment,
    event_bus: EventBus,
    session_store: Arc<SessionStore>,
    broker: AuthBroker,
    delegator: PlaybackDelegator,
    backend: Arc<dyn AuthBackend>,
    identity: Option<Arc<dyn IdentityProvider>>,
    initialized: AtomicBool,
}

impl CoreService {
    /// Wires the core components from the provided dependencies.
    ///
    /// # Errors
    ///
    /// - [`CoreError::CapabilityMissing`] when the environment advertises a
    ///   native capability without a matching bridge or client id
    pub fn new(
        config: CoreConfig,
        environment: RuntimeEnvironment,
        deps: CoreDependencies,
    ) -> Result<Self> {
        if environment.supports_native_identity() {
            if deps.identity.is_none() {
                return Err(CoreError::CapabilityMissing {
                    capability: "IdentityProvider".to_string(),
                    message: format!(
                        "The {} native shell exposes native identity sign-in but no \
                         IdentityProvider bridge was injected. Inject the platform \
                         adapter or construct a browser environment.",
                        environment.platform
                    ),
                });
            }
            if !config.has_identity_client() {
                return Err(CoreError::CapabilityMissing {
                    capability: "IdentityProvider".to_string(),
                    message: "Native identity sign-in requires a client id. \
                              Use CoreConfig::builder().client_id(..) to set it."
                        .to_string(),
                });
            }
        }

        if environment.supports_native_playback() && deps.playback.is_none() {
            return Err(CoreError::CapabilityMissing {
                capability: "PlaybackEngine".to_string(),
                message: format!(
                    "The {} native shell exposes native playback but no \
                     PlaybackEngine bridge was injected.",
                    environment.platform
                ),
            });
        }

        let event_bus = EventBus::new(config.event_buffer);
        let session_store = SessionStore::new(event_bus.clone());

        let broker = AuthBroker::new(
            Arc::clone(&deps.backend),
            deps.identity.clone(),
            environment,
            config.clone(),
            event_bus.clone(),
        );

        let delegator = PlaybackDelegator::new(deps.playback, environment, event_bus.clone());

        Ok(Self {
            config,
            environment,
            event_bus,
            session_store,
            broker,
            delegator,
            backend: deps.backend,
            identity: deps.identity,
            initialized: AtomicBool::new(false),
        })
    }

    /// One-shot startup: initializes the native identity provider (when the
    /// capability is present) and then the session store.
    ///
    /// # Errors
    ///
    /// - [`CoreError::InitializationFailed`] on a second call, or when the
    ///   native identity provider rejects its configuration
    pub async fn initialize(&self) -> Result<()> {
        if self.initialized.swap(true, Ordering::SeqCst) {
            return Err(CoreError::InitializationFailed(
                "initialize() may only be called once per service instance".to_string(),
            ));
        }

        if self.environment.supports_native_identity() {
            if let Some(identity) = self.identity.as_ref() {
                identity
                    .initialize(self.config.identity.clone())
                    .await
                    .map_err(|error| {
                        CoreError::InitializationFailed(format!(
                            "Native identity provider initialization failed: {}",
                            error
                        ))
                    })?;
                info!("Native identity provider initialized");
            }
        }

        self.session_store
            .initialize(Arc::clone(&self.backend))
            .await;
        info!("Session store initialized");

        Ok(())
    }

    /// The session store handle.
    pub fn session_store(&self) -> Arc<SessionStore> {
        Arc::clone(&self.session_store)
    }

    /// The auth broker.
    pub fn auth(&self) -> &AuthBroker {
        &self.broker
    }

    /// The playback delegator.
    pub fn playback(&self) -> &PlaybackDelegator {
        &self.delegator
    }

    /// The runtime environment this service was wired for.
    pub fn environment(&self) -> RuntimeEnvironment {
        self.environment
    }

    /// Subscribes to the core event stream.
    pub fn subscribe_events(&self) -> Receiver<CoreEvent> {
        self.event_bus.subscribe()
    }
}

impl std::fmt::Debug for CoreService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CoreService")
            .field("environment", &self.environment)
            .field("initialized", &self.initialized.load(Ordering::SeqCst))
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use bridge_traits::backend::{ChangeSubscription, Session, SessionChangeListener};
    use bridge_traits::capability::Platform;
    use bridge_traits::error::{BackendError, EngineError, IdentityError};
    use bridge_traits::identity::{IdentityConfig, IdentityCredential, ProviderKind};
    use bridge_traits::playback::{PlaybackRequest, PlaybackResult};

    struct StubBackend;

    #[async_trait]
    impl AuthBackend for StubBackend {
        async fn sign_up(&self, _: &str, _: &str, _: &str) -> std::result::Result<(), BackendError> {
            Ok(())
        }
        async fn sign_in_with_password(
            &self,
            _: &str,
            _: &str,
        ) -> std::result::Result<(), BackendError> {
            Ok(())
        }
        async fn sign_in_with_id_token(
            &self,
            _: ProviderKind,
            _: &str,
        ) -> std::result::Result<(), BackendError> {
            Ok(())
        }
        async fn sign_in_with_oauth(
            &self,
            _: ProviderKind,
            _: &str,
        ) -> std::result::Result<(), BackendError> {
            Ok(())
        }
        async fn sign_out(&self) -> std::result::Result<(), BackendError> {
            Ok(())
        }
        async fn get_session(&self) -> std::result::Result<Option<Session>, BackendError> {
            Ok(None)
        }
        fn on_session_change(&self, _: SessionChangeListener) -> ChangeSubscription {
            ChangeSubscription::noop()
        }
    }

    struct StubIdentity;

    #[async_trait]
    impl IdentityProvider for StubIdentity {
        async fn initialize(&self, _: IdentityConfig) -> std::result::Result<(), IdentityError> {
            Ok(())
        }
        async fn sign_in(&self) -> std::result::Result<IdentityCredential, IdentityError> {
            Ok(IdentityCredential::empty())
        }
        async fn sign_out(&self) -> std::result::Result<(), IdentityError> {
            Ok(())
        }
    }

    struct StubEngine;

    #[async_trait]
    impl PlaybackEngine for StubEngine {
        async fn play(
            &self,
            _: PlaybackRequest,
        ) -> std::result::Result<PlaybackResult, EngineError> {
            Ok(PlaybackResult {
                position_ms: 0,
                duration_ms: 0,
                completed: true,
            })
        }
    }

    fn config(client_id: Option<&str>) -> CoreConfig {
        let mut builder = CoreConfig::builder().origin("https://app.example.com");
        if let Some(client_id) = client_id {
            builder = builder.client_id(client_id);
        }
        builder.build().unwrap()
    }

    #[test]
    fn browser_environment_needs_only_the_backend() {
        let service = CoreService::new(
            config(None),
            RuntimeEnvironment::browser(),
            CoreDependencies::new(Arc::new(StubBackend)),
        );
        assert!(service.is_ok());
    }

    #[test]
    fn native_identity_capability_requires_the_bridge() {
        let result = CoreService::new(
            config(Some("client-123")),
            RuntimeEnvironment::native(Platform::Ios),
            CoreDependencies::new(Arc::new(StubBackend)),
        );

        match result {
            Err(CoreError::CapabilityMissing { capability, .. }) => {
                assert_eq!(capability, "IdentityProvider");
            }
            other => panic!("Expected CapabilityMissing, got {:?}", other.err()),
        }
    }

    #[test]
    fn native_identity_capability_requires_a_client_id() {
        let result = CoreService::new(
            config(None),
            RuntimeEnvironment::native(Platform::Ios),
            CoreDependencies::new(Arc::new(StubBackend)).with_identity(Arc::new(StubIdentity)),
        );

        match result {
            Err(CoreError::CapabilityMissing { message, .. }) => {
                assert!(message.contains("client id"));
            }
            other => panic!("Expected CapabilityMissing, got {:?}", other.err()),
        }
    }

    #[test]
    fn android_environment_requires_the_playback_bridge() {
        let result = CoreService::new(
            config(Some("client-123")),
            RuntimeEnvironment::native(Platform::Android),
            CoreDependencies::new(Arc::new(StubBackend)).with_identity(Arc::new(StubIdentity)),
        );

        match result {
            Err(CoreError::CapabilityMissing { capability, .. }) => {
                assert_eq!(capability, "PlaybackEngine");
            }
            other => panic!("Expected CapabilityMissing, got {:?}", other.err()),
        }
    }

    #[test]
    fn fully_wired_android_service_constructs() {
        let service = CoreService::new(
            config(Some("client-123")),
            RuntimeEnvironment::native(Platform::Android),
            CoreDependencies::new(Arc::new(StubBackend))
                .with_identity(Arc::new(StubIdentity))
                .with_playback(Arc::new(StubEngine)),
        )
        .unwrap();

        assert!(service.playback().is_available());
        assert!(service.session_store().is_loading());
    }

    #[tokio::test]
    async fn initialize_is_one_shot() {
        let service = CoreService::new(
            config(None),
            RuntimeEnvironment::browser(),
            CoreDependencies::new(Arc::new(StubBackend)),
        )
        .unwrap();

        service.initialize().await.unwrap();
        let second = service.initialize().await;

        assert!(matches!(
            second,
            Err(CoreError::InitializationFailed(_))
        ));
    }

    #[tokio::test]
    async fn initialize_resolves_the_store_loading_flag() {
        let service = CoreService::new(
            config(None),
            RuntimeEnvironment::browser(),
            CoreDependencies::new(Arc::new(StubBackend)),
        )
        .unwrap();

        assert!(service.session_store().is_loading());
        service.initialize().await.unwrap();
        assert!(!service.session_store().is_loading());
        assert!(service.session_store().current_session().is_none());
    }
}
