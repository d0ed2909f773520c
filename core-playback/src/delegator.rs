//! # Playback Delegator
//!
//! Hands playback requests to the native media engine when one exists.
//!
//! The availability check is pure and runs at call time: if it answers
//! negative, the engine is never touched for that call - there is no window
//! in which a request can race past a negative capability answer. Engine
//! failures are forwarded to the caller exactly as the engine raised them,
//! because the UI layer owns fallback and retry decisions.

use bridge_traits::capability::RuntimeEnvironment;
use bridge_traits::error::EngineError;
use bridge_traits::playback::{PlaybackEngine, PlaybackRequest, PlaybackResult};
use core_runtime::events::{CoreEvent, EventBus, PlaybackEvent};
use std::sync::Arc;
use tracing::{debug, info, instrument, warn};

/// Outcome of a delegation attempt.
///
/// `Unavailable` is a distinguished non-error value meaning "no native
/// engine exists here" - callers use it to select an embedded fallback
/// player. It is distinct from an engine failure, which arrives as an
/// [`EngineError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Delegation {
    /// The native engine played the request and reported where it ended.
    Native(PlaybackResult),
    /// No native engine in this environment; nothing was attempted.
    Unavailable,
}

impl Delegation {
    /// The native result, when playback was delegated.
    pub fn result(&self) -> Option<&PlaybackResult> {
        match self {
            Delegation::Native(result) => Some(result),
            Delegation::Unavailable => None,
        }
    }

    /// `true` when no native engine was available.
    pub fn is_unavailable(&self) -> bool {
        matches!(self, Delegation::Unavailable)
    }
}

/// Gateway between the UI and the platform-native media engine.
pub struct PlaybackDelegator {
    engine: Option<Arc<dyn PlaybackEngine>>,
    environment: RuntimeEnvironment,
    event_bus: EventBus,
}

impl PlaybackDelegator {
    /// Creates a new delegator.
    ///
    /// `engine` may be `None` on hosts without a native playback bridge;
    /// such a delegator always answers [`Delegation::Unavailable`].
    pub fn new(
        engine: Option<Arc<dyn PlaybackEngine>>,
        environment: RuntimeEnvironment,
        event_bus: EventBus,
    ) -> Self {
        Self {
            engine,
            environment,
            event_bus,
        }
    }

    /// Whether the native engine can be used here.
    ///
    /// Pure and safe to call repeatedly: true only when the environment
    /// exposes the playback capability and an engine bridge was injected.
    pub fn is_available(&self) -> bool {
        self.environment.supports_native_playback() && self.engine.is_some()
    }

    /// Plays the request on the native engine, or reports unavailability.
    ///
    /// # Errors
    ///
    /// Engine failures (decode, network, crash) are returned exactly as the
    /// engine raised them - never wrapped, never swallowed - so the caller
    /// can surface them for fallback or retry.
    #[instrument(skip(self, request), fields(url = %request.url))]
    pub async fn play(&self, request: PlaybackRequest) -> Result<Delegation, EngineError> {
        let engine = match self.engine.as_ref() {
            Some(engine) if self.environment.supports_native_playback() => engine,
            _ => {
                debug!("No native playback engine available, returning sentinel");
                return Ok(Delegation::Unavailable);
            }
        };

        info!(title = ?request.title, "Delegating playback to native engine");
        self.event_bus
            .emit(CoreEvent::Playback(PlaybackEvent::Delegated {
                url: request.url.clone(),
                title: request.title.clone(),
            }))
            .ok();

        match engine.play(request).await {
            Ok(result) => {
                info!(
                    position_ms = result.position_ms,
                    completed = result.completed,
                    "Native playback finished"
                );
                self.event_bus
                    .emit(CoreEvent::Playback(PlaybackEvent::Finished {
                        position_ms: result.position_ms,
                        duration_ms: result.duration_ms,
                        completed: result.completed,
                    }))
                    .ok();
                Ok(Delegation::Native(result))
            }
            Err(error) => {
                warn!(%error, "Native playback failed");
                self.event_bus
                    .emit(CoreEvent::Playback(PlaybackEvent::Failed {
                        message: error.to_string(),
                    }))
                    .ok();
                Err(error)
            }
        }
    }
}

impl std::fmt::Debug for PlaybackDelegator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PlaybackDelegator")
            .field("environment", &self.environment)
            .field("has_engine", &self.engine.is_some())
            .finish()
    }
}
