//! # Event Bus System
//!
//! Event-driven backbone of the client-shell core, built on
//! `tokio::sync::broadcast`. The session store, auth broker, and playback
//! delegator publish typed events here; host UI layers subscribe to drive
//! screen updates without reaching into core state.
//!
//! ## Usage
//!
//! ```rust
//! use core_runtime::events::{CoreEvent, EventBus, SessionEvent};
//!
//! let event_bus = EventBus::new(100);
//! let mut subscriber = event_bus.subscribe();
//!
//! let event = CoreEvent::Session(SessionEvent::Cleared);
//! event_bus.emit(event).ok();
//! ```
//!
//! ## Error Handling
//!
//! Subscribers can observe two receive errors from the underlying broadcast
//! channel:
//!
//! - `RecvError::Lagged(n)`: the subscriber fell behind by `n` events.
//!   Non-fatal; the subscriber keeps receiving newer events.
//! - `RecvError::Closed`: all senders are gone, which signals shutdown.
//!
//! ## Thread Safety
//!
//! The event bus is `Send + Sync` and cheap to clone; every clone publishes
//! into the same channel.

use serde::{Deserialize, Serialize};
use std::fmt;
use tokio::sync::broadcast;

// Re-export commonly used types
pub use tokio::sync::broadcast::error::{RecvError, SendError};
pub use tokio::sync::broadcast::Receiver;

/// Default buffer size for the event bus channel.
///
/// Subscribers that fall behind by more than this many events receive
/// `RecvError::Lagged`.
pub const DEFAULT_EVENT_BUFFER_SIZE: usize = 100;

/// Top-level event enum encompassing all event categories.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "type", content = "payload")]
pub enum CoreEvent {
    /// Session-state events published by the session store.
    Session(SessionEvent),
    /// Auth-flow progress events published by the auth broker.
    Auth(AuthFlowEvent),
    /// Playback delegation events published by the playback delegator.
    Playback(PlaybackEvent),
}

impl CoreEvent {
    /// Human-readable description of the event.
    pub fn description(&self) -> &str {
        match self {
            CoreEvent::Session(e) => e.description(),
            CoreEvent::Auth(e) => e.description(),
            CoreEvent::Playback(e) => e.description(),
        }
    }

    /// Severity level of the event.
    pub fn severity(&self) -> EventSeverity {
        match self {
            CoreEvent::Auth(AuthFlowEvent::Failed { .. }) => EventSeverity::Error,
            CoreEvent::Playback(PlaybackEvent::Failed { .. }) => EventSeverity::Error,
            CoreEvent::Session(_) => EventSeverity::Info,
            _ => EventSeverity::Debug,
        }
    }
}

/// Event severity levels for filtering and logging.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum EventSeverity {
    /// Debug-level events (verbose)
    Debug,
    /// Informational events
    Info,
    /// Warning events
    Warning,
    /// Error events
    Error,
}

/// Session-state transitions observed by the session store.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "event")]
pub enum SessionEvent {
    /// A session was installed or replaced.
    Established {
        /// E-mail of the bound identity, when known.
        email: Option<String>,
        /// Identity provider tag, when known.
        provider: Option<String>,
    },
    /// The session was cleared; the client is unauthenticated.
    Cleared,
}

impl SessionEvent {
    fn description(&self) -> &str {
        match self {
            SessionEvent::Established { .. } => "Session established",
            SessionEvent::Cleared => "Session cleared",
        }
    }
}

/// Progress of an auth-broker operation.
///
/// These describe how an authentication attempt is going; the definitive
/// signed-in/out signal is always the session store's.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "event")]
pub enum AuthFlowEvent {
    /// An authentication flow started.
    SigningIn {
        /// Flow identifier: "password", "sign-up", "native", or "redirect".
        flow: String,
    },
    /// An authentication flow failed before a session could be established.
    Failed {
        /// Human-readable error message.
        message: String,
        /// Whether retrying the flow can succeed (e.g. after a cancel).
        recoverable: bool,
    },
}

impl AuthFlowEvent {
    fn description(&self) -> &str {
        match self {
            AuthFlowEvent::SigningIn { .. } => "Authentication in progress",
            AuthFlowEvent::Failed { .. } => "Authentication failed",
        }
    }
}

/// Playback delegation outcomes.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "event")]
pub enum PlaybackEvent {
    /// A request was handed to the native engine.
    Delegated {
        /// Media source URL.
        url: String,
        /// Display title, when provided.
        title: Option<String>,
    },
    /// The native engine returned; playback ended.
    Finished {
        /// Resume position in milliseconds.
        position_ms: u64,
        /// Total duration in milliseconds.
        duration_ms: u64,
        /// Whether playback ran to the end.
        completed: bool,
    },
    /// The native engine reported a failure.
    Failed {
        /// Human-readable error message.
        message: String,
    },
}

impl PlaybackEvent {
    fn description(&self) -> &str {
        match self {
            PlaybackEvent::Delegated { .. } => "Playback delegated to native engine",
            PlaybackEvent::Finished { .. } => "Native playback finished",
            PlaybackEvent::Failed { .. } => "Native playback failed",
        }
    }
}

/// Central event bus for publishing and subscribing to events.
///
/// Uses `tokio::sync::broadcast` internally: multiple producers (clone the
/// bus), multiple independent consumers (each `subscribe()` call), and
/// lagging detection for slow subscribers.
#[derive(Clone)]
pub struct EventBus {
    sender: broadcast::Sender<CoreEvent>,
}

impl EventBus {
    /// Creates a new event bus with the specified buffer capacity.
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity);
        Self { sender }
    }

    /// Creates a new event bus with the default buffer size.
    #[allow(clippy::should_implement_trait)]
    pub fn default() -> Self {
        Self::new(DEFAULT_EVENT_BUFFER_SIZE)
    }

    /// Publishes an event to all subscribers.
    ///
    /// Returns the number of subscribers that received the event, or an
    /// error when no subscriber is listening. Publishers treat that error as
    /// benign - events are advisory.
    pub fn emit(&self, event: CoreEvent) -> Result<usize, SendError<CoreEvent>> {
        self.sender.send(event)
    }

    /// Creates a new subscriber receiving all future events.
    ///
    /// Past events are not replayed.
    pub fn subscribe(&self) -> Receiver<CoreEvent> {
        self.sender.subscribe()
    }

    /// Number of active subscribers.
    pub fn subscriber_count(&self) -> usize {
        self.sender.receiver_count()
    }
}

impl fmt::Debug for EventBus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EventBus")
            .field("subscriber_count", &self.subscriber_count())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn event_bus_starts_without_subscribers() {
        let bus = EventBus::new(10);
        assert_eq!(bus.subscriber_count(), 0);

        // Emitting with no subscribers errors but must not panic.
        let event = CoreEvent::Session(SessionEvent::Cleared);
        assert!(bus.emit(event).is_err());
    }

    #[tokio::test]
    async fn subscribers_receive_emitted_events() {
        let bus = EventBus::new(10);
        let mut sub = bus.subscribe();

        let event = CoreEvent::Session(SessionEvent::Established {
            email: Some("a@b.com".to_string()),
            provider: Some("google".to_string()),
        });
        let delivered = bus.emit(event.clone()).unwrap();
        assert_eq!(delivered, 1);

        let received = sub.recv().await.unwrap();
        assert_eq!(received, event);
    }

    #[tokio::test]
    async fn multiple_subscribers_receive_same_event() {
        let bus = EventBus::new(10);
        let mut sub1 = bus.subscribe();
        let mut sub2 = bus.subscribe();

        let event = CoreEvent::Playback(PlaybackEvent::Delegated {
            url: "https://cdn.example.com/v.m3u8".to_string(),
            title: None,
        });
        bus.emit(event.clone()).ok();

        assert_eq!(sub1.recv().await.unwrap(), event);
        assert_eq!(sub2.recv().await.unwrap(), event);
    }

    #[tokio::test]
    async fn slow_subscriber_observes_lag() {
        let bus = EventBus::new(2);
        let mut sub = bus.subscribe();

        for _ in 0..5 {
            bus.emit(CoreEvent::Session(SessionEvent::Cleared)).ok();
        }

        assert!(matches!(sub.recv().await, Err(RecvError::Lagged(_))));
    }

    #[test]
    fn severity_classification() {
        let failed = CoreEvent::Auth(AuthFlowEvent::Failed {
            message: "nope".to_string(),
            recoverable: true,
        });
        assert_eq!(failed.severity(), EventSeverity::Error);

        let established = CoreEvent::Session(SessionEvent::Established {
            email: None,
            provider: None,
        });
        assert_eq!(established.severity(), EventSeverity::Info);

        let delegated = CoreEvent::Playback(PlaybackEvent::Delegated {
            url: "u".to_string(),
            title: None,
        });
        assert_eq!(delegated.severity(), EventSeverity::Debug);
    }

    #[test]
    fn descriptions_are_stable() {
        let event = CoreEvent::Session(SessionEvent::Cleared);
        assert_eq!(event.description(), "Session cleared");
    }

    #[test]
    fn event_serialization_round_trip() {
        let event = CoreEvent::Playback(PlaybackEvent::Finished {
            position_ms: 1_000,
            duration_ms: 2_000,
            completed: false,
        });
        let json = serde_json::to_string(&event).unwrap();
        assert!(json.contains("Finished"));
        let back: CoreEvent = serde_json::from_str(&json).unwrap();
        assert_eq!(back, event);
    }
}
