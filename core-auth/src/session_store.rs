//! # Session Store
//!
//! Holder of the single live authentication session.
//!
//! ## Overview
//!
//! The store is constructed once at process start and passed by handle to
//! every consumer; there is no global instance. It is fed from two sources:
//! the backend's live change subscription and a one-shot fetch of any
//! pre-existing session during [`SessionStore::initialize`]. UI code only
//! reads and subscribes - all mutation goes through the store itself, which
//! serializes updates and subscriber delivery through a single writer lock.
//!
//! ## Ordering
//!
//! The initial fetch and the live subscription are not coordinated against
//! each other: updates apply in the order they arrive and the last writer
//! wins. A slow initial fetch that completes after a live change event will
//! therefore overwrite the newer session with the fetched one. This mirrors
//! the observed behavior of the system this store replaces and is pinned by
//! a test below; a staleness guard would change externally visible
//! semantics.
//!
//! ## Loading flag
//!
//! `is_loading()` reports `true` until the first session value is applied -
//! from the fetch, from a live event, or from a direct `set_session` call -
//! and `false` forever after. A failed initial fetch resolves the flag too:
//! it degrades to "no session" rather than propagating an error.

use bridge_traits::backend::{AuthBackend, ChangeSubscription, Session};
use core_runtime::events::{CoreEvent, EventBus, SessionEvent};
use std::fmt;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError, Weak};
use tracing::{debug, warn};
use uuid::Uuid;

/// Unique identifier for a store subscription.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(Uuid);

impl SubscriptionId {
    fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl fmt::Display for SubscriptionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Callback invoked synchronously with the new value on every session change.
pub type SessionListener = Arc<dyn Fn(Option<&Session>) + Send + Sync>;

/// Handle for a registered session listener.
///
/// Dropping the handle leaves the listener attached; call
/// [`SessionSubscription::unsubscribe`] to detach it.
pub struct SessionSubscription {
    id: SubscriptionId,
    store: Weak<SessionStore>,
}

impl SessionSubscription {
    /// Identifier of this subscription.
    pub fn id(&self) -> SubscriptionId {
        self.id
    }

    /// Detach the listener from the store.
    pub fn unsubscribe(self) {
        if let Some(store) = self.store.upgrade() {
            let mut state = lock(&store.state);
            state.listeners.retain(|(id, _)| *id != self.id);
        }
    }
}

impl fmt::Debug for SessionSubscription {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SessionSubscription")
            .field("id", &self.id)
            .finish()
    }
}

struct StoreState {
    session: Option<Session>,
    loading: bool,
    listeners: Vec<(SubscriptionId, SessionListener)>,
    // Keeps the backend change subscription alive for the store's lifetime.
    backend_subscription: Option<ChangeSubscription>,
}

/// Store holding at most one live [`Session`].
///
/// Absence of a session is `None`, never an error.
pub struct SessionStore {
    event_bus: EventBus,
    // Serializes mutation + subscriber delivery (single-writer discipline).
    write: Mutex<()>,
    state: Mutex<StoreState>,
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

impl SessionStore {
    /// Creates an empty store in the loading state.
    pub fn new(event_bus: EventBus) -> Arc<Self> {
        Arc::new(Self {
            event_bus,
            write: Mutex::new(()),
            state: Mutex::new(StoreState {
                session: None,
                loading: true,
                listeners: Vec::new(),
                backend_subscription: None,
            }),
        })
    }

    /// The current session, if any.
    pub fn current_session(&self) -> Option<Session> {
        lock(&self.state).session.clone()
    }

    /// `true` until the first session value (or confirmed absence) arrives.
    pub fn is_loading(&self) -> bool {
        lock(&self.state).loading
    }

    /// Registers a listener invoked synchronously on every session change.
    ///
    /// Listeners are delivered in registration order. The returned handle
    /// detaches the listener via [`SessionSubscription::unsubscribe`].
    pub fn subscribe(
        self: &Arc<Self>,
        listener: impl Fn(Option<&Session>) + Send + Sync + 'static,
    ) -> SessionSubscription {
        let id = SubscriptionId::new();
        {
            let mut state = lock(&self.state);
            state.listeners.push((id, Arc::new(listener)));
        }
        SessionSubscription {
            id,
            store: Arc::downgrade(self),
        }
    }

    /// Overwrites the session (idempotently) and notifies all subscribers
    /// synchronously with the new value.
    ///
    /// Session state is mutated exclusively through the store; UI code never
    /// calls this directly.
    pub fn set_session(&self, session: Option<Session>) {
        let _write = lock(&self.write);
        self.apply(session);
    }

    /// Installs the backend change subscription and fetches any existing
    /// session.
    ///
    /// The subscription is installed first, then the one-shot fetch runs;
    /// both may deliver a value and the last writer wins (see module docs).
    /// A failed fetch is treated as "no session" so the loading flag always
    /// resolves.
    pub async fn initialize(self: &Arc<Self>, backend: Arc<dyn AuthBackend>) {
        let store = Arc::downgrade(self);
        let subscription = backend.on_session_change(Box::new(move |session| {
            if let Some(store) = store.upgrade() {
                debug!("Applying backend session change");
                store.set_session(session);
            }
        }));

        {
            let mut state = lock(&self.state);
            state.backend_subscription = Some(subscription);
        }

        match backend.get_session().await {
            Ok(session) => self.set_session(session),
            Err(error) => {
                warn!(%error, "Initial session fetch failed, treating as no session");
                self.set_session(None);
            }
        }
    }

    // Caller holds the write lock. Updates state, then notifies listeners
    // outside the state lock so a listener may re-enter read operations.
    fn apply(&self, session: Option<Session>) {
        let (listeners, snapshot) = {
            let mut state = lock(&self.state);
            state.session = session;
            state.loading = false;
            (state.listeners.clone(), state.session.clone())
        };

        let event = match &snapshot {
            Some(session) => SessionEvent::Established {
                email: session.identity.as_ref().map(|i| i.email.clone()),
                provider: session
                    .identity
                    .as_ref()
                    .map(|i| i.provider.as_str().to_string()),
            },
            None => SessionEvent::Cleared,
        };
        self.event_bus.emit(CoreEvent::Session(event)).ok();

        for (_, listener) in listeners {
            listener(snapshot.as_ref());
        }
    }
}

impl fmt::Debug for SessionStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = lock(&self.state);
        f.debug_struct("SessionStore")
            .field("has_session", &state.session.is_some())
            .field("loading", &state.loading)
            .field("listener_count", &state.listeners.len())
            .finish()
    }
}
