//! # Host Bridge Traits
//!
//! Platform abstraction traits that must be implemented by each host shell.
//!
//! ## Overview
//!
//! This crate defines the contract between the client-shell core and the
//! platform-specific layers surrounding it. Each trait represents a capability
//! the core orchestrates but never implements itself: the backend session
//! service, the native identity provider, and the native playback engine.
//! Alongside the traits live the capability model that decides, per execution
//! environment, whether a native bridge may be used at all.
//!
//! ## Traits
//!
//! - [`AuthBackend`](backend::AuthBackend) - Backend identity/session service
//!   (password auth, token exchange, OAuth redirect, session fetch + live
//!   change subscription)
//! - [`IdentityProvider`](identity::IdentityProvider) - Platform-native
//!   sign-in provider (initialize, sign-in, sign-out)
//! - [`PlaybackEngine`](playback::PlaybackEngine) - Platform-native media
//!   engine (one playback request per delegated call)
//!
//! ## Capability gating
//!
//! Native bridges exist only on some platform/shell combinations. The
//! [`RuntimeEnvironment`](capability::RuntimeEnvironment) answers the
//! question "is this bridge usable here?" as a pure, total function -
//! ambiguous environments resolve to `Unavailable`, never to an error. The
//! core must consult the capability before touching a native bridge; the
//! service layer fails fast with a descriptive error when an environment
//! advertises a capability but no bridge implementation was injected.
//!
//! ## Error Handling
//!
//! Each bridge carries its own error type ([`IdentityError`],
//! [`BackendError`], [`EngineError`]) so that callers can distinguish, e.g.,
//! a user-cancelled native sign-in from a provider misconfiguration.
//! Unavailability of a capability is never expressed as an error - it is a
//! value decided by the capability model.
//!
//! ## Thread Safety
//!
//! All bridge traits require `Send + Sync` bounds to support safe concurrent
//! usage across async tasks. Implementations must ensure thread safety.

pub mod backend;
pub mod capability;
pub mod error;
pub mod identity;
pub mod playback;

pub use error::{BackendError, EngineError, IdentityError};

// Re-export commonly used types
pub use backend::{AuthBackend, ChangeSubscription, Identity, Session, SessionChangeListener};
pub use capability::{IdentityCapability, Platform, PlaybackCapability, RuntimeEnvironment};
pub use identity::{IdentityConfig, IdentityCredential, IdentityProvider, ProviderKind};
pub use playback::{PlaybackEngine, PlaybackRequest, PlaybackResult};
