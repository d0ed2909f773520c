//! # Playback Module
//!
//! Delegation of video playback to a platform-native media engine.
//!
//! ## Overview
//!
//! The [`PlaybackDelegator`](delegator::PlaybackDelegator) is the single
//! entry point for playing media. When the runtime environment exposes a
//! native playback engine, requests are handed to it and the engine's
//! result - or failure - flows back to the caller untouched. When no engine
//! exists, the delegator answers with the explicit
//! [`Delegation::Unavailable`](delegator::Delegation::Unavailable) sentinel
//! so the UI can fall back to an embedded player; unavailability is a
//! value, never an error.

pub mod delegator;

pub use bridge_traits::error::EngineError;
pub use bridge_traits::playback::{PlaybackEngine, PlaybackRequest, PlaybackResult};
pub use delegator::{Delegation, PlaybackDelegator};
