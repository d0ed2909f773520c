//! # Authentication Module
//!
//! Session state and authentication orchestration for the client shell.
//!
//! ## Overview
//!
//! Two components live here. The [`SessionStore`](session_store::SessionStore)
//! holds the single live session and notifies subscribers of every change;
//! it is fed by the backend's live change subscription and a one-shot
//! startup fetch. The [`AuthBroker`](broker::AuthBroker) exposes the
//! sign-up/sign-in/sign-out operations and picks the native or
//! browser-redirect identity flow per the runtime capability model.
//!
//! ## Design
//!
//! The broker never writes the session itself: every flow - password,
//! native token exchange, browser redirect - lands in the store through the
//! backend's change subscription. The store is therefore the single source
//! of truth for "what the app currently believes", decoupled from how
//! authentication happened.

pub mod broker;
pub mod error;
pub mod session_store;

pub use broker::AuthBroker;
pub use error::{AuthError, AuthResult, Result};
pub use session_store::{SessionStore, SessionSubscription, SubscriptionId};
