//! # Core Runtime Module
//!
//! Foundational runtime infrastructure for the client-shell core:
//! - Configuration management with fail-fast validation
//! - Event bus system
//! - Logging and tracing bootstrap
//!
//! ## Overview
//!
//! This crate contains the runtime utilities the auth and playback modules
//! depend on. It establishes the configuration conventions, logging setup,
//! and event broadcasting mechanism used throughout the system.

pub mod config;
pub mod error;
pub mod events;
pub mod logging;

pub use error::{Error, Result};
