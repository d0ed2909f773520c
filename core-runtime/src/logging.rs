//! # Logging & Tracing Infrastructure
//!
//! Structured logging bootstrap built on `tracing` and
//! `tracing-subscriber`, supporting:
//! - Pretty, JSON, and compact output formats
//! - Module-level filtering via `RUST_LOG` or an explicit filter string
//!
//! ## Usage
//!
//! ```ignore
//! use core_runtime::logging::{init_logging, LogFormat, LoggingConfig};
//!
//! let config = LoggingConfig::default()
//!     .with_format(LogFormat::Pretty)
//!     .with_filter("core_auth=debug,core_playback=debug");
//!
//! init_logging(config).expect("Failed to initialize logging");
//!
//! tracing::info!("Client shell core started");
//! ```
//!
//! Sensitive values (tokens, credentials) never reach log output: the data
//! types redact them in their `Debug` implementations, so no scrubbing layer
//! is needed here.

use crate::error::{Error, Result};
use tracing_subscriber::{filter::EnvFilter, fmt};

/// Log output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    /// Human-readable pretty format with colors
    Pretty,
    /// Structured JSON format for machine parsing
    Json,
    /// Compact format for production
    Compact,
}

impl Default for LogFormat {
    fn default() -> Self {
        #[cfg(debug_assertions)]
        return Self::Pretty;

        #[cfg(not(debug_assertions))]
        return Self::Json;
    }
}

/// Logging configuration.
#[derive(Debug, Clone)]
pub struct LoggingConfig {
    /// Output format
    pub format: LogFormat,
    /// Custom filter string (e.g., "core_auth=debug,core_playback=trace").
    /// `RUST_LOG` takes precedence when set.
    pub filter: Option<String>,
    /// Display target module in logs
    pub display_target: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            format: LogFormat::default(),
            filter: None,
            display_target: true,
        }
    }
}

impl LoggingConfig {
    /// Set log format
    pub fn with_format(mut self, format: LogFormat) -> Self {
        self.format = format;
        self
    }

    /// Set a custom filter string
    pub fn with_filter(mut self, filter: impl Into<String>) -> Self {
        self.filter = Some(filter.into());
        self
    }

    /// Toggle target module display
    pub fn with_display_target(mut self, display: bool) -> Self {
        self.display_target = display;
        self
    }
}

/// Initializes the global tracing subscriber.
///
/// Call once at process start. A second call fails because the global
/// subscriber is already installed.
pub fn init_logging(config: LoggingConfig) -> Result<()> {
    let filter = match EnvFilter::try_from_default_env() {
        Ok(filter) => filter,
        Err(_) => {
            let directives = config.filter.as_deref().unwrap_or("info");
            EnvFilter::try_new(directives)
                .map_err(|e| Error::Config(format!("Invalid log filter '{}': {}", directives, e)))?
        }
    };

    let builder = fmt()
        .with_env_filter(filter)
        .with_target(config.display_target);

    let init_result = match config.format {
        LogFormat::Pretty => builder.pretty().try_init(),
        LogFormat::Json => builder.json().try_init(),
        LogFormat::Compact => builder.compact().try_init(),
    };

    init_result.map_err(|e| Error::Internal(format!("Failed to install subscriber: {}", e)))
}
