//! Runtime capability detection.
//!
//! Native bridges are present only on specific platform + shell combinations:
//! native identity sign-in ships in the Android and iOS shells, the native
//! playback engine only in the Android shell. The types here turn that matrix
//! into pure, deterministic predicates. There are no error conditions -
//! an ambiguous environment resolves to `Unavailable` rather than failing.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Platform reported by the host shell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Platform {
    Android,
    Ios,
    Web,
}

impl Platform {
    /// Identifier string as reported by host shells.
    pub fn as_str(&self) -> &'static str {
        match self {
            Platform::Android => "android",
            Platform::Ios => "ios",
            Platform::Web => "web",
        }
    }

    /// Parse a platform from a host-reported identifier.
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "android" => Some(Platform::Android),
            "ios" => Some(Platform::Ios),
            "web" => Some(Platform::Web),
            _ => None,
        }
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Native identity capability of an execution environment.
///
/// The "plugin absent" case is an explicit variant, never a null reference.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum IdentityCapability {
    /// No native identity provider in this environment.
    Unavailable,
    /// Android shell exposing the native identity provider.
    AndroidNative,
    /// iOS shell exposing the native identity provider.
    IosNative,
}

impl IdentityCapability {
    /// `true` when a native identity provider may be invoked.
    pub fn is_native(&self) -> bool {
        !matches!(self, IdentityCapability::Unavailable)
    }
}

/// Native playback capability of an execution environment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PlaybackCapability {
    /// No native playback engine in this environment.
    Unavailable,
    /// Android shell exposing the native playback engine.
    AndroidNative,
}

impl PlaybackCapability {
    /// `true` when the native playback engine may be invoked.
    pub fn is_native(&self) -> bool {
        !matches!(self, PlaybackCapability::Unavailable)
    }
}

/// Execution environment of the running client.
///
/// Constructed once by the host at startup and passed by value to every
/// component that needs capability answers. Both capability functions are
/// pure and deterministic for a given environment, so they are safe to call
/// repeatedly and at any point.
///
/// # Examples
///
/// ```
/// use bridge_traits::capability::{Platform, RuntimeEnvironment};
///
/// let env = RuntimeEnvironment::native(Platform::Android);
/// assert!(env.supports_native_identity());
/// assert!(env.supports_native_playback());
///
/// let env = RuntimeEnvironment::browser();
/// assert!(!env.supports_native_identity());
/// assert!(!env.supports_native_playback());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RuntimeEnvironment {
    /// Platform reported by the host shell.
    pub platform: Platform,
    /// Whether the client runs inside a native shell (as opposed to a plain
    /// browser tab).
    pub native_shell: bool,
}

impl RuntimeEnvironment {
    /// Environment for a native shell on the given platform.
    pub fn native(platform: Platform) -> Self {
        Self {
            platform,
            native_shell: true,
        }
    }

    /// Environment for a plain browser context.
    pub fn browser() -> Self {
        Self {
            platform: Platform::Web,
            native_shell: false,
        }
    }

    /// Native identity capability of this environment.
    pub fn identity_capability(&self) -> IdentityCapability {
        match (self.platform, self.native_shell) {
            (Platform::Android, true) => IdentityCapability::AndroidNative,
            (Platform::Ios, true) => IdentityCapability::IosNative,
            _ => IdentityCapability::Unavailable,
        }
    }

    /// Native playback capability of this environment.
    pub fn playback_capability(&self) -> PlaybackCapability {
        match (self.platform, self.native_shell) {
            (Platform::Android, true) => PlaybackCapability::AndroidNative,
            _ => PlaybackCapability::Unavailable,
        }
    }

    /// `true` when a native identity provider is usable here.
    pub fn supports_native_identity(&self) -> bool {
        self.identity_capability().is_native()
    }

    /// `true` when the native playback engine is usable here.
    pub fn supports_native_playback(&self) -> bool {
        self.playback_capability().is_native()
    }
}
