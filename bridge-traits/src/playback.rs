//! Native playback engine bridge.
//!
//! Contract for a platform-supplied media engine (fullscreen native video
//! playback). One call, one playback session: the engine takes a request,
//! plays to completion or dismissal, and reports where playback ended.
//! Engine failures are the caller's to handle - implementations must report
//! them, never swallow them.

use crate::error::EngineError;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// Request describing the media the native engine should play.
///
/// All positions are in milliseconds.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlaybackRequest {
    /// Media source URL (HLS, DASH, or progressive).
    pub url: String,
    /// Display title.
    pub title: Option<String>,
    /// Secondary display line (e.g. episode info).
    pub subtitle: Option<String>,
    /// Start offset in milliseconds.
    pub start_position_ms: u64,
}

impl PlaybackRequest {
    /// Request starting at the beginning of the stream.
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            title: None,
            subtitle: None,
            start_position_ms: 0,
        }
    }

    /// Attach a display title.
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    /// Attach a secondary display line.
    pub fn with_subtitle(mut self, subtitle: impl Into<String>) -> Self {
        self.subtitle = Some(subtitle.into());
        self
    }

    /// Set the start offset in milliseconds.
    pub fn with_start_position_ms(mut self, position_ms: u64) -> Self {
        self.start_position_ms = position_ms;
        self
    }
}

/// Where a delegated playback session ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlaybackResult {
    /// Resume position in milliseconds.
    pub position_ms: u64,
    /// Total media duration in milliseconds.
    pub duration_ms: u64,
    /// Whether playback ran to the end of the stream.
    pub completed: bool,
}

/// Adapter over a platform-supplied media engine.
///
/// Invoked only after the runtime environment confirmed the playback
/// capability; implementations may assume the native engine exists.
#[async_trait]
pub trait PlaybackEngine: Send + Sync {
    /// Play the requested media, returning once the session ends.
    ///
    /// # Errors
    ///
    /// Any engine failure (decode, network, crash) is returned as-is so the
    /// caller can surface it for fallback or retry decisions.
    async fn play(&self, request: PlaybackRequest) -> Result<PlaybackResult, EngineError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn request_defaults_to_stream_start() {
        let request = PlaybackRequest::new("https://cdn.example.com/v.m3u8");
        assert_eq!(request.start_position_ms, 0);
        assert!(request.title.is_none());
        assert!(request.subtitle.is_none());
    }

    #[test]
    fn request_builder_sets_fields() {
        let request = PlaybackRequest::new("https://cdn.example.com/v.m3u8")
            .with_title("Movie")
            .with_subtitle("Episode 2")
            .with_start_position_ms(42_000);
        assert_eq!(request.title.as_deref(), Some("Movie"));
        assert_eq!(request.subtitle.as_deref(), Some("Episode 2"));
        assert_eq!(request.start_position_ms, 42_000);
    }

    #[test]
    fn result_serialization_round_trip() {
        let result = PlaybackResult {
            position_ms: 90_000,
            duration_ms: 5_400_000,
            completed: false,
        };
        let json = serde_json::to_string(&result).unwrap();
        let back: PlaybackResult = serde_json::from_str(&json).unwrap();
        assert_eq!(result, back);
    }
}
