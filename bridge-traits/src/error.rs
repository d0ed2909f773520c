use thiserror::Error;

/// Failures raised by a platform-native identity provider.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum IdentityError {
    /// The user dismissed the native sign-in dialog.
    #[error("Native sign-in was cancelled")]
    Cancelled,

    /// Provider misconfiguration, network failure, or any other error the
    /// native provider reports.
    #[error("Native identity provider error: {0}")]
    Provider(String),

    /// Sign-out was requested but no native session exists. Callers treat
    /// this specific failure as non-fatal.
    #[error("No active native session")]
    NotSignedIn,
}

/// Failures raised by the backend session service.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum BackendError {
    /// Malformed credentials rejected by the backend; the message is
    /// surfaced verbatim.
    #[error("Validation failed: {0}")]
    Validation(String),

    /// Any other backend call failure (network, server, protocol).
    #[error("Backend request failed: {0}")]
    Request(String),
}

/// Failures raised by a platform-native playback engine. These propagate to
/// the caller unchanged so the UI layer can decide on fallback or retry.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EngineError {
    /// The engine could not decode the media source.
    #[error("Decode failed: {0}")]
    Decode(String),

    /// The engine could not fetch the media source.
    #[error("Network failure: {0}")]
    Network(String),

    /// The engine itself failed (crash, illegal state).
    #[error("Engine failure: {0}")]
    Engine(String),
}
