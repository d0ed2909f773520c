use thiserror::Error;

/// Runtime-level failures: bad configuration, missing host capabilities,
/// or infrastructure setup going wrong.
#[derive(Error, Debug)]
pub enum Error {
    /// A configuration value is missing or malformed.
    #[error("Configuration error: {0}")]
    Config(String),

    /// The execution environment advertises a capability but the matching
    /// bridge or setting is absent.
    #[error("Capability missing: {capability} - {message}")]
    CapabilityMissing { capability: String, message: String },

    /// Infrastructure failure that callers cannot act on (e.g. the global
    /// tracing subscriber could not be installed).
    #[error("Internal error: {0}")]
    Internal(String),
}

pub type Result<T> = std::result::Result<T, Error>;
