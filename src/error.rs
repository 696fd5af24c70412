//! Error types for kamo
//!
//! Combinator functions that fail are programmer errors and surface as panics
//! out of `publish`. The only recoverable failures are the ones raised while
//! wiring a producer adapter or loading settings.

/// Errors raised while connecting a host producer to a stream
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AdapterError {
    /// The host object has no member with the given name
    #[error("host object has no member named `{0}`")]
    MissingMember(String),

    /// The host refused the registration
    #[error("registration rejected: {0}")]
    Rejected(String),

    /// The handler slot already holds a callback
    #[error("handler slot `{0}` is already occupied")]
    SlotOccupied(String),
}

/// Result type for producer wiring
pub type AdapterResult<T> = Result<T, AdapterError>;

/// Errors raised while loading stream settings
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Validation error: {0}")]
    Validation(String),
}

pub type ConfigResult<T> = Result<T, ConfigError>;
