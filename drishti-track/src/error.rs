//! Error types for Drishti

use crate::tracker::TrackerState;

/// Result type alias
pub type Result<T> = std::result::Result<T, Error>;

/// Drishti error types
///
/// Numeric trouble inside the tracking loop (NaN/Inf samples, degenerate
/// rotations) is never reported through this type; the validity gate
/// absorbs it. These variants cover setup, control and adapter failures.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration file could not be parsed
    #[error("Config parse error: {0}")]
    Config(#[from] toml::de::Error),

    /// Configuration could not be serialized
    #[error("Config serialize error: {0}")]
    ConfigSerialize(#[from] toml::ser::Error),

    /// Invalid parameter
    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    /// Control call not allowed in the current tracker state
    #[error("Invalid tracker state: expected {expected:?}, found {actual:?}")]
    InvalidState {
        /// State the call requires
        expected: TrackerState,
        /// State the tracker was in
        actual: TrackerState,
    },

    /// Tracker thread could not be spawned
    #[error("Failed to spawn tracker thread: {0}")]
    ThreadSpawn(std::io::Error),

    /// Tracker thread panicked before it could be joined
    #[error("Tracker thread panicked")]
    ThreadPanicked,

    /// Output protocol adapter failure
    #[error("Protocol error: {0}")]
    Protocol(String),

    /// Generic error with message
    #[error("{0}")]
    Other(String),
}
