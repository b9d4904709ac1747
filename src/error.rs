//! Error types for capture, playback and argument handling.

use thiserror::Error;

/// Result type alias for macroloop operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while recording or replaying input.
#[derive(Debug, Error)]
pub enum Error {
    /// A hook is already running in this process.
    #[error("hook is already running")]
    AlreadyRunning,

    /// Tried to stop a hook that is not running.
    #[error("hook is not running")]
    NotRunning,

    /// Failed to start the input hook.
    #[error("failed to start hook: {0}")]
    HookStartFailed(String),

    /// Failed to stop the input hook.
    #[error("failed to stop hook: {0}")]
    HookStopFailed(String),

    /// Failed to inject an event during playback.
    #[error("failed to simulate event: {0}")]
    SimulateFailed(String),

    /// Thread-related error (poisoned lock, panicked worker).
    #[error("thread error: {0}")]
    ThreadError(String),

    /// A duration argument cannot be turned into a wait time.
    #[error("invalid duration {value}: must be a finite, non-negative number")]
    InvalidDuration { value: f64 },

    /// Playback speed must be finite and strictly positive.
    #[error("invalid playback speed {0}: must be greater than zero")]
    InvalidSpeed(f64),

    /// The stop key name could not be parsed.
    #[error("unknown key name: {0:?}")]
    UnknownKey(String),
}
