use thiserror::Error;

/// Main error type for session core operations
///
/// The taxonomy is deliberately small: configuration mistakes are fatal at
/// setup time, channel problems are transient and recovered by the caller
/// (a scan simply reschedules), and command failures are never surfaced
/// through this type at all — they travel in the `CommandTaskResult`
/// summary so the caller can decide its own retry policy.
#[derive(Error, Debug)]
pub enum Dnp3Error {
    /// Invalid configuration supplied at setup time (e.g. a zero scan
    /// period). Never recovered at runtime.
    #[error("configuration error: {0}")]
    Configuration(String),

    /// The underlying channel is not in a state that accepts requests.
    #[error("channel unavailable")]
    ChannelUnavailable,

    /// The session has begun shutting down; no new work is accepted.
    #[error("shutdown in progress")]
    ShutdownInProgress,

    /// An operation was attempted in a lifecycle state that does not
    /// permit it (e.g. enabling a session twice).
    #[error("invalid state: {0}")]
    InvalidState(String),

    /// Error reported by the underlying channel when submitting a request.
    #[error("channel error: {0}")]
    Channel(String),

    /// A request timed out.
    #[error("timeout")]
    Timeout,
}

/// Result type alias for session core operations
pub type Dnp3Result<T> = Result<T, Dnp3Error>;
