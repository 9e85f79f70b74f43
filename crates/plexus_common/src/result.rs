//! Common result and error types for the elaboration engine.

/// The standard result type for fallible internal operations.
///
/// `Ok` contains the result value (which may be partial or degraded after
/// error recovery). `Err` indicates an unrecoverable internal error (a bug
/// in the engine), not a user-facing error. User errors are reported through
/// the diagnostics sink and the operation still returns `Ok`.
pub type PlexusResult<T> = Result<T, InternalError>;

/// An internal invariant violation: a bug in the engine, not a design error.
///
/// Seeing one of these means an elaboration pass broke its own contract,
/// for example a declaration statement surviving scope classification.
#[derive(Debug, thiserror::Error)]
#[error("internal elaboration error: {message}")]
pub struct InternalError {
    /// Description of the internal error.
    pub message: String,
}

impl InternalError {
    /// Creates a new internal error with the given message.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

impl From<String> for InternalError {
    fn from(message: String) -> Self {
        Self { message }
    }
}
