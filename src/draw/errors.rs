//! # Draw Errors
//!
//! Error taxonomy shared by the pool, draw, forfeit and redraw subsystems.
//!
//! Every error is reported synchronously to the caller. An operation that
//! returns an error has not mutated any state.

use thiserror::Error;

/// Result type for draw operations
pub type DrawResult<T> = Result<T, DrawError>;

/// Draw errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DrawError {
    /// Malformed or empty input
    #[error("Validation error: {0}")]
    Validation(String),

    /// Requested count exceeds the available candidates
    #[error("Cannot draw {requested} winners from {available} available candidates")]
    InsufficientCandidates { requested: usize, available: usize },

    /// Operation attempted on a winner in the wrong status
    #[error("Invalid state: {0}")]
    InvalidState(String),

    /// Unknown draw session, winner or prize
    #[error("Not found: {0}")]
    NotFound(String),

    /// Internal failure (lock poisoning, persistence)
    #[error("Internal error: {0}")]
    Internal(String),
}

impl DrawError {
    /// Validation error
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Invalid state error
    pub fn invalid_state(msg: impl Into<String>) -> Self {
        Self::InvalidState(msg.into())
    }

    /// Not found error
    pub fn not_found(msg: impl Into<String>) -> Self {
        Self::NotFound(msg.into())
    }

    /// Returns the stable error code string
    pub fn code(&self) -> &'static str {
        match self {
            DrawError::Validation(_) => "LUCKY_VALIDATION",
            DrawError::InsufficientCandidates { .. } => "LUCKY_INSUFFICIENT_CANDIDATES",
            DrawError::InvalidState(_) => "LUCKY_INVALID_STATE",
            DrawError::NotFound(_) => "LUCKY_NOT_FOUND",
            DrawError::Internal(_) => "LUCKY_INTERNAL",
        }
    }

    /// Returns the HTTP status code for this error
    pub fn status_code(&self) -> u16 {
        match self {
            DrawError::Validation(_) => 400,
            DrawError::InsufficientCandidates { .. } => 409,
            DrawError::InvalidState(_) => 409,
            DrawError::NotFound(_) => 404,
            DrawError::Internal(_) => 500,
        }
    }
}
