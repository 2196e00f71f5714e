//! API error types
//!
//! API errors are pass-through: draw errors keep their `LUCKY_*` code and
//! message. Only request-shape problems get API-specific codes.

use std::fmt;

use crate::draw::DrawError;

/// Result type for API operations
pub type ApiResult<T> = Result<T, ApiError>;

/// API-specific error codes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApiErrorCode {
    /// Invalid request format
    LuckyInvalidRequest,
    /// Unknown operation
    LuckyUnknownOperation,
}

impl ApiErrorCode {
    /// Returns the string code
    pub fn code(&self) -> &'static str {
        match self {
            ApiErrorCode::LuckyInvalidRequest => "LUCKY_INVALID_REQUEST",
            ApiErrorCode::LuckyUnknownOperation => "LUCKY_UNKNOWN_OPERATION",
        }
    }
}

impl fmt::Display for ApiErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

/// API error with preserved draw error information
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiError {
    code: String,
    message: String,
}

impl ApiError {
    /// Create an invalid request error
    pub fn invalid_request(reason: impl Into<String>) -> Self {
        Self {
            code: ApiErrorCode::LuckyInvalidRequest.code().to_string(),
            message: reason.into(),
        }
    }

    /// Create an unknown operation error
    pub fn unknown_operation(op: impl Into<String>) -> Self {
        Self {
            code: ApiErrorCode::LuckyUnknownOperation.code().to_string(),
            message: format!("Unknown operation: {}", op.into()),
        }
    }

    /// Returns the error code string
    pub fn code(&self) -> &str {
        &self.code
    }

    /// Returns the error message
    pub fn message(&self) -> &str {
        &self.message
    }
}

impl From<DrawError> for ApiError {
    fn from(err: DrawError) -> Self {
        Self {
            code: err.code().to_string(),
            message: err.to_string(),
        }
    }
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.code, self.message)
    }
}

impl std::error::Error for ApiError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_request() {
        let err = ApiError::invalid_request("Missing count");
        assert_eq!(err.code(), "LUCKY_INVALID_REQUEST");
        assert_eq!(err.message(), "Missing count");
    }

    #[test]
    fn test_unknown_operation() {
        let err = ApiError::unknown_operation("shuffle");
        assert_eq!(err.code(), "LUCKY_UNKNOWN_OPERATION");
        assert!(err.message().contains("shuffle"));
    }

    #[test]
    fn test_draw_error_passes_through() {
        let err: ApiError = DrawError::InsufficientCandidates {
            requested: 4,
            available: 3,
        }
        .into();
        assert_eq!(err.code(), "LUCKY_INSUFFICIENT_CANDIDATES");
        assert!(err.message().contains("4"));
    }

    #[test]
    fn test_display_format() {
        let err = ApiError::invalid_request("bad");
        assert_eq!(err.to_string(), "LUCKY_INVALID_REQUEST: bad");
    }
}
