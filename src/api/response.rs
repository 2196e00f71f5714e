//! API response types
//!
//! JSON response envelopes: `{"status":"ok","data":...}` on success,
//! `{"status":"error","code":...,"message":...}` on failure.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::errors::{ApiError, ApiResult};

/// Success envelope
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SuccessResponse {
    pub status: String,
    pub data: Value,
}

/// Error envelope
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub status: String,
    pub code: String,
    pub message: String,
}

impl From<&ApiError> for ErrorResponse {
    fn from(err: &ApiError) -> Self {
        Self {
            status: "error".to_string(),
            code: err.code().to_string(),
            message: err.message().to_string(),
        }
    }
}

/// One response line
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Response {
    Success(SuccessResponse),
    Error(ErrorResponse),
}

impl Response {
    pub fn success(data: Value) -> Self {
        Response::Success(SuccessResponse {
            status: "ok".to_string(),
            data,
        })
    }

    pub fn error(err: &ApiError) -> Self {
        Response::Error(ErrorResponse::from(err))
    }

    /// Envelope for a handler outcome
    pub fn from_result(result: ApiResult<Value>) -> Self {
        match result {
            Ok(data) => Self::success(data),
            Err(e) => Self::error(&e),
        }
    }

    /// Convert to a single-line JSON string
    pub fn to_json(&self) -> String {
        serde_json::to_string(self).expect("Response serialization cannot fail")
    }

    pub fn is_success(&self) -> bool {
        matches!(self, Response::Success(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::draw::DrawError;
    use serde_json::json;

    #[test]
    fn test_success_envelope() {
        let json = Response::success(json!({"available": 2})).to_json();
        assert_eq!(json, r#"{"status":"ok","data":{"available":2}}"#);
    }

    #[test]
    fn test_error_envelope() {
        let err = ApiError::from(DrawError::not_found("Draw 42"));
        let value: Value = serde_json::from_str(&Response::error(&err).to_json()).unwrap();
        assert_eq!(value["status"], "error");
        assert_eq!(value["code"], "LUCKY_NOT_FOUND");
        assert_eq!(value["message"], "Not found: Draw 42");
    }

    #[test]
    fn test_from_result() {
        assert!(Response::from_result(Ok(Value::Null)).is_success());
        let err = ApiError::invalid_request("bad");
        assert!(!Response::from_result(Err(err)).is_success());
    }
}
