//! Status-bearing error exchanged with the OAuth service.

use std::fmt;

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize};

/// An HTTP-style error carrying its status code.
///
/// This is both the shape the OAuth service answers with on non-2xx
/// responses and the error `authenticate_request` hands back to its caller.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RestError {
    /// Human-readable description
    pub message: String,
    /// HTTP status code
    pub status: u16,
    /// Short machine-readable label (e.g. "not_found")
    #[serde(default)]
    pub error: String,
    /// Underlying causes, if the producer reported any
    #[serde(default)]
    pub causes: Vec<String>,
}

impl RestError {
    pub fn new(status: u16, error: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            status,
            error: error.into(),
            causes: Vec::new(),
        }
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(StatusCode::NOT_FOUND.as_u16(), "not_found", message)
    }

    pub fn internal_server_error(message: impl Into<String>) -> Self {
        Self::new(
            StatusCode::INTERNAL_SERVER_ERROR.as_u16(),
            "internal_server_error",
            message,
        )
    }

    pub fn status_code(&self) -> u16 {
        self.status
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn causes(&self) -> &[String] {
        &self.causes
    }

    pub fn is_not_found(&self) -> bool {
        self.status == StatusCode::NOT_FOUND.as_u16()
    }
}

impl fmt::Display for RestError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.message, self.status)
    }
}

impl std::error::Error for RestError {}

impl IntoResponse for RestError {
    fn into_response(self) -> Response {
        // The service may report codes http can't represent; surface those as 500.
        let status =
            StatusCode::from_u16(self.status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        (status, Json(self)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_constructors() {
        assert_eq!(RestError::not_found("x").status_code(), 404);
        assert_eq!(RestError::internal_server_error("x").status_code(), 500);
        assert!(RestError::not_found("x").is_not_found());
        assert!(!RestError::internal_server_error("x").is_not_found());
    }

    #[test]
    fn test_display() {
        let err = RestError::internal_server_error("boom");
        assert_eq!(err.to_string(), "boom (500)");
    }

    #[test]
    fn test_deserialize_minimal_body() {
        let err: RestError = serde_json::from_str(r#"{"status":500,"message":"boom"}"#).unwrap();
        assert_eq!(err.status_code(), 500);
        assert_eq!(err.message(), "boom");
        assert!(err.error.is_empty());
        assert!(err.causes().is_empty());
    }

    #[test]
    fn test_deserialize_full_body() {
        let json = r#"{
            "message": "database unavailable",
            "status": 503,
            "error": "service_unavailable",
            "causes": ["connection refused"]
        }"#;

        let err: RestError = serde_json::from_str(json).unwrap();
        assert_eq!(err.status_code(), 503);
        assert_eq!(err.error, "service_unavailable");
        assert_eq!(err.causes(), ["connection refused".to_string()]);
    }

    #[test]
    fn test_deserialize_requires_status() {
        let result = serde_json::from_str::<RestError>(r#"{"message":"boom"}"#);
        assert!(result.is_err());
    }

    #[test]
    fn test_into_response_status() {
        let response = RestError::new(400, "bad_request", "nope").into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let response = RestError::new(42, "weird", "unknown status").into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
