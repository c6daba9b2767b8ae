//! Captured response type
//!
//! A materialized HTTP response: status code plus decoded JSON body, as handed
//! over by whatever test client issued the request.

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::envelope::DATA_KEY;
use crate::error::{DomainError, DomainResult};

/// HTTP status code with semantic helpers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StatusCode(pub u16);

impl StatusCode {
    /// Creates a new `StatusCode`.
    #[must_use]
    pub const fn new(code: u16) -> Self {
        Self(code)
    }

    /// Returns the numeric status code.
    #[must_use]
    pub const fn as_u16(&self) -> u16 {
        self.0
    }

    /// Returns true if the code lies in the HTTP status range (100-599).
    #[must_use]
    pub const fn is_valid(&self) -> bool {
        self.0 >= 100 && self.0 < 600
    }

    /// Returns the canonical reason phrase for common status codes.
    #[must_use]
    pub const fn reason_phrase(&self) -> &'static str {
        match self.0 {
            100 => "Continue",
            200 => "OK",
            201 => "Created",
            202 => "Accepted",
            204 => "No Content",
            301 => "Moved Permanently",
            302 => "Found",
            304 => "Not Modified",
            400 => "Bad Request",
            401 => "Unauthorized",
            403 => "Forbidden",
            404 => "Not Found",
            405 => "Method Not Allowed",
            409 => "Conflict",
            422 => "Unprocessable Entity",
            429 => "Too Many Requests",
            500 => "Internal Server Error",
            502 => "Bad Gateway",
            503 => "Service Unavailable",
            504 => "Gateway Timeout",
            _ => "Unknown",
        }
    }
}

impl fmt::Display for StatusCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.0, self.reason_phrase())
    }
}

impl From<u16> for StatusCode {
    fn from(code: u16) -> Self {
        Self(code)
    }
}

/// A response captured by a test client.
///
/// Immutable once built; every assertion borrows it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CapturedResponse {
    status: StatusCode,
    body: Value,
}

impl CapturedResponse {
    /// Creates a response from a status and an already decoded body.
    #[must_use]
    pub fn new(status: impl Into<StatusCode>, body: Value) -> Self {
        Self {
            status: status.into(),
            body,
        }
    }

    /// Decodes a JSON body string.
    ///
    /// # Errors
    ///
    /// Returns [`DomainError::InvalidJson`] if the body is not valid JSON.
    pub fn from_json_str(status: impl Into<StatusCode>, body: &str) -> DomainResult<Self> {
        let body = serde_json::from_str(body).map_err(|e| DomainError::InvalidJson(e.to_string()))?;
        Ok(Self::new(status, body))
    }

    /// Decodes a raw JSON body.
    ///
    /// # Errors
    ///
    /// Returns [`DomainError::InvalidJson`] if the bytes are not valid JSON.
    pub fn from_bytes(status: impl Into<StatusCode>, body: &[u8]) -> DomainResult<Self> {
        let body =
            serde_json::from_slice(body).map_err(|e| DomainError::InvalidJson(e.to_string()))?;
        Ok(Self::new(status, body))
    }

    /// Returns the numeric HTTP status.
    #[must_use]
    pub const fn status(&self) -> u16 {
        self.status.as_u16()
    }

    /// Returns the status as a `StatusCode`.
    #[must_use]
    pub const fn status_code(&self) -> StatusCode {
        self.status
    }

    /// Returns the decoded body.
    #[must_use]
    pub const fn body(&self) -> &Value {
        &self.body
    }

    /// Returns the `data` member of the body, if present.
    #[must_use]
    pub fn decoded_data(&self) -> Option<&Value> {
        self.body.get(DATA_KEY)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn test_status_code_validity() {
        assert!(StatusCode::new(100).is_valid());
        assert!(StatusCode::new(599).is_valid());
        assert!(!StatusCode::new(99).is_valid());
        assert!(!StatusCode::new(600).is_valid());
        assert!(!StatusCode::new(0).is_valid());
    }

    #[test]
    fn test_status_code_display() {
        assert_eq!(StatusCode::new(200).to_string(), "200 OK");
        assert_eq!(StatusCode::new(404).to_string(), "404 Not Found");
        assert_eq!(StatusCode::new(299).to_string(), "299 Unknown");
    }

    #[test]
    fn test_from_json_str() {
        let response =
            CapturedResponse::from_json_str(201, r#"{"success": true, "status": 201, "data": [1]}"#)
                .unwrap();
        assert_eq!(response.status(), 201);
        assert_eq!(response.decoded_data(), Some(&json!([1])));
    }

    #[test]
    fn test_from_json_str_rejects_invalid_body() {
        let result = CapturedResponse::from_json_str(200, "<html>");
        assert!(matches!(result, Err(DomainError::InvalidJson(_))));
    }

    #[test]
    fn test_from_bytes() {
        let response = CapturedResponse::from_bytes(404, br#"{"success": false}"#).unwrap();
        assert_eq!(response.status_code(), StatusCode::new(404));
        assert_eq!(response.decoded_data(), None);
        assert_eq!(response.body(), &json!({"success": false}));
    }
}
