//! Success and error envelopes.
//!
//! Every API response is wrapped in one of two shapes:
//!
//! ```text
//! { "success": true,  "status": 200, "data": ... }
//! { "success": false, "status": 404, "error": { "code": "NOT_FOUND", ... } }
//! ```
//!
//! The `success` flag decides which shape applies, so a body is never both.

use serde::Serialize;
use serde_json::{Map, Value, json};

use crate::error::{AssertionFailure, AssertionResult, DomainError, DomainResult};
use crate::json::{DEFAULT_PREVIEW_LEN, MISSING, preview, preview_opt, type_name};

/// Envelope key holding the success flag.
pub const SUCCESS_KEY: &str = "success";
/// Envelope key holding the echoed HTTP status.
pub const STATUS_KEY: &str = "status";
/// Envelope key holding the success payload.
pub const DATA_KEY: &str = "data";
/// Envelope key holding the error object.
pub const ERROR_KEY: &str = "error";
/// Error object key holding the machine-readable code.
pub const CODE_KEY: &str = "code";
/// Error object key holding the human-readable message.
pub const MESSAGE_KEY: &str = "message";

/// A `success: true` envelope.
#[derive(Debug, Clone, PartialEq)]
pub struct SuccessEnvelope {
    /// Status echoed in the body.
    pub status: i64,
    /// Payload, any JSON value including null.
    pub data: Value,
}

/// A `success: false` envelope.
///
/// `status` is kept as written; [`ErrorEnvelope::status`] interprets it.
#[derive(Debug, Clone, PartialEq)]
pub struct ErrorEnvelope {
    /// Raw `status` member, `Value::Null` when absent.
    pub status: Value,
    /// The error object.
    pub error: Map<String, Value>,
}

impl ErrorEnvelope {
    /// Returns the echoed status, `None` when absent or null.
    ///
    /// # Errors
    ///
    /// Returns [`AssertionFailure::EnvelopeShapeMismatch`] when `status` is
    /// neither an integer nor null.
    pub fn status(&self) -> AssertionResult<Option<i64>> {
        match &self.status {
            Value::Null => Ok(None),
            value => value.as_i64().map(Some).ok_or_else(|| {
                AssertionFailure::shape(
                    STATUS_KEY,
                    "integer or null",
                    preview(value, DEFAULT_PREVIEW_LEN),
                )
            }),
        }
    }

    /// Returns the raw `error.code` value.
    #[must_use]
    pub fn code_value(&self) -> Option<&Value> {
        self.error.get(CODE_KEY)
    }

    /// Returns `error.code` if it is a string.
    #[must_use]
    pub fn code(&self) -> Option<&str> {
        self.code_value().and_then(Value::as_str)
    }

    /// Returns `error.message` if it is a string.
    #[must_use]
    pub fn message(&self) -> Option<&str> {
        self.error.get(MESSAGE_KEY).and_then(Value::as_str)
    }
}

/// A parsed response envelope.
#[derive(Debug, Clone, PartialEq)]
pub enum Envelope {
    /// `success: true`.
    Success(SuccessEnvelope),
    /// `success: false`.
    Error(ErrorEnvelope),
}

impl Envelope {
    /// Parses a decoded body into whichever envelope its `success` flag names.
    ///
    /// A success envelope needs an integer `status` and a `data` key (which
    /// may hold null). An error envelope needs `error` to be an object. Other
    /// keys are ignored.
    ///
    /// # Errors
    ///
    /// Returns [`AssertionFailure::EnvelopeShapeMismatch`] naming the first
    /// offending key.
    pub fn parse(body: &Value) -> AssertionResult<Self> {
        let object = as_object(body)?;
        match object.get(SUCCESS_KEY) {
            Some(Value::Bool(true)) => success_fields(object).map(Self::Success),
            Some(Value::Bool(false)) => error_fields(object).map(Self::Error),
            other => Err(AssertionFailure::shape(
                SUCCESS_KEY,
                "boolean",
                preview_opt(other, DEFAULT_PREVIEW_LEN),
            )),
        }
    }

    /// Parses a body that must be a success envelope.
    ///
    /// The `success` flag is checked before any other key.
    ///
    /// # Errors
    ///
    /// Returns [`AssertionFailure::EnvelopeShapeMismatch`] naming the first
    /// offending key.
    pub fn expect_success(body: &Value) -> AssertionResult<SuccessEnvelope> {
        let object = as_object(body)?;
        expect_flag(object, true)?;
        success_fields(object)
    }

    /// Parses a body that must be an error envelope.
    ///
    /// The `success` flag is checked before any other key. `status` is not
    /// interpreted here.
    ///
    /// # Errors
    ///
    /// Returns [`AssertionFailure::EnvelopeShapeMismatch`] naming the first
    /// offending key.
    pub fn expect_error(body: &Value) -> AssertionResult<ErrorEnvelope> {
        let object = as_object(body)?;
        expect_flag(object, false)?;
        error_fields(object)
    }
}

fn as_object(body: &Value) -> AssertionResult<&Map<String, Value>> {
    body.as_object()
        .ok_or_else(|| AssertionFailure::shape("$", "object", type_name(body)))
}

fn expect_flag(object: &Map<String, Value>, expected: bool) -> AssertionResult<()> {
    match object.get(SUCCESS_KEY) {
        Some(Value::Bool(flag)) if *flag == expected => Ok(()),
        other => Err(AssertionFailure::shape(
            SUCCESS_KEY,
            expected.to_string(),
            preview_opt(other, DEFAULT_PREVIEW_LEN),
        )),
    }
}

fn success_fields(object: &Map<String, Value>) -> AssertionResult<SuccessEnvelope> {
    let status_value = object.get(STATUS_KEY);
    let status = status_value.and_then(Value::as_i64).ok_or_else(|| {
        AssertionFailure::shape(
            STATUS_KEY,
            "integer",
            preview_opt(status_value, DEFAULT_PREVIEW_LEN),
        )
    })?;
    let data = object
        .get(DATA_KEY)
        .cloned()
        .ok_or_else(|| AssertionFailure::shape(DATA_KEY, "present", MISSING))?;

    Ok(SuccessEnvelope { status, data })
}

fn error_fields(object: &Map<String, Value>) -> AssertionResult<ErrorEnvelope> {
    let error = match object.get(ERROR_KEY) {
        Some(Value::Object(error)) => error.clone(),
        other => {
            return Err(AssertionFailure::shape(
                ERROR_KEY,
                "object",
                preview_opt(other, DEFAULT_PREVIEW_LEN),
            ));
        }
    };
    let status = object.get(STATUS_KEY).cloned().unwrap_or(Value::Null);

    Ok(ErrorEnvelope { status, error })
}

/// Builds canonical envelopes.
///
/// Used to state the expected body of a response explicitly, or to fabricate
/// responses in tests.
#[derive(Debug, Clone, Copy, Default)]
pub struct EnvelopeBuilder;

impl EnvelopeBuilder {
    /// Builds `{ "success": true, "status": status, "data": data }`.
    #[must_use]
    pub fn success(data: impl Into<Value>, status: u16) -> Value {
        json!({
            "success": true,
            "status": status,
            "data": data.into(),
        })
    }

    /// Builds a success envelope from any serializable payload.
    ///
    /// # Errors
    ///
    /// Returns [`DomainError::InvalidExpectation`] if the payload cannot be
    /// represented as JSON.
    pub fn success_from<T: Serialize + ?Sized>(data: &T, status: u16) -> DomainResult<Value> {
        let data = serde_json::to_value(data)
            .map_err(|e| DomainError::InvalidExpectation(e.to_string()))?;
        Ok(Self::success(data, status))
    }

    /// Builds `{ "success": false, "status": status, "error": { "code": code } }`,
    /// adding `error.message` when given.
    #[must_use]
    pub fn error(code: &str, status: Option<u16>, message: Option<&str>) -> Value {
        let mut error = Map::new();
        error.insert(CODE_KEY.to_string(), Value::from(code));
        if let Some(message) = message {
            error.insert(MESSAGE_KEY.to_string(), Value::from(message));
        }
        json!({
            "success": false,
            "status": status,
            "error": error,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_parse_success() {
        let body = json!({"success": true, "status": 200, "data": {"id": 1}});
        let envelope = Envelope::parse(&body).unwrap();
        assert_eq!(
            envelope,
            Envelope::Success(SuccessEnvelope {
                status: 200,
                data: json!({"id": 1}),
            })
        );
    }

    #[test]
    fn test_parse_success_with_null_data() {
        let body = json!({"success": true, "status": 204, "data": null});
        let envelope = Envelope::expect_success(&body).unwrap();
        assert_eq!(envelope.status, 204);
        assert_eq!(envelope.data, Value::Null);
    }

    #[test]
    fn test_parse_success_requires_data() {
        let body = json!({"success": true, "status": 200});
        let failure = Envelope::parse(&body).unwrap_err();
        assert_eq!(failure, AssertionFailure::shape("data", "present", MISSING));
    }

    #[test]
    fn test_parse_success_requires_integer_status() {
        let body = json!({"success": true, "status": "200", "data": []});
        let failure = Envelope::parse(&body).unwrap_err();
        assert_eq!(failure, AssertionFailure::shape("status", "integer", "\"200\""));
    }

    #[test]
    fn test_parse_requires_boolean_success() {
        let failure = Envelope::parse(&json!({"status": 200, "data": 1})).unwrap_err();
        assert_eq!(failure, AssertionFailure::shape("success", "boolean", MISSING));

        let failure = Envelope::parse(&json!({"success": "yes"})).unwrap_err();
        assert_eq!(failure, AssertionFailure::shape("success", "boolean", "\"yes\""));
    }

    #[test]
    fn test_parse_rejects_non_object_body() {
        let failure = Envelope::parse(&json!([1, 2])).unwrap_err();
        assert_eq!(failure, AssertionFailure::shape("$", "object", "array"));
    }

    #[test]
    fn test_parse_error() {
        let body = json!({
            "success": false,
            "status": 404,
            "error": {"code": "NOT_FOUND", "message": "No such user"}
        });
        let Envelope::Error(envelope) = Envelope::parse(&body).unwrap() else {
            panic!("expected an error envelope");
        };
        assert_eq!(envelope.status(), Ok(Some(404)));
        assert_eq!(envelope.code(), Some("NOT_FOUND"));
        assert_eq!(envelope.message(), Some("No such user"));
    }

    #[test]
    fn test_parse_error_with_null_status() {
        let body = json!({"success": false, "status": null, "error": {"code": "X"}});
        let envelope = Envelope::expect_error(&body).unwrap();
        assert_eq!(envelope.status(), Ok(None));

        let body = json!({"success": false, "error": {"code": "X"}});
        let envelope = Envelope::expect_error(&body).unwrap();
        assert_eq!(envelope.status, Value::Null);
        assert_eq!(envelope.status(), Ok(None));
    }

    #[test]
    fn test_error_status_is_interpreted_on_demand() {
        let body = json!({"success": false, "status": "404", "error": {"code": "X"}});
        let envelope = Envelope::expect_error(&body).unwrap();
        assert_eq!(envelope.status, json!("404"));
        assert_eq!(
            envelope.status(),
            Err(AssertionFailure::shape("status", "integer or null", "\"404\""))
        );
    }

    #[test]
    fn test_expect_success_checks_flag_first() {
        let body = json!({"success": false, "status": 200, "data": {}});
        let failure = Envelope::expect_success(&body).unwrap_err();
        assert_eq!(failure, AssertionFailure::shape("success", "true", "false"));

        let failure = Envelope::expect_success(&json!({"data": 1})).unwrap_err();
        assert_eq!(failure, AssertionFailure::shape("success", "true", MISSING));
    }

    #[test]
    fn test_expect_error_checks_flag_first() {
        let body = json!({"success": true, "status": 404});
        let failure = Envelope::expect_error(&body).unwrap_err();
        assert_eq!(failure, AssertionFailure::shape("success", "false", "true"));

        let failure = Envelope::expect_error(&json!("oops")).unwrap_err();
        assert_eq!(failure, AssertionFailure::shape("$", "object", "string"));
    }

    #[test]
    fn test_parse_error_requires_error_object() {
        let body = json!({"success": false, "status": 500, "error": "boom"});
        let failure = Envelope::parse(&body).unwrap_err();
        assert_eq!(failure, AssertionFailure::shape("error", "object", "\"boom\""));
    }

    #[test]
    fn test_builder_success() {
        assert_eq!(
            EnvelopeBuilder::success(json!({"id": 7}), 201),
            json!({"success": true, "status": 201, "data": {"id": 7}})
        );
    }

    #[test]
    fn test_builder_success_from_serializable() {
        #[derive(Serialize)]
        struct User {
            id: u32,
            name: &'static str,
        }

        let body = EnvelopeBuilder::success_from(&User { id: 1, name: "Ada" }, 200).unwrap();
        assert_eq!(
            body,
            json!({"success": true, "status": 200, "data": {"id": 1, "name": "Ada"}})
        );
    }

    #[test]
    fn test_builder_error() {
        assert_eq!(
            EnvelopeBuilder::error("NOT_FOUND", Some(404), Some("missing")),
            json!({
                "success": false,
                "status": 404,
                "error": {"code": "NOT_FOUND", "message": "missing"}
            })
        );
        assert_eq!(
            EnvelopeBuilder::error("UNKNOWN", None, None),
            json!({"success": false, "status": null, "error": {"code": "UNKNOWN"}})
        );
    }
}
