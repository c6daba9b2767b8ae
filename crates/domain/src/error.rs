//! Domain error types

use thiserror::Error;

use crate::json::{JsonDifference, MISSING};
use crate::response::StatusCode;

/// Errors raised while building responses, expectations or configuration.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// The response body could not be decoded as JSON.
    #[error("invalid JSON body: {0}")]
    InvalidJson(String),

    /// An expectation has an invalid shape.
    #[error("invalid expectation: {0}")]
    InvalidExpectation(String),

    /// The asserter configuration is invalid or malformed.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// A configuration file could not be read.
    #[error("I/O error: {0}")]
    Io(String),
}

/// Result type alias for domain operations.
pub type DomainResult<T> = Result<T, DomainError>;

/// Why a captured response failed an envelope assertion.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum AssertionFailure {
    /// The HTTP status code differs from the expected one.
    #[error("expected HTTP status {expected}, got {actual}")]
    StatusMismatch {
        /// Expected status.
        expected: StatusCode,
        /// Status of the captured response.
        actual: StatusCode,
    },

    /// A required envelope key is missing or has the wrong value or type.
    #[error("envelope field `{field}`: expected {expected}, got {actual}")]
    EnvelopeShapeMismatch {
        /// Envelope key, or `$` for the body itself.
        field: String,
        /// What the envelope should contain.
        expected: String,
        /// What was found.
        actual: String,
    },

    /// A field inside `data` differs from the expectation.
    #[error("data mismatch at {path}: expected {expected}, got {actual}")]
    DataMismatch {
        /// Path of the offending field.
        path: String,
        /// Expected value.
        expected: String,
        /// Value found, or `<missing>`.
        actual: String,
    },

    /// The whole body is not equal to the expected document.
    #[error(
        "body does not equal the expected envelope ({} difference(s)):{}",
        .differences.len(),
        render_differences(.differences)
    )]
    BodyMismatch {
        /// Every difference between the expected and the actual body.
        differences: Vec<JsonDifference>,
    },

    /// `error.code` differs from the expected code.
    #[error("expected error code `{expected}`, got {}", render_code(.actual.as_deref()))]
    ErrorCodeMismatch {
        /// Expected error code.
        expected: String,
        /// Code found, if any.
        actual: Option<String>,
    },

    /// The caller asked for a status that is not a valid HTTP status.
    #[error("invalid expected HTTP status: {0}")]
    InvalidExpectedStatus(u16),
}

impl AssertionFailure {
    /// Creates an [`AssertionFailure::EnvelopeShapeMismatch`].
    #[must_use]
    pub fn shape(
        field: impl Into<String>,
        expected: impl Into<String>,
        actual: impl Into<String>,
    ) -> Self {
        Self::EnvelopeShapeMismatch {
            field: field.into(),
            expected: expected.into(),
            actual: actual.into(),
        }
    }

    /// Returns a short name of the failure kind.
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::StatusMismatch { .. } => "status_mismatch",
            Self::EnvelopeShapeMismatch { .. } => "envelope_shape_mismatch",
            Self::DataMismatch { .. } => "data_mismatch",
            Self::BodyMismatch { .. } => "body_mismatch",
            Self::ErrorCodeMismatch { .. } => "error_code_mismatch",
            Self::InvalidExpectedStatus(_) => "invalid_expected_status",
        }
    }
}

fn render_differences(differences: &[JsonDifference]) -> String {
    differences.iter().map(|d| format!("\n  {d}")).collect()
}

fn render_code(actual: Option<&str>) -> String {
    actual.map_or_else(|| MISSING.to_string(), |code| format!("`{code}`"))
}

/// Result type alias for envelope checks.
pub type AssertionResult<T> = Result<T, AssertionFailure>;
