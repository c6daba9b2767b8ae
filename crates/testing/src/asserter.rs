//! Envelope asserter implementation.
//!
//! Checks captured responses against the success and error envelope shapes.

use envelope_domain::envelope::{DATA_KEY, STATUS_KEY};
use envelope_domain::json::{self, MISSING, preview};
use envelope_domain::{
    AsserterConfig, AssertionFailure, AssertionResult, CapturedResponse, CheckOutcome,
    CheckReport, Envelope, EnvelopeCheck, ErrorEnvelope, ExpectedData, StatusCode,
    SuccessEnvelope,
};
use serde_json::Value;
use tracing::{debug, warn};

use crate::matcher::match_data;

/// Asserter that validates response envelopes.
///
/// Holds only configuration; every check is a single stateless evaluation.
#[derive(Debug, Clone, Default)]
pub struct EnvelopeAsserter {
    config: AsserterConfig,
}

impl EnvelopeAsserter {
    /// Create an asserter with the default configuration.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            config: AsserterConfig::new(),
        }
    }

    /// Create an asserter with the given configuration.
    #[must_use]
    pub const fn with_config(config: AsserterConfig) -> Self {
        Self { config }
    }

    /// Returns the configuration.
    #[must_use]
    pub const fn config(&self) -> &AsserterConfig {
        &self.config
    }

    /// Checks a success envelope and, if given, a subset of its `data`.
    ///
    /// `expected_status` defaults to the configured success status.
    ///
    /// # Errors
    ///
    /// Returns the first [`AssertionFailure`] found: status code, envelope
    /// shape, then data fields.
    pub fn check_success(
        &self,
        response: &CapturedResponse,
        expected_data: Option<&ExpectedData>,
        expected_status: Option<u16>,
    ) -> AssertionResult<()> {
        let result = self
            .success_envelope(response, expected_status)
            .and_then(|envelope| match expected_data {
                Some(expected) => match_data(expected, &envelope.data, self.config.max_preview_len),
                None => Ok(()),
            });
        Self::report("success", response, result)
    }

    /// Checks a success envelope whose whole body equals `expected_body`.
    ///
    /// # Errors
    ///
    /// Returns status and shape failures as [`check_success`](Self::check_success)
    /// does, then [`AssertionFailure::BodyMismatch`] listing every difference.
    pub fn check_success_equals(
        &self,
        response: &CapturedResponse,
        expected_body: &Value,
        expected_status: Option<u16>,
    ) -> AssertionResult<()> {
        let result = self
            .success_envelope(response, expected_status)
            .and_then(|_| {
                let differences = json::diff(expected_body, response.body());
                if differences.is_empty() {
                    Ok(())
                } else {
                    Err(AssertionFailure::BodyMismatch { differences })
                }
            });
        Self::report("success_equals", response, result)
    }

    /// Checks the status code and the success envelope keys only.
    ///
    /// # Errors
    ///
    /// Returns [`AssertionFailure::StatusMismatch`] or
    /// [`AssertionFailure::EnvelopeShapeMismatch`].
    pub fn check_success_structure(
        &self,
        response: &CapturedResponse,
        expected_status: Option<u16>,
    ) -> AssertionResult<()> {
        let result = self.success_envelope(response, expected_status).map(|_| ());
        Self::report("success_structure", response, result)
    }

    /// Checks a subset of `data` without the other envelope checks.
    ///
    /// # Errors
    ///
    /// Returns [`AssertionFailure::EnvelopeShapeMismatch`] if there is no
    /// `data`, or [`AssertionFailure::DataMismatch`] on the first divergence.
    pub fn check_success_data(
        &self,
        response: &CapturedResponse,
        expected: &ExpectedData,
    ) -> AssertionResult<()> {
        let result = Self::success_data(response)
            .and_then(|data| match_data(expected, data, self.config.max_preview_len));
        Self::report("success_data", response, result)
    }

    /// Returns the `data` member of the body.
    ///
    /// # Errors
    ///
    /// Returns [`AssertionFailure::EnvelopeShapeMismatch`] if it is absent.
    pub fn success_data(response: &CapturedResponse) -> AssertionResult<&Value> {
        response
            .decoded_data()
            .ok_or_else(|| AssertionFailure::shape(DATA_KEY, "present", MISSING))
    }

    /// Checks an error envelope carrying `expected_code`.
    ///
    /// The status is only checked when `expected_status` is given, unless the
    /// configuration requires a null `status` in that case. Body keys other
    /// than `success`, `status` and `error.code` are ignored.
    ///
    /// # Errors
    ///
    /// Returns the first [`AssertionFailure`] found: status code, envelope
    /// shape, then error code.
    pub fn check_error(
        &self,
        response: &CapturedResponse,
        expected_code: &str,
        expected_status: Option<u16>,
    ) -> AssertionResult<()> {
        debug!(
            http_status = response.status(),
            error_code = expected_code,
            ?expected_status,
            "checking error envelope"
        );
        let result = self
            .error_envelope(response, expected_status)
            .and_then(|envelope| self.match_error_code(&envelope, expected_code));
        Self::report("error", response, result)
    }

    /// Run a declarative check against a response.
    ///
    /// # Errors
    ///
    /// Returns the failure of the underlying check.
    pub fn run(&self, check: &EnvelopeCheck, response: &CapturedResponse) -> AssertionResult<()> {
        match check {
            EnvelopeCheck::Success { status, data } => {
                self.check_success(response, data.as_ref(), *status)
            }
            EnvelopeCheck::SuccessEquals { status, body } => {
                self.check_success_equals(response, body, *status)
            }
            EnvelopeCheck::SuccessStructure { status } => {
                self.check_success_structure(response, *status)
            }
            EnvelopeCheck::SuccessData { data } => self.check_success_data(response, data),
            EnvelopeCheck::Error { code, status } => self.check_error(response, code, *status),
        }
    }

    /// Run every check against a response and collect the outcomes.
    #[must_use]
    pub fn run_all(&self, checks: &[EnvelopeCheck], response: &CapturedResponse) -> CheckReport {
        let outcomes = checks
            .iter()
            .map(|check| match self.run(check, response) {
                Ok(()) => CheckOutcome::pass(check.clone()),
                Err(failure) => CheckOutcome::fail(check.clone(), failure),
            })
            .collect();
        CheckReport::new(outcomes)
    }

    fn resolve_status(expected_status: u16) -> AssertionResult<StatusCode> {
        let status = StatusCode::new(expected_status);
        if status.is_valid() {
            Ok(status)
        } else {
            Err(AssertionFailure::InvalidExpectedStatus(expected_status))
        }
    }

    fn check_status_code(response: &CapturedResponse, expected: StatusCode) -> AssertionResult<()> {
        let actual = response.status_code();
        if actual == expected {
            Ok(())
        } else {
            Err(AssertionFailure::StatusMismatch { expected, actual })
        }
    }

    fn success_envelope(
        &self,
        response: &CapturedResponse,
        expected_status: Option<u16>,
    ) -> AssertionResult<SuccessEnvelope> {
        let expected =
            Self::resolve_status(expected_status.unwrap_or(self.config.default_success_status))?;
        debug!(
            http_status = response.status(),
            expected_status = expected.as_u16(),
            "checking success envelope"
        );
        Self::check_status_code(response, expected)?;

        let envelope = Envelope::expect_success(response.body())?;
        if envelope.status != i64::from(expected.as_u16()) {
            return Err(AssertionFailure::shape(
                STATUS_KEY,
                expected.as_u16().to_string(),
                envelope.status.to_string(),
            ));
        }
        Ok(envelope)
    }

    fn error_envelope(
        &self,
        response: &CapturedResponse,
        expected_status: Option<u16>,
    ) -> AssertionResult<ErrorEnvelope> {
        let expected = expected_status.map(Self::resolve_status).transpose()?;
        if let Some(expected) = expected {
            Self::check_status_code(response, expected)?;
        }

        let envelope = Envelope::expect_error(response.body())?;

        let wanted = match expected {
            Some(expected) => Some(i64::from(expected.as_u16())),
            None if self.config.require_error_status => None,
            None => return Ok(envelope),
        };
        let actual = envelope.status()?;
        if actual != wanted {
            return Err(AssertionFailure::shape(
                STATUS_KEY,
                render_status(wanted),
                render_status(actual),
            ));
        }
        Ok(envelope)
    }

    fn match_error_code(
        &self,
        envelope: &ErrorEnvelope,
        expected_code: &str,
    ) -> AssertionResult<()> {
        match envelope.code_value() {
            Some(Value::String(code)) if code == expected_code => Ok(()),
            Some(Value::String(code)) => Err(AssertionFailure::ErrorCodeMismatch {
                expected: expected_code.to_string(),
                actual: Some(code.clone()),
            }),
            other => Err(AssertionFailure::ErrorCodeMismatch {
                expected: expected_code.to_string(),
                actual: other.map(|v| preview(v, self.config.max_preview_len)),
            }),
        }
    }

    fn report<T>(
        check: &str,
        response: &CapturedResponse,
        result: AssertionResult<T>,
    ) -> AssertionResult<T> {
        match &result {
            Ok(_) => debug!(check, http_status = response.status(), "envelope check passed"),
            Err(failure) => warn!(
                check,
                http_status = response.status(),
                kind = failure.kind(),
                "envelope check failed: {failure}"
            ),
        }
        result
    }
}

fn render_status(status: Option<i64>) -> String {
    status.map_or_else(|| "null".to_string(), |s| s.to_string())
}
