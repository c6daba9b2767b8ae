//! Panicking envelope assertions for test code.
//!
//! ```
//! use envelope_testing::{CapturedResponse, EnvelopeAssertions, ExpectedData};
//! use serde_json::json;
//!
//! let response = CapturedResponse::new(
//!     200,
//!     json!({"success": true, "status": 200, "data": {"id": 1, "name": "Ada"}}),
//! );
//!
//! response
//!     .assert_success(Some(&ExpectedData::new().with("name", "Ada")))
//!     .assert_success_structure(200);
//! ```

use envelope_domain::{AssertionFailure, CapturedResponse, ExpectedData};
use serde_json::Value;

use crate::asserter::EnvelopeAsserter;

const ASSERTER: EnvelopeAsserter = EnvelopeAsserter::new();

/// Envelope assertions that fail the current test on mismatch.
///
/// Each method returns `self` so assertions can be chained.
pub trait EnvelopeAssertions {
    /// Asserts a success envelope with the default status (200), optionally
    /// containing the given `data` fields.
    fn assert_success(&self, expected_data: Option<&ExpectedData>) -> &Self;

    /// Asserts a success envelope with the given status.
    fn assert_success_with(&self, expected_data: Option<&ExpectedData>, status: u16) -> &Self;

    /// Asserts a success envelope whose whole body equals `expected_body`.
    fn assert_success_equals(&self, expected_body: &Value, status: u16) -> &Self;

    /// Asserts the status code and the success envelope keys.
    fn assert_success_structure(&self, status: u16) -> &Self;

    /// Asserts that `data` contains the given fields.
    fn assert_success_data(&self, expected: &ExpectedData) -> &Self;

    /// Asserts an error envelope with the given code, and status if given.
    fn assert_error(&self, code: &str, status: Option<u16>) -> &Self;

    /// Returns the decoded `data` member, failing if there is none.
    fn success_data(&self) -> &Value;
}

impl EnvelopeAssertions for CapturedResponse {
    #[track_caller]
    fn assert_success(&self, expected_data: Option<&ExpectedData>) -> &Self {
        if let Err(failure) = ASSERTER.check_success(self, expected_data, None) {
            fail("success", &failure);
        }
        self
    }

    #[track_caller]
    fn assert_success_with(&self, expected_data: Option<&ExpectedData>, status: u16) -> &Self {
        if let Err(failure) = ASSERTER.check_success(self, expected_data, Some(status)) {
            fail("success", &failure);
        }
        self
    }

    #[track_caller]
    fn assert_success_equals(&self, expected_body: &Value, status: u16) -> &Self {
        if let Err(failure) = ASSERTER.check_success_equals(self, expected_body, Some(status)) {
            fail("success equals", &failure);
        }
        self
    }

    #[track_caller]
    fn assert_success_structure(&self, status: u16) -> &Self {
        if let Err(failure) = ASSERTER.check_success_structure(self, Some(status)) {
            fail("success structure", &failure);
        }
        self
    }

    #[track_caller]
    fn assert_success_data(&self, expected: &ExpectedData) -> &Self {
        if let Err(failure) = ASSERTER.check_success_data(self, expected) {
            fail("success data", &failure);
        }
        self
    }

    #[track_caller]
    fn assert_error(&self, code: &str, status: Option<u16>) -> &Self {
        if let Err(failure) = ASSERTER.check_error(self, code, status) {
            fail("error", &failure);
        }
        self
    }

    #[track_caller]
    fn success_data(&self) -> &Value {
        match EnvelopeAsserter::success_data(self) {
            Ok(data) => data,
            Err(failure) => fail("success data", &failure),
        }
    }
}

#[track_caller]
#[allow(clippy::panic)]
fn fail(assertion: &str, failure: &AssertionFailure) -> ! {
    panic!("{assertion} envelope assertion failed: {failure}")
}
