//! Declarative envelope checks.
//!
//! A check describes one envelope assertion as data, so a list of them can be
//! kept in a fixture file and run against a response in one go.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::AssertionFailure;
use crate::expectation::ExpectedData;

/// One envelope assertion.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum EnvelopeCheck {
    /// Success envelope, optionally with a subset of `data`.
    Success {
        /// Expected status; the configured default when absent.
        #[serde(default)]
        status: Option<u16>,
        /// Fields expected inside `data`.
        #[serde(default)]
        data: Option<ExpectedData>,
    },
    /// Success envelope whose whole body equals `body`.
    SuccessEquals {
        /// Expected status; the configured default when absent.
        #[serde(default)]
        status: Option<u16>,
        /// Expected body.
        body: Value,
    },
    /// Status code and success envelope keys only.
    SuccessStructure {
        /// Expected status; the configured default when absent.
        #[serde(default)]
        status: Option<u16>,
    },
    /// A subset of `data`, without the other envelope checks.
    SuccessData {
        /// Fields expected inside `data`.
        data: ExpectedData,
    },
    /// Error envelope with the given code.
    Error {
        /// Expected `error.code`.
        code: String,
        /// Expected status, checked only when present.
        #[serde(default)]
        status: Option<u16>,
    },
}

impl EnvelopeCheck {
    /// Get a human-readable description of this check.
    #[must_use]
    pub fn description(&self) -> String {
        match self {
            Self::Success { status, data } => {
                let fields = data
                    .as_ref()
                    .map_or_else(String::new, |d| format!(" with {} data field(s)", d.len()));
                format!("Success envelope{}{}", describe_status(*status), fields)
            }
            Self::SuccessEquals { status, .. } => {
                format!("Success envelope{} equals expected body", describe_status(*status))
            }
            Self::SuccessStructure { status } => {
                format!("Success envelope structure{}", describe_status(*status))
            }
            Self::SuccessData { data } => format!("Success data contains {} field(s)", data.len()),
            Self::Error { code, status } => {
                format!("Error envelope '{}'{}", code, describe_status(*status))
            }
        }
    }
}

fn describe_status(status: Option<u16>) -> String {
    status.map_or_else(String::new, |s| format!(" (status {s})"))
}

/// Result of running a single check.
#[derive(Debug, Clone, PartialEq)]
pub struct CheckOutcome {
    /// The check that was run.
    pub check: EnvelopeCheck,
    /// Why it failed, if it did.
    pub failure: Option<AssertionFailure>,
}

impl CheckOutcome {
    /// Create a passed outcome.
    #[must_use]
    pub const fn pass(check: EnvelopeCheck) -> Self {
        Self {
            check,
            failure: None,
        }
    }

    /// Create a failed outcome.
    #[must_use]
    pub const fn fail(check: EnvelopeCheck, failure: AssertionFailure) -> Self {
        Self {
            check,
            failure: Some(failure),
        }
    }

    /// Whether the check passed.
    #[must_use]
    pub const fn passed(&self) -> bool {
        self.failure.is_none()
    }
}

/// Outcomes of running a list of checks against one response.
#[derive(Debug, Clone, PartialEq)]
pub struct CheckReport {
    /// Individual outcomes, in check order.
    pub outcomes: Vec<CheckOutcome>,
    /// Total number of checks run.
    pub total: usize,
    /// Number of passed checks.
    pub passed: usize,
    /// Number of failed checks.
    pub failed: usize,
}

impl CheckReport {
    /// Create a report from outcomes.
    #[must_use]
    pub fn new(outcomes: Vec<CheckOutcome>) -> Self {
        let total = outcomes.len();
        let passed = outcomes.iter().filter(|o| o.passed()).count();

        Self {
            outcomes,
            total,
            passed,
            failed: total - passed,
        }
    }

    /// Check if all checks passed.
    #[must_use]
    pub const fn all_passed(&self) -> bool {
        self.failed == 0
    }

    /// Iterates over the failed outcomes.
    pub fn failures(&self) -> impl Iterator<Item = &CheckOutcome> {
        self.outcomes.iter().filter(|o| !o.passed())
    }
}
