//! Envelope Testing - assertions for JSON API responses
//!
//! Provides [`EnvelopeAsserter`], which checks captured responses against the
//! success and error envelope shapes and returns a descriptive
//! [`AssertionFailure`] on mismatch, and the [`EnvelopeAssertions`] extension
//! trait, which turns those failures into test panics.

mod asserter;
mod assertions;
mod matcher;

pub use asserter::EnvelopeAsserter;
pub use assertions::EnvelopeAssertions;
pub use matcher::match_data;

pub use envelope_domain::{
    AsserterConfig, AssertionFailure, AssertionResult, CapturedResponse, CheckOutcome,
    CheckReport, DomainError, DomainResult, Envelope, EnvelopeBuilder, EnvelopeCheck,
    ExpectedData, JsonDifference, StatusCode,
};
