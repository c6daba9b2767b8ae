//! Envelope Domain - Core assertion types
//!
//! This crate defines the model for asserting JSON API response envelopes:
//! captured responses, the success/error envelope shapes, expected payloads
//! and the failure taxonomy. All types here are pure Rust with no I/O
//! dependencies beyond reading a configuration file.

pub mod config;
pub mod envelope;
pub mod error;
pub mod expectation;
pub mod json;
pub mod response;
pub mod testing;

pub use config::AsserterConfig;
pub use envelope::{Envelope, EnvelopeBuilder, ErrorEnvelope, SuccessEnvelope};
pub use error::{AssertionFailure, AssertionResult, DomainError, DomainResult};
pub use expectation::ExpectedData;
pub use json::{DifferenceKind, JsonDifference, JsonPath};
pub use response::{CapturedResponse, StatusCode};
pub use testing::{CheckOutcome, CheckReport, EnvelopeCheck};
