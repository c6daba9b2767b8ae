//! Expected payload fields.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::DomainError;
use crate::json::type_name;

/// Fields expected inside the `data` member of a success envelope.
///
/// An object value is itself a nested expectation; any other value must be
/// matched exactly. Fields are checked in insertion order and unlisted fields
/// of the actual payload are ignored.
///
/// # Example
///
/// ```
/// use envelope_domain::ExpectedData;
/// use serde_json::json;
///
/// let expected = ExpectedData::new()
///     .with("id", 42)
///     .with("owner", json!({"name": "Ada"}));
/// assert_eq!(expected.len(), 2);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ExpectedData(Map<String, Value>);

impl ExpectedData {
    /// Creates an empty expectation.
    #[must_use]
    pub fn new() -> Self {
        Self(Map::new())
    }

    /// Adds an expected field (builder pattern).
    #[must_use]
    pub fn with(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.insert(key, value);
        self
    }

    /// Adds a nested expectation (builder pattern).
    #[must_use]
    pub fn with_nested(mut self, key: impl Into<String>, nested: Self) -> Self {
        self.0.insert(key.into(), Value::Object(nested.0));
        self
    }

    /// Adds an expected field.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<Value>) {
        self.0.insert(key.into(), value.into());
    }

    /// Iterates over the expected fields in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&String, &Value)> {
        self.0.iter()
    }

    /// Returns the underlying map.
    #[must_use]
    pub const fn as_map(&self) -> &Map<String, Value> {
        &self.0
    }

    /// Returns the number of top-level fields.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns true if nothing is expected.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl From<Map<String, Value>> for ExpectedData {
    fn from(map: Map<String, Value>) -> Self {
        Self(map)
    }
}

impl TryFrom<Value> for ExpectedData {
    type Error = DomainError;

    fn try_from(value: Value) -> Result<Self, Self::Error> {
        match value {
            Value::Object(map) => Ok(Self(map)),
            other => Err(DomainError::InvalidExpectation(format!(
                "expected data must be a JSON object, got {}",
                type_name(&other)
            ))),
        }
    }
}
