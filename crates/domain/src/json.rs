//! JSON helpers shared by the envelope checks.
//!
//! Path rendering, value previews and a structural diff over
//! [`serde_json::Value`].

use std::fmt;

use serde_json::Value;

/// Placeholder rendered when a value is absent.
pub const MISSING: &str = "<missing>";

/// Preview length used where no [`AsserterConfig`](crate::AsserterConfig) is in reach.
pub const DEFAULT_PREVIEW_LEN: usize = 120;

/// A location inside a JSON document, rendered JSONPath style (`$.data.items[0].id`).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct JsonPath {
    segments: Vec<PathSegment>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum PathSegment {
    Key(String),
    Index(usize),
}

impl JsonPath {
    /// The document root (`$`).
    #[must_use]
    pub const fn root() -> Self {
        Self {
            segments: Vec::new(),
        }
    }

    /// Returns a new path extended with an object key.
    #[must_use]
    pub fn key(&self, key: impl Into<String>) -> Self {
        let mut segments = self.segments.clone();
        segments.push(PathSegment::Key(key.into()));
        Self { segments }
    }

    /// Returns a new path extended with an array index.
    #[must_use]
    pub fn index(&self, index: usize) -> Self {
        let mut segments = self.segments.clone();
        segments.push(PathSegment::Index(index));
        Self { segments }
    }

    /// Returns true if this is the document root.
    #[must_use]
    pub fn is_root(&self) -> bool {
        self.segments.is_empty()
    }
}

impl fmt::Display for JsonPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("$")?;
        for segment in &self.segments {
            match segment {
                PathSegment::Key(key) if is_plain_key(key) => write!(f, ".{key}")?,
                PathSegment::Key(key) => write!(f, "[{}]", Value::String(key.clone()))?,
                PathSegment::Index(index) => write!(f, "[{index}]")?,
            }
        }
        Ok(())
    }
}

fn is_plain_key(key: &str) -> bool {
    !key.is_empty()
        && key
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-')
}

/// Returns the JSON type name of a value.
#[must_use]
pub const fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

/// Renders a value as compact JSON, truncated to `max_len` characters.
#[must_use]
pub fn preview(value: &Value, max_len: usize) -> String {
    let rendered = value.to_string();
    if rendered.chars().count() > max_len {
        let truncated: String = rendered.chars().take(max_len).collect();
        format!("{truncated}...")
    } else {
        rendered
    }
}

/// Renders an optional value, using [`MISSING`] when absent.
#[must_use]
pub fn preview_opt(value: Option<&Value>, max_len: usize) -> String {
    value.map_or_else(|| MISSING.to_string(), |v| preview(v, max_len))
}

/// How a value differs between the expected and the actual document.
#[derive(Debug, Clone, PartialEq)]
pub enum DifferenceKind {
    /// Present in the expected document only.
    Missing {
        /// The expected value.
        expected: Value,
    },
    /// Present in the actual document only.
    Unexpected {
        /// The value found.
        actual: Value,
    },
    /// Present in both with different values.
    Changed {
        /// The expected value.
        expected: Value,
        /// The value found.
        actual: Value,
    },
}

/// One difference found by [`diff`].
#[derive(Debug, Clone, PartialEq)]
pub struct JsonDifference {
    /// Rendered path of the differing value.
    pub path: String,
    /// What differs.
    pub kind: DifferenceKind,
}

impl fmt::Display for JsonDifference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.kind {
            DifferenceKind::Missing { expected } => write!(
                f,
                "- {}: missing, expected {}",
                self.path,
                preview(expected, DEFAULT_PREVIEW_LEN)
            ),
            DifferenceKind::Unexpected { actual } => write!(
                f,
                "+ {}: unexpected {}",
                self.path,
                preview(actual, DEFAULT_PREVIEW_LEN)
            ),
            DifferenceKind::Changed { expected, actual } => write!(
                f,
                "~ {}: expected {}, got {}",
                self.path,
                preview(expected, DEFAULT_PREVIEW_LEN),
                preview(actual, DEFAULT_PREVIEW_LEN)
            ),
        }
    }
}

/// Computes every structural difference between two documents.
///
/// Objects are compared key by key in both directions, arrays position by
/// position. Any other pair of values differs unless strictly equal.
#[must_use]
pub fn diff(expected: &Value, actual: &Value) -> Vec<JsonDifference> {
    let mut differences = Vec::new();
    diff_into(&JsonPath::root(), expected, actual, &mut differences);
    differences
}

fn diff_into(path: &JsonPath, expected: &Value, actual: &Value, out: &mut Vec<JsonDifference>) {
    match (expected, actual) {
        (Value::Object(expected_map), Value::Object(actual_map)) => {
            for (key, expected_value) in expected_map {
                let child = path.key(key.as_str());
                match actual_map.get(key) {
                    Some(actual_value) => diff_into(&child, expected_value, actual_value, out),
                    None => out.push(JsonDifference {
                        path: child.to_string(),
                        kind: DifferenceKind::Missing {
                            expected: expected_value.clone(),
                        },
                    }),
                }
            }
            for (key, actual_value) in actual_map {
                if !expected_map.contains_key(key) {
                    out.push(JsonDifference {
                        path: path.key(key.as_str()).to_string(),
                        kind: DifferenceKind::Unexpected {
                            actual: actual_value.clone(),
                        },
                    });
                }
            }
        }
        (Value::Array(expected_items), Value::Array(actual_items)) => {
            let len = expected_items.len().max(actual_items.len());
            for index in 0..len {
                let child = path.index(index);
                match (expected_items.get(index), actual_items.get(index)) {
                    (Some(e), Some(a)) => diff_into(&child, e, a, out),
                    (Some(e), None) => out.push(JsonDifference {
                        path: child.to_string(),
                        kind: DifferenceKind::Missing { expected: e.clone() },
                    }),
                    (None, Some(a)) => out.push(JsonDifference {
                        path: child.to_string(),
                        kind: DifferenceKind::Unexpected { actual: a.clone() },
                    }),
                    (None, None) => {}
                }
            }
        }
        _ if expected == actual => {}
        _ => out.push(JsonDifference {
            path: path.to_string(),
            kind: DifferenceKind::Changed {
                expected: expected.clone(),
                actual: actual.clone(),
            },
        }),
    }
}
