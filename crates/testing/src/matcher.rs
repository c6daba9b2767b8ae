//! Subset matching of `data` payloads.

use envelope_domain::json::{JsonPath, MISSING, preview};
use envelope_domain::{AssertionFailure, AssertionResult, ExpectedData};
use serde_json::{Map, Value};

/// Matches `expected` against the `data` member of a success envelope.
///
/// Stops at the first divergence and reports it as
/// [`AssertionFailure::DataMismatch`].
pub fn match_data(
    expected: &ExpectedData,
    actual: &Value,
    preview_len: usize,
) -> AssertionResult<()> {
    let path = JsonPath::root().key("data");
    match_fields(&path, expected.as_map(), actual, preview_len)
}

fn match_fields(
    path: &JsonPath,
    expected: &Map<String, Value>,
    actual: &Value,
    preview_len: usize,
) -> AssertionResult<()> {
    for (key, expected_value) in expected {
        let child = child_path(path, actual, key);
        let mismatch = |found: String| AssertionFailure::DataMismatch {
            path: child.to_string(),
            expected: preview(expected_value, preview_len),
            actual: found,
        };

        let Some(actual_value) = lookup(actual, key) else {
            return Err(mismatch(MISSING.to_string()));
        };

        match expected_value {
            Value::Object(nested) => {
                if !(actual_value.is_object() || actual_value.is_array()) {
                    return Err(mismatch(preview(actual_value, preview_len)));
                }
                match_fields(&child, nested, actual_value, preview_len)?;
            }
            _ if actual_value == expected_value => {}
            _ => return Err(mismatch(preview(actual_value, preview_len))),
        }
    }
    Ok(())
}

/// Resolves `key` in an object, or as a decimal index in an array.
fn lookup<'a>(container: &'a Value, key: &str) -> Option<&'a Value> {
    match container {
        Value::Object(map) => map.get(key),
        Value::Array(items) => key.parse::<usize>().ok().and_then(|i| items.get(i)),
        _ => None,
    }
}

fn child_path(path: &JsonPath, container: &Value, key: &str) -> JsonPath {
    match (container, key.parse::<usize>()) {
        (Value::Array(_), Ok(index)) => path.index(index),
        _ => path.key(key),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn expected(value: Value) -> ExpectedData {
        ExpectedData::try_from(value).unwrap()
    }

    #[test]
    fn test_subset_ignores_extra_keys() {
        let result = match_data(&expected(json!({"a": 1})), &json!({"a": 1, "b": 2}), 120);
        assert!(result.is_ok());
    }

    #[test]
    fn test_scalar_mismatch() {
        let failure = match_data(&expected(json!({"a": 1})), &json!({"a": 2, "b": 2}), 120)
            .unwrap_err();
        assert_eq!(
            failure,
            AssertionFailure::DataMismatch {
                path: "$.data.a".to_string(),
                expected: "1".to_string(),
                actual: "2".to_string(),
            }
        );
    }

    #[test]
    fn test_nested_match() {
        let spec = expected(json!({"a": {"b": 1}}));
        assert!(match_data(&spec, &json!({"a": {"b": 1, "c": 3}}), 120).is_ok());

        let failure = match_data(&spec, &json!({"a": {"b": 2}}), 120).unwrap_err();
        assert_eq!(
            failure,
            AssertionFailure::DataMismatch {
                path: "$.data.a.b".to_string(),
                expected: "1".to_string(),
                actual: "2".to_string(),
            }
        );
    }

    #[test]
    fn test_missing_key() {
        let spec = expected(json!({"user": {"email": "a@b.c"}}));
        let failure = match_data(&spec, &json!({"user": {}}), 120).unwrap_err();
        assert_eq!(
            failure,
            AssertionFailure::DataMismatch {
                path: "$.data.user.email".to_string(),
                expected: "\"a@b.c\"".to_string(),
                actual: MISSING.to_string(),
            }
        );
    }

    #[test]
    fn test_nested_expectation_against_scalar() {
        let failure = match_data(&expected(json!({"a": {"b": 1}})), &json!({"a": 5}), 120)
            .unwrap_err();
        assert_eq!(
            failure,
            AssertionFailure::DataMismatch {
                path: "$.data.a".to_string(),
                expected: "{\"b\":1}".to_string(),
                actual: "5".to_string(),
            }
        );
    }

    #[test]
    fn test_arrays_compare_whole() {
        let spec = expected(json!({"tags": ["x", "y"]}));
        assert!(match_data(&spec, &json!({"tags": ["x", "y"]}), 120).is_ok());
        assert!(match_data(&spec, &json!({"tags": ["x", "y", "z"]}), 120).is_err());
    }

    #[test]
    fn test_nested_expectation_indexes_arrays() {
        let spec = expected(json!({"items": {"1": {"id": 2}}}));
        let actual = json!({"items": [{"id": 1}, {"id": 2, "name": "second"}]});
        assert!(match_data(&spec, &actual, 120).is_ok());

        let actual = json!({"items": [{"id": 1}, {"id": 3}]});
        let failure = match_data(&spec, &actual, 120).unwrap_err();
        assert!(matches!(
            failure,
            AssertionFailure::DataMismatch { ref path, .. } if path == "$.data.items[1].id"
        ));
    }

    #[test]
    fn test_reports_first_divergence_in_order() {
        let spec = ExpectedData::new().with("second", 2).with("first", 1);
        let failure = match_data(&spec, &json!({"first": 0, "second": 0}), 120).unwrap_err();
        assert!(matches!(
            failure,
            AssertionFailure::DataMismatch { ref path, .. } if path == "$.data.second"
        ));
    }

    #[test]
    fn test_expectation_against_null_or_scalar_data() {
        let spec = ExpectedData::new().with("a", 1);
        for data in [json!(null), json!(5), json!("text"), json!(true)] {
            let failure = match_data(&spec, &data, 120).unwrap_err();
            assert_eq!(
                failure,
                AssertionFailure::DataMismatch {
                    path: "$.data.a".to_string(),
                    expected: "1".to_string(),
                    actual: MISSING.to_string(),
                },
                "data {data}"
            );
        }
    }

    #[test]
    fn test_empty_expectation_matches_anything() {
        assert!(match_data(&ExpectedData::new(), &json!(null), 120).is_ok());
    }

    #[test]
    fn test_preview_is_truncated() {
        let long = "x".repeat(50);
        let failure = match_data(&expected(json!({"a": "short"})), &json!({"a": long}), 10)
            .unwrap_err();
        assert!(matches!(
            failure,
            AssertionFailure::DataMismatch { ref actual, .. } if actual == "\"xxxxxxxxx..."
        ));
    }
}
