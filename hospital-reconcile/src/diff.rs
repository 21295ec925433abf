use serde_json::Value;

use crate::{deep_equal, RecordGraph};

/// Compute the sparse change-set that turns `original` into `updated`.
///
/// Only keys present in `updated` can appear in the result. Nested objects
/// on both sides are compared recursively and kept only when something
/// below them changed. Arrays are compared as a whole; when they differ the
/// full `updated` array is emitted. Any other mismatch, including a key
/// missing from `original` or an object replaced by a scalar, emits the
/// `updated` value verbatim. Neither input is modified.
pub fn diff(original: &RecordGraph, updated: &RecordGraph) -> RecordGraph {
    let mut changes = RecordGraph::new();

    for (key, next) in updated {
        match (original.get(key), next) {
            (Some(Value::Object(before)), Value::Object(after)) => {
                let nested = diff(before, after);
                if !nested.is_empty() {
                    changes.insert(key.clone(), Value::Object(nested));
                }
            }
            (Some(before), after) if deep_equal(before, after) => {}
            _ => {
                changes.insert(key.clone(), next.clone());
            }
        }
    }

    changes
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn graph(value: Value) -> RecordGraph {
        match value {
            Value::Object(map) => map,
            other => panic!("expected object, got {other}"),
        }
    }

    #[test]
    fn changed_scalar_is_the_only_entry() {
        let original = graph(json!({"name": "Hosp A", "fee": 10, "tags": ["x", "y"]}));
        let updated = graph(json!({"name": "Hosp A", "fee": 12, "tags": ["x", "y"]}));
        assert_eq!(diff(&original, &updated), graph(json!({"fee": 12})));
    }

    #[test]
    fn nested_change_keeps_its_path() {
        let original = graph(json!({"addr": {"city": "Pune", "pin": "411001"}}));
        let updated = graph(json!({"addr": {"city": "Pune", "pin": "411002"}}));
        assert_eq!(
            diff(&original, &updated),
            graph(json!({"addr": {"pin": "411002"}}))
        );
    }

    #[test]
    fn deep_change_builds_sparse_nesting() {
        let original = graph(json!({"a": {"b": {"c": 1, "d": 2}, "e": 3}}));
        let updated = graph(json!({"a": {"b": {"c": 1, "d": 5}, "e": 3}}));
        assert_eq!(
            diff(&original, &updated),
            graph(json!({"a": {"b": {"d": 5}}}))
        );
    }

    #[test]
    fn null_to_value_is_a_change() {
        let original = graph(json!({"doc": null}));
        let updated = graph(json!({"doc": "path/to/file.pdf"}));
        assert_eq!(
            diff(&original, &updated),
            graph(json!({"doc": "path/to/file.pdf"}))
        );
    }

    #[test]
    fn value_to_null_is_a_change() {
        let original = graph(json!({"discount": 5}));
        let updated = graph(json!({"discount": null}));
        assert_eq!(diff(&original, &updated), graph(json!({"discount": null})));
    }

    #[test]
    fn new_key_is_included_with_full_value() {
        let original = graph(json!({}));
        let updated = graph(json!({"insurance": {"provider": "Star", "claimAmount": 0}}));
        assert_eq!(diff(&original, &updated), updated);
    }

    #[test]
    fn unchanged_nested_object_is_omitted() {
        let original = graph(json!({"addr": {"city": "Pune"}, "name": "A"}));
        let updated = graph(json!({"addr": {"city": "Pune"}, "name": "B"}));
        assert_eq!(diff(&original, &updated), graph(json!({"name": "B"})));
    }

    #[test]
    fn arrays_are_replaced_wholesale() {
        let original = graph(json!({"docs": [{"key": "a"}, {"key": "b"}]}));
        let updated = graph(json!({"docs": [{"key": "a"}, {"key": "c"}]}));
        assert_eq!(diff(&original, &updated), updated);
    }

    #[test]
    fn object_replaced_by_scalar_takes_updated_value() {
        let original = graph(json!({"addr": {"city": "Pune"}}));
        let updated = graph(json!({"addr": "Pune"}));
        assert_eq!(diff(&original, &updated), updated);

        let back = diff(&updated, &original);
        assert_eq!(back, original);
    }

    #[test]
    fn keys_only_in_original_are_ignored() {
        let original = graph(json!({"legacy": true, "name": "A"}));
        let updated = graph(json!({"name": "A"}));
        assert!(diff(&original, &updated).is_empty());
    }

    #[test]
    fn float_rounding_of_large_integer_is_a_change() {
        let original: RecordGraph = serde_json::from_str(r#"{"n": 9007199254740993}"#).unwrap();
        let updated: RecordGraph = serde_json::from_str(r#"{"n": 9007199254740992.0}"#).unwrap();
        assert_eq!(diff(&original, &updated), updated);
    }

    #[test]
    fn numeric_representation_does_not_count_as_change() {
        let original = graph(json!({"fee": 10}));
        let updated = graph(json!({"fee": 10.0}));
        assert!(diff(&original, &updated).is_empty());
    }
}
