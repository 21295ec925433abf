use hospital_reconcile::{deep_equal, diff, strip_empty, RecordGraph};
use proptest::prelude::*;
use serde_json::{Map, Value};

fn arb_scalar() -> impl Strategy<Value = Value> {
    prop_oneof![
        Just(Value::Null),
        any::<bool>().prop_map(Value::Bool),
        (-1_000i64..1_000).prop_map(Value::from),
        "[a-z]{0,4}".prop_map(Value::String),
    ]
}

fn arb_value() -> impl Strategy<Value = Value> {
    arb_scalar().prop_recursive(4, 48, 5, |inner| {
        prop_oneof![
            prop::collection::vec(inner.clone(), 0..4).prop_map(Value::Array),
            prop::collection::btree_map("[a-d]", inner, 0..4)
                .prop_map(|map| Value::Object(map.into_iter().collect())),
        ]
    })
}

fn arb_graph() -> impl Strategy<Value = RecordGraph> {
    prop::collection::btree_map("[a-e]", arb_value(), 0..5)
        .prop_map(|map| map.into_iter().collect::<Map<String, Value>>())
}

/// Overlay `changes` onto `base` the way a PATCH endpoint merges objects.
fn merge(base: &RecordGraph, changes: &RecordGraph) -> RecordGraph {
    let mut out = base.clone();
    for (key, value) in changes {
        let merged = match (out.get(key), value) {
            (Some(Value::Object(before)), Value::Object(after)) => {
                Value::Object(merge(before, after))
            }
            _ => value.clone(),
        };
        out.insert(key.clone(), merged);
    }
    out
}

fn restrict_to_keys_of(graph: &RecordGraph, shape: &RecordGraph) -> RecordGraph {
    let mut out = RecordGraph::new();
    for (key, value) in shape {
        if let Some(current) = graph.get(key) {
            let restricted = match (current, value) {
                (Value::Object(current), Value::Object(shape)) => {
                    Value::Object(restrict_to_keys_of(current, shape))
                }
                _ => current.clone(),
            };
            out.insert(key.clone(), restricted);
        }
    }
    out
}

proptest! {
    #[test]
    fn diff_with_itself_is_empty(graph in arb_graph()) {
        prop_assert!(diff(&graph, &graph).is_empty());
    }

    #[test]
    fn diff_does_not_mutate_inputs(a in arb_graph(), b in arb_graph()) {
        let (a_before, b_before) = (a.clone(), b.clone());
        let _ = diff(&a, &b);
        prop_assert_eq!(a, a_before);
        prop_assert_eq!(b, b_before);
    }

    #[test]
    fn applying_diff_reproduces_updated_fields(a in arb_graph(), b in arb_graph()) {
        let patched = merge(&a, &diff(&a, &b));
        let view = restrict_to_keys_of(&patched, &b);
        prop_assert!(deep_equal(&Value::Object(view), &Value::Object(b)));
    }

    #[test]
    fn diff_keys_come_from_updated(a in arb_graph(), b in arb_graph()) {
        for key in diff(&a, &b).keys() {
            prop_assert!(b.contains_key(key));
        }
    }

    #[test]
    fn strip_is_idempotent(graph in arb_graph()) {
        let once = strip_empty(&graph);
        prop_assert_eq!(strip_empty(&once), once);
    }

    #[test]
    fn stripped_graph_has_no_null_or_empty_members(graph in arb_graph()) {
        for value in strip_empty(&graph).values() {
            prop_assert!(!value.is_null());
            prop_assert_ne!(value, &Value::Array(Vec::new()));
            prop_assert_ne!(value, &Value::Object(Map::new()));
        }
    }
}
