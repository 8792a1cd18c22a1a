/// Unflatten Tests
///
/// Exercises `unflatten` / `unflatten_to_container`: root values, numeric
/// segment decoding, separators and prefixes, the empty-separator error, and
/// reassembly of numeric-exclusion output.
use fqk_core::{materialize, Config, Container, FqkError, Flattener, Key, Node, Value};
use serde_json::json;

fn c<const N: usize>(entries: [(Key, Value); N]) -> Value {
    Value::Container(entries.into_iter().collect())
}

fn i(n: u64) -> Key {
    Key::Index(n)
}

fn n(name: &str) -> Key {
    Key::from(name)
}

fn flat<const N: usize>(pairs: [(&str, Value); N]) -> Vec<(String, Value)> {
    pairs.into_iter().map(|(k, v)| (k.to_string(), v)).collect()
}

fn unflatten_with(entries: Vec<(String, Value)>, config: Config) -> Value {
    let container = Flattener::new(config)
        .unflatten_to_container(entries)
        .expect("unflatten failed");
    Value::Container(container)
}

fn unflatten(entries: Vec<(String, Value)>) -> Value {
    unflatten_with(entries, Config::default())
}

// ============================================================================
// Root values
// ============================================================================

#[test]
fn empty_key_becomes_first_root_element() {
    for scalar in [
        Value::null(),
        Value::from(""),
        Value::from(0),
        Value::from(3.14),
        Value::from("test"),
        Value::from(false),
    ] {
        assert_eq!(
            unflatten(flat([("", scalar.clone())])),
            c([(i(0), scalar)])
        );
    }
}

#[test]
fn key_equal_to_prefix_is_a_root_element() {
    let cases = [
        (":", Value::null(), "-", ":"),
        ("/", Value::from(""), ".", "/"),
        ("global", Value::from(0), ".", "global"),
        ("local", Value::from(3.14), ".", "local"),
        ("", Value::from("test"), "sep", ""),
        ("_", Value::from(false), ".", "_"),
    ];
    for (key, scalar, separator, prefix) in cases {
        let config = Config::default()
            .with_separator(separator)
            .with_prefix(prefix);
        assert_eq!(
            unflatten_with(flat([(key, scalar.clone())]), config),
            c([(i(0), scalar)])
        );
    }
}

#[test]
fn root_elements_skip_taken_indices() {
    let result = unflatten(flat([("0", Value::from("a")), ("", Value::from("b"))]));
    assert_eq!(result, c([(i(0), Value::from("a")), (i(1), Value::from("b"))]));
}

// ============================================================================
// Nesting
// ============================================================================

#[test]
fn empty_input_gives_empty_container() {
    assert_eq!(unflatten(Vec::new()), c([]));
}

#[test]
fn numeric_segments_become_indices() {
    assert_eq!(unflatten(flat([("0", Value::from(0))])), Value::from(json!([0])));
    assert_eq!(
        unflatten(flat([("0", Value::from(1)), ("1", Value::from(2))])),
        Value::from(json!([1, 2]))
    );
    assert_eq!(
        unflatten(flat([
            ("0", Value::from(1)),
            ("1", Value::from(2)),
            ("2.0", Value::from(3)),
            ("2.1", Value::from(4)),
        ])),
        Value::from(json!([1, 2, [3, 4]]))
    );
}

#[test]
fn non_canonical_numbers_stay_named() {
    let result = unflatten(flat([("01", Value::from(1)), ("-1", Value::from(2))]));
    assert_eq!(result, c([(n("01"), Value::from(1)), (n("-1"), Value::from(2))]));
}

#[test]
fn mixed_keys() {
    assert_eq!(
        unflatten(flat([
            ("a", Value::from(1)),
            ("0", Value::from(2)),
            ("b.0", Value::from(3)),
            ("b.c", Value::from(4)),
        ])),
        c([
            (n("a"), Value::from(1)),
            (i(0), Value::from(2)),
            (n("b"), c([(i(0), Value::from(3)), (n("c"), Value::from(4))])),
        ])
    );
}

#[test]
fn nested_scenario_reassembles() {
    assert_eq!(
        unflatten(flat([
            ("a", Value::from(1)),
            ("b", Value::from(2)),
            ("c.d.0", Value::from(3)),
            ("c.d.1", Value::from(4)),
            ("c.e.f", Value::from(5)),
            ("c.e.g", Value::from(6)),
        ])),
        Value::from(json!({
            "a": 1,
            "b": 2,
            "c": {"d": [3, 4], "e": {"f": 5, "g": 6}}
        }))
    );
}

#[test]
fn trailing_separator_yields_empty_named_segment() {
    assert_eq!(
        unflatten(flat([("a.", Value::from(1))])),
        c([(n("a"), c([(n(""), Value::from(1))]))])
    );
}

#[test]
fn accepts_a_container_as_input() {
    let flat: Container = [("x.y", Value::from(1)), ("x.z", Value::from(2))]
        .into_iter()
        .collect();
    let nested = Flattener::default().unflatten_to_container(flat).unwrap();
    assert_eq!(Value::Container(nested), Value::from(json!({"x": {"y": 1, "z": 2}})));
}

#[test]
fn accepts_str_keys() {
    let entries = vec![("a.b", Value::from(true))];
    let nested = Flattener::default().unflatten_to_container(entries).unwrap();
    assert_eq!(Value::Container(nested), Value::from(json!({"a": {"b": true}})));
}

// ============================================================================
// Separator and prefix
// ============================================================================

#[test]
fn custom_separator_and_prefix() {
    let config = Config::default()
        .with_separator("-")
        .with_prefix("global-");
    assert_eq!(
        unflatten_with(
            flat([
                ("global-0", Value::from(1)),
                ("global-1", Value::from(2)),
                ("global-2-0", Value::from(3)),
                ("global-2-1", Value::from(4)),
            ]),
            config
        ),
        Value::from(json!([1, 2, [3, 4]]))
    );

    let config = Config::default().with_separator("/").with_prefix("local/");
    assert_eq!(
        unflatten_with(
            flat([
                ("local/a", Value::from(1)),
                ("local/0", Value::from(2)),
                ("local/b/0", Value::from(3)),
                ("local/b/c", Value::from(4)),
            ]),
            config
        ),
        c([
            (n("a"), Value::from(1)),
            (i(0), Value::from(2)),
            (n("b"), c([(i(0), Value::from(3)), (n("c"), Value::from(4))])),
        ])
    );
}

#[test]
fn keys_without_the_prefix_pass_through() {
    let config = Config::default().with_prefix("ns.");
    assert_eq!(
        unflatten_with(
            flat([("ns.a", Value::from(1)), ("other.b", Value::from(2))]),
            config
        ),
        Value::from(json!({"a": 1, "other": {"b": 2}}))
    );
}

#[test]
fn empty_separator_is_rejected_before_reading_input() {
    let flattener = Flattener::new(Config::default().with_separator(""));
    let untouchable = std::iter::from_fn(|| -> Option<(String, Value)> {
        panic!("input must not be consumed")
    });
    assert!(matches!(
        flattener.unflatten(untouchable),
        Err(FqkError::EmptySeparator)
    ));
    assert!(matches!(
        flattener.unflatten_to_container(flat([(":a", Value::from(1))])),
        Err(FqkError::EmptySeparator)
    ));
}

#[test]
fn empty_separator_error_message() {
    let err = Flattener::new(Config::default().with_separator(""))
        .unflatten_to_container(Vec::<(String, Value)>::new())
        .unwrap_err();
    assert_eq!(err.to_string(), "Cannot unflatten with an empty separator");
}

// ============================================================================
// Numeric-exclusion output
// ============================================================================

#[test]
fn numeric_exclusion_output_reassembles() {
    // The flag does not change unflatten; grouped values merge with their
    // named siblings through the merger.
    let config = Config::default()
        .with_prefix("_")
        .with_numeric_not_flattened(true);
    let result = unflatten_with(
        flat([
            ("_numericOnly", Value::from(json!(["A", "B", "C", "D"]))),
            ("_mixed", Value::from(json!(["A", "B"]))),
            ("_mixed.digit", Value::from(0)),
            ("_multidimensional.digit", Value::from(1)),
            (
                "_multidimensional.chars",
                c([(i(8), Value::from("C")), (i(9), Value::from("D"))]),
            ),
            ("_multidimensional.chars.digit", Value::from(0)),
            ("_emptyArray", c([])),
        ]),
        config,
    );
    assert_eq!(
        result,
        c([
            (n("numericOnly"), Value::from(json!(["A", "B", "C", "D"]))),
            (
                n("mixed"),
                c([
                    (i(0), Value::from("A")),
                    (i(1), Value::from("B")),
                    (n("digit"), Value::from(0)),
                ])
            ),
            (
                n("multidimensional"),
                c([
                    (n("digit"), Value::from(1)),
                    (
                        n("chars"),
                        c([
                            (i(8), Value::from("C")),
                            (i(9), Value::from("D")),
                            (n("digit"), Value::from(0)),
                        ])
                    ),
                ])
            ),
            (n("emptyArray"), c([])),
        ])
    );
}

// ============================================================================
// Laziness
// ============================================================================

#[test]
fn each_entry_yields_one_chain() {
    let flattener = Flattener::default();
    let nodes: Vec<(Key, Node<'_>)> = flattener
        .unflatten(flat([("a.b", Value::from(1)), ("a.c", Value::from(2))]))
        .unwrap()
        .collect();

    // No merging yet: both chains start with key "a".
    assert_eq!(nodes.len(), 2);
    assert!(nodes.iter().all(|(key, _)| *key == n("a")));
    assert!(nodes.iter().all(|(_, node)| matches!(node, Node::Nested(_))));

    let merged = materialize(nodes);
    assert_eq!(Value::Container(merged), Value::from(json!({"a": {"b": 1, "c": 2}})));
}

#[test]
fn unflatten_pulls_input_on_demand() {
    use std::cell::Cell;

    let pulled = Cell::new(0);
    let source = (0..3).map(|k| {
        pulled.set(pulled.get() + 1);
        (format!("k{k}"), Value::from(k))
    });

    let flattener = Flattener::default();
    let mut iter = flattener.unflatten(source).unwrap();
    assert_eq!(pulled.get(), 0);
    let (key, _) = iter.next().unwrap();
    assert_eq!(key, n("k0"));
    assert_eq!(pulled.get(), 1);
}

// ============================================================================
// Numeric segments at the u64 boundary
// ============================================================================

#[test]
fn u64_max_segment_stays_a_name_at_the_root() {
    let out = unflatten(flat([
        ("18446744073709551615", Value::from(1)),
        ("", Value::from(2)),
    ]));
    assert_eq!(
        out,
        c([(n("18446744073709551615"), Value::from(1)), (i(0), Value::from(2))])
    );
}

#[test]
fn segment_past_u64_max_stays_a_name() {
    let out = unflatten(flat([("x.18446744073709551616", Value::from(1))]));
    assert_eq!(
        out,
        c([(n("x"), c([(n("18446744073709551616"), Value::from(1))]))])
    );
}

#[test]
fn largest_index_segment_then_repeat_appends_after_it() {
    let out = unflatten(flat([
        ("x.18446744073709551614", Value::from(1)),
        ("x", Value::from(2)),
    ]));
    assert_eq!(
        out,
        c([(
            n("x"),
            c([(i(u64::MAX - 1), Value::from(1)), (i(u64::MAX), Value::from(2))])
        )])
    );
}

#[test]
fn root_index_after_largest_index_saturates() {
    let out = unflatten(flat([
        ("18446744073709551614", Value::from(1)),
        ("", Value::from(2)),
    ]));
    assert_eq!(
        out,
        c([(i(u64::MAX - 1), Value::from(1)), (i(u64::MAX), Value::from(2))])
    );
}
