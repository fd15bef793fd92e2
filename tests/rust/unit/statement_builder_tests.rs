//! Behavior of the per-type statement builder, checked against stored values
//! through the in-memory store.

use admingraph::metadata::FieldType;
use admingraph::scope::{GraphStore, NodeQuery};
use admingraph::statement::{build_statement, FilterOperator, Fragment};
use admingraph::testing::MemoryGraph;
use serde_json::{json, Value};
use test_case::test_case;

/// Names of the Division rows matching `fragment` in `graph`.
fn matching(graph: &MemoryGraph, fragment: Fragment) -> Vec<String> {
    let mut query = NodeQuery::new("Division");
    query.predicates.push(fragment);
    graph
        .fetch(&query)
        .expect("in-memory fetch")
        .iter()
        .map(|row| {
            row.attribute("name")
                .and_then(|v| v.as_str().map(str::to_string))
                .unwrap_or_default()
        })
        .collect()
}

fn build(field_type: FieldType, value: Value, operator: &str) -> Option<Fragment> {
    build_statement("flag", field_type, &value, FilterOperator::parse(operator))
}

#[test_case("false")]
#[test_case("f")]
#[test_case("0")]
fn boolean_false_matches_null_and_literal_false(raw: &str) {
    let graph = MemoryGraph::new();
    graph.insert("Division", json!({"name": "explicit-false", "flag": false}));
    graph.insert("Division", json!({"name": "null-flag", "flag": null}));
    graph.insert("Division", json!({"name": "no-flag"}));
    graph.insert("Division", json!({"name": "true-flag", "flag": true}));

    let fragment = build(FieldType::Boolean, json!(raw), "default").expect("constraint");
    assert_eq!(
        matching(&graph, fragment),
        vec!["explicit-false", "null-flag", "no-flag"]
    );
}

#[test_case("true")]
#[test_case("t")]
#[test_case("1")]
fn boolean_true_matches_only_literal_true(raw: &str) {
    let graph = MemoryGraph::new();
    graph.insert("Division", json!({"name": "explicit-false", "flag": false}));
    graph.insert("Division", json!({"name": "no-flag"}));
    graph.insert("Division", json!({"name": "true-flag", "flag": true}));

    let fragment = build(FieldType::Boolean, json!(raw), "default").expect("constraint");
    assert_eq!(matching(&graph, fragment), vec!["true-flag"]);
}

#[test]
fn inverted_range_is_well_formed_and_matches_nothing() {
    let graph = MemoryGraph::new();
    for rank in 1..=5 {
        graph.insert("Division", json!({"name": format!("d{rank}"), "flag": rank}));
    }

    let fragment =
        build(FieldType::Integer, json!(["", "4", "2"]), "between").expect("still a constraint");
    assert_eq!(fragment.param_count(), 2);
    assert!(matching(&graph, fragment).is_empty());
}

#[test]
fn starts_with_is_case_insensitive_and_anchored() {
    let graph = MemoryGraph::new();
    graph.insert("Division", json!({"name": "prefix", "flag": "Football East"}));
    graph.insert("Division", json!({"name": "lowercase", "flag": "football west"}));
    graph.insert("Division", json!({"name": "infix", "flag": "pro football"}));

    let fragment =
        build(FieldType::String, json!("Foo"), "starts_with").expect("constraint");
    assert_eq!(matching(&graph, fragment), vec!["prefix", "lowercase"]);
}

#[test]
fn blank_matches_null_and_empty_string_only() {
    let graph = MemoryGraph::new();
    graph.insert("Division", json!({"name": "null-flag", "flag": null}));
    graph.insert("Division", json!({"name": "empty-flag", "flag": ""}));
    graph.insert("Division", json!({"name": "no-flag"}));
    graph.insert("Division", json!({"name": "filled", "flag": "x"}));

    let fragment = build(FieldType::String, json!("anything"), "_blank").expect("constraint");
    assert_eq!(
        matching(&graph, fragment),
        vec!["null-flag", "empty-flag", "no-flag"]
    );
}

#[test]
fn regex_metacharacters_in_values_match_literally() {
    let graph = MemoryGraph::new();
    graph.insert("Division", json!({"name": "literal", "flag": "100% done"}));
    graph.insert("Division", json!({"name": "decoy", "flag": "100x done"}));

    let fragment = build(FieldType::String, json!("100%"), "default").expect("constraint");
    assert_eq!(matching(&graph, fragment), vec!["literal"]);
}

#[test_case(FieldType::Boolean, json!("maybe"))]
#[test_case(FieldType::Integer, json!("ten"))]
#[test_case(FieldType::String, json!(""))]
#[test_case(FieldType::Enum, json!([]))]
#[test_case(FieldType::BelongsTo, json!("042"))]
#[test_case(FieldType::Date, json!("2024-01-01"))]
fn uninterpretable_input_yields_no_constraint(field_type: FieldType, value: Value) {
    assert_eq!(build(field_type, value, "default"), None);
}

#[test]
fn discard_yields_no_constraint() {
    assert_eq!(build(FieldType::String, json!("kept text"), "_discard"), None);
    assert_eq!(build(FieldType::String, json!("_discard"), "default"), None);
}

#[test]
fn unknown_operators_yield_no_constraint() {
    assert_eq!(
        build_statement("flag", FieldType::String, &json!("x"), None),
        None
    );
}
