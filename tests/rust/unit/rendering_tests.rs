//! Rendering invariants: parameter binding, determinism, and the shape of
//! the generated statements.

use admingraph::scope::{NodeQuery, SortDirection};
use admingraph::statement::{CompareOp, Fragment, ParamBinder, PARAM_PREFIX};
use serde_json::json;

#[test]
fn every_value_slot_becomes_a_named_parameter() {
    let mut query = NodeQuery::new("Division");
    query.predicates.push(Fragment::Any(vec![
        Fragment::eq("name", json!("east")),
        Fragment::All(vec![
            Fragment::Compare {
                column: "rank".into(),
                op: CompareOp::Gte,
                value: json!(1),
            },
            Fragment::Compare {
                column: "rank".into(),
                op: CompareOp::Lte,
                value: json!(10),
            },
        ]),
    ]));
    query.predicates.push(Fragment::In {
        column: "uuid".into(),
        values: vec![json!("a"), json!("b")],
    });

    let rendered = query.to_cypher();
    assert_eq!(rendered.params.len(), 4);
    for i in 0..4 {
        assert!(
            rendered.statement.contains(&format!("${PARAM_PREFIX}{i}")),
            "missing placeholder {i} in {}",
            rendered.statement
        );
    }
    for needle in ["east", "\"a\"", "'a'"] {
        assert!(
            !rendered.statement.contains(needle),
            "value `{needle}` leaked into {}",
            rendered.statement
        );
    }
}

#[test]
fn placeholder_count_equals_bound_value_count() {
    let fragment = Fragment::Any(vec![
        Fragment::Matches {
            column: "name".into(),
            pattern: ".*east.*".into(),
        },
        Fragment::IsNull {
            column: "motto".into(),
            negated: false,
        },
        Fragment::eq("rank", json!(3)),
    ]);

    let mut binder = ParamBinder::new();
    let text = fragment.to_cypher("n", &mut binder);

    assert_eq!(fragment.param_count(), binder.len());
    assert_eq!(text.matches(&format!("${PARAM_PREFIX}")).count(), binder.len());
}

#[test]
fn rendering_twice_yields_identical_statements_and_bindings() {
    let mut query = NodeQuery::new("League");
    query.predicates.push(Fragment::eq("name", json!("Premier")));
    query.order = Some(("name".to_string(), SortDirection::Asc));
    query.skip = Some(10);
    query.limit = Some(5);

    assert_eq!(query.to_cypher(), query.to_cypher());
}

#[test]
fn the_full_clause_order_is_match_where_return_order_skip_limit() {
    let mut query = NodeQuery::new("Division");
    query.predicates.push(Fragment::eq("name", json!("east")));
    query.order = Some(("name".to_string(), SortDirection::Desc));
    query.skip = Some(10);
    query.limit = Some(10);

    assert_eq!(
        query.to_cypher().statement,
        "MATCH (n:`Division`) WHERE (n.name = $query_param_0) \
         RETURN n ORDER BY n.name DESC SKIP 10 LIMIT 10"
    );
}

#[test]
fn the_count_form_drops_order_and_slice_but_keeps_predicates() {
    let mut query = NodeQuery::new("Division");
    query.predicates.push(Fragment::eq("name", json!("east")));
    query.order = Some(("name".to_string(), SortDirection::Desc));
    query.limit = Some(10);

    let rendered = query.to_cypher_count();
    assert_eq!(
        rendered.statement,
        "MATCH (n:`Division`) WHERE (n.name = $query_param_0) RETURN count(n) AS count"
    );
    assert_eq!(rendered.params["query_param_0"], json!("east"));
}
