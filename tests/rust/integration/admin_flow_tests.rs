//! End-to-end admin flows: a football catalog, UI-shaped payloads, and the
//! composed scopes resolved against the in-memory store.

use std::sync::Arc;

use admingraph::testing::MemoryGraph;
use admingraph::{
    CatalogConfig, GraphAdapter, ModelCatalog, NodeHandle, QueryError, QueryOptions,
};
use serde_json::json;

const CATALOG: &str = r#"
name: football_admin
models:
  - label: Conference
    fields:
      - name: name
        type: string
        queryable: true
      - name: divisions
        type: string
        searchable: ["Division.name"]
    associations:
      - name: divisions
        kind: has_many
        target: Division
        foreign_key: conference_uuid
        primary_key: uuid
  - label: Division
    fields:
      - name: name
        type: string
        queryable: true
      - name: motto
        type: string
      - name: founded
        type: integer
      - name: league
        type: belongs_to
        searchable: ["Conference.name"]
    associations:
      - name: league
        kind: has_one
        target: Conference
        foreign_key: conference_uuid
        primary_key: uuid
"#;

fn catalog() -> Arc<ModelCatalog> {
    Arc::new(
        CatalogConfig::from_yaml_str(CATALOG)
            .expect("catalog parses")
            .into_catalog()
            .expect("catalog builds"),
    )
}

fn seeded() -> MemoryGraph {
    let graph = MemoryGraph::new();
    graph.insert("Conference", json!({"uuid": "afc", "name": "AFC"}));
    graph.insert("Conference", json!({"uuid": "nfc", "name": "NFC"}));
    for (uuid, name, conference, founded, motto) in [
        ("afc-east", "AFC East", "afc", 1960, "win"),
        ("afc-west", "AFC West", "afc", 1960, ""),
        ("nfc-east", "NFC East", "nfc", 1967, "go"),
        ("nfc-north", "NFC North", "nfc", 1967, "cold"),
    ] {
        graph.insert(
            "Division",
            json!({
                "uuid": uuid,
                "name": name,
                "conference_uuid": conference,
                "founded": founded,
                "motto": motto,
            }),
        );
    }
    // A division with no conference and no motto.
    graph.insert("Division", json!({"uuid": "indy", "name": "Independent"}));
    graph
}

fn divisions(graph: &MemoryGraph) -> GraphAdapter {
    GraphAdapter::new(Arc::new(graph.clone()), catalog(), "Division").expect("known model")
}

fn names(rows: &[Box<dyn NodeHandle>]) -> Vec<String> {
    rows.iter()
        .map(|row| {
            row.attribute("name")
                .and_then(|v| v.as_str().map(str::to_string))
                .unwrap_or_default()
        })
        .collect()
}

fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

#[test]
fn filtering_divisions_by_conference_name_resolves_through_the_association() {
    init_logging();
    let graph = seeded();
    let adapter = divisions(&graph);

    // `league` searches Conference.name: the AFC conference is found first,
    // then divisions are constrained by membership of their foreign key in
    // the matched conference keys.
    let options = QueryOptions::from_json(&json!({
        "filters": {"league": {"0001": {"v": "AFC", "o": "is"}}}
    }));
    let rows = adapter
        .all(&options, None)
        .expect("composes")
        .materialize()
        .expect("resolves");

    assert_eq!(names(&rows), vec!["AFC East", "AFC West"]);
}

#[test]
fn a_ui_payload_combines_search_filter_sort_and_pagination() {
    init_logging();
    let graph = seeded();
    let adapter = divisions(&graph);

    let options = QueryOptions::from_json(&json!({
        "query": "fc",
        "filters": {"founded": {"0001": {"v": ["", "1960", "1967"], "o": "between"}}},
        "sort": "name",
        "sort_reverse": "true",
        "page": 1,
        "per": 3
    }));
    let rows = adapter
        .all(&options, None)
        .expect("composes")
        .materialize()
        .expect("resolves");

    assert_eq!(names(&rows), vec!["AFC East", "AFC West", "NFC East"]);
}

#[test]
fn sorting_by_an_own_column_succeeds_and_by_a_foreign_column_errors() {
    init_logging();
    let graph = seeded();
    let adapter = divisions(&graph);

    let own = QueryOptions::from_json(&json!({"sort": "name", "sort_reverse": "true"}));
    let rows = adapter
        .all(&own, None)
        .expect("composes")
        .materialize()
        .expect("resolves");
    assert_eq!(
        names(&rows),
        vec!["AFC East", "AFC West", "Independent", "NFC East", "NFC North"]
    );

    let foreign = QueryOptions::from_json(&json!({"sort": "Conference.name"}));
    assert!(matches!(
        adapter.all(&foreign, None),
        Err(QueryError::CrossCollectionSort { .. })
    ));
}

#[test]
fn blank_filter_finds_divisions_without_a_motto() {
    init_logging();
    let graph = seeded();
    let adapter = divisions(&graph);

    let options = QueryOptions::from_json(&json!({
        "filters": {"motto": {"0001": {"v": "", "o": "_blank"}}}
    }));
    let rows = adapter
        .all(&options, None)
        .expect("composes")
        .materialize()
        .expect("resolves");

    assert_eq!(names(&rows), vec!["AFC West", "Independent"]);
}

#[test]
fn has_many_filters_find_conferences_by_their_divisions() {
    init_logging();
    let graph = seeded();
    let conferences =
        GraphAdapter::new(Arc::new(graph.clone()), catalog(), "Conference").expect("known model");

    let options = QueryOptions::from_json(&json!({
        "filters": {"divisions": {"0001": {"v": "north", "o": "ends_with"}}}
    }));
    let rows = conferences
        .all(&options, None)
        .expect("composes")
        .materialize()
        .expect("resolves");

    assert_eq!(names(&rows), vec!["NFC"]);
}

#[test]
fn count_and_first_share_the_composed_filters() {
    init_logging();
    let graph = seeded();
    let adapter = divisions(&graph);

    let options = QueryOptions::from_json(&json!({
        "query": "afc",
        "sort": "name",
        "sort_reverse": "true",
        "per": 1,
        "page": 2
    }));

    assert_eq!(adapter.count(&options, None).expect("counts"), 2);
    let first = adapter
        .first(&options, None)
        .expect("composes")
        .expect("non-empty");
    assert_eq!(first.attribute("name"), Some(json!("AFC West")));
}

#[test]
fn bulk_selection_and_destroy_remove_the_chosen_rows() {
    init_logging();
    let graph = seeded();
    let adapter = divisions(&graph);

    let options = QueryOptions::from_json(&json!({
        "bulk_ids": ["afc-east", "nfc-east"]
    }));
    let rows = adapter
        .all(&options, None)
        .expect("composes")
        .materialize()
        .expect("resolves");
    assert_eq!(rows.len(), 2);

    adapter.destroy(&rows).expect("destroys");
    assert_eq!(graph.node_count("Division"), 3);
    assert!(adapter.get(&json!("afc-east")).expect("composes").is_none());
    assert!(adapter.get(&json!("afc-west")).expect("composes").is_some());
}

#[test]
fn empty_options_round_trip_the_base_scope() {
    init_logging();
    let graph = seeded();
    let adapter = divisions(&graph);

    let unfiltered = adapter
        .all(&QueryOptions::from_json(&json!({})), None)
        .expect("composes")
        .materialize()
        .expect("resolves");
    let base = adapter.scoped().materialize().expect("resolves");

    assert_eq!(names(&unfiltered), names(&base));
}
