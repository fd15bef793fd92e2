//! Shared fixtures for adapter tests: a small sports catalog and a seeded
//! in-memory graph.


use std::sync::Arc;

use serde_json::json;

use crate::metadata::{CatalogConfig, ModelCatalog};
use crate::scope::NodeHandle;
use crate::testing::MemoryGraph;

use super::GraphAdapter;

const CATALOG: &str = r#"
name: sports_admin
models:
  - label: Division
    fields:
      - name: name
        type: string
        queryable: true
      - name: custom_league_id
        type: integer
      - name: retired
        type: boolean
      - name: league
        type: belongs_to
        searchable: ["League.name"]
    associations:
      - name: league
        kind: has_one
        target: League
        foreign_key: league_uuid
        primary_key: uuid
  - label: League
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
        foreign_key: league_uuid
        primary_key: uuid
  - label: Team
    fields:
      - name: name
        type: string
      - name: fans
        type: string
        searchable: ["Fan.name"]
    associations:
      - name: fans
        kind: many_to_many
        target: Fan
        foreign_key: fan_uuid
        primary_key: uuid
  - label: Fan
    fields:
      - name: name
        type: string
"#;

fn catalog() -> Arc<ModelCatalog> {
    Arc::new(
        CatalogConfig::from_yaml_str(CATALOG)
            .expect("fixture parses")
            .into_catalog()
            .expect("fixture builds"),
    )
}

fn seeded_graph() -> MemoryGraph {
    let graph = MemoryGraph::new();
    graph.insert("League", json!({"uuid": "league-1", "name": "Premier"}));
    graph.insert("League", json!({"uuid": "league-2", "name": "Minor"}));
    graph.insert(
        "Division",
        json!({
            "uuid": "div-east",
            "name": "East",
            "custom_league_id": 1,
            "retired": false,
            "league_uuid": "league-1"
        }),
    );
    // No `retired` property at all: boolean filters must treat it as false.
    graph.insert(
        "Division",
        json!({
            "uuid": "div-west",
            "name": "West",
            "custom_league_id": 2,
            "league_uuid": "league-1"
        }),
    );
    graph.insert(
        "Division",
        json!({
            "uuid": "div-north",
            "name": "North",
            "custom_league_id": 3,
            "retired": true,
            "league_uuid": "league-2"
        }),
    );
    graph
}

fn adapter(graph: &MemoryGraph, label: &str) -> GraphAdapter {
    GraphAdapter::new(Arc::new(graph.clone()), catalog(), label).expect("known model")
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
