//! Catalog loading from files and the configuration error surface.

use std::io::Write;

use admingraph::{CatalogConfig, MetadataError};
use tempfile::NamedTempFile;

const CATALOG: &str = r#"
name: football_admin
version: "1.0"
models:
  - label: Division
    primary_key: uuid
    fields:
      - name: name
        type: string
        queryable: true
      - name: league
        type: belongs_to
        searchable: ["Conference.name"]
    associations:
      - name: league
        kind: has_one
        target: Conference
        foreign_key: conference_uuid
  - label: Conference
    fields:
      - name: name
        type: string
"#;

#[test]
fn a_catalog_file_loads_end_to_end() {
    let mut file = NamedTempFile::new().expect("temp file");
    file.write_all(CATALOG.as_bytes()).expect("write");

    let catalog = CatalogConfig::from_yaml_file(file.path())
        .expect("reads and parses")
        .into_catalog()
        .expect("builds");

    assert_eq!(catalog.len(), 2);
    let division = catalog.get_model("Division").expect("model");
    assert_eq!(division.primary_key, "uuid");
    let association = division.association("league").expect("association");
    // The association's primary key falls back to the uuid convention.
    assert_eq!(association.primary_key, "uuid");
}

#[test]
fn a_missing_file_is_a_read_error() {
    let error = CatalogConfig::from_yaml_file("/nonexistent/catalog.yaml").expect_err("no file");
    assert!(matches!(error, MetadataError::ConfigRead { .. }));
}

#[test]
fn broken_yaml_is_a_parse_error() {
    let error = CatalogConfig::from_yaml_str("models: [:::").expect_err("broken");
    assert!(matches!(error, MetadataError::ConfigParse { .. }));
}

#[test]
fn an_empty_model_list_is_rejected() {
    let error = CatalogConfig::from_yaml_str("models: []")
        .expect("parses")
        .into_catalog()
        .expect_err("rejected");
    assert!(matches!(error, MetadataError::InvalidConfig { .. }));
}

#[test]
fn statement_reaching_identifiers_must_be_word_shaped() {
    let poisoned = CATALOG.replace("foreign_key: conference_uuid", "foreign_key: \"uuid) OR 1=1\"");
    let error = CatalogConfig::from_yaml_str(&poisoned)
        .expect("parses")
        .into_catalog()
        .expect_err("rejected");
    assert!(matches!(error, MetadataError::InvalidIdentifier { .. }));
}
