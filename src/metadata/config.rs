//! Catalog configuration loaded from YAML.
//!
//! A catalog file lists every model the admin panel manages:
//!
//! ```yaml
//! name: sports_admin
//! version: "1.0"
//! models:
//!   - label: Division
//!     primary_key: uuid
//!     fields:
//!       - name: name
//!         type: string
//!         queryable: true
//!       - name: custom_league_id
//!         type: integer
//!       - name: league
//!         type: belongs_to
//!         searchable: ["League.name"]
//!     associations:
//!       - name: league
//!         kind: has_one
//!         target: League
//!         foreign_key: league_uuid
//!         primary_key: uuid
//!   - label: League
//!     fields:
//!       - name: name
//!         type: string
//!         queryable: true
//! ```
//!
//! `searchable` defaults to the field's own property; entries may name a
//! property of another model as `Label.property`. Labels and property names
//! are restricted to word characters at load time, so configured identifiers
//! can be spliced into statement text without quoting concerns — runtime
//! values never take this path, they are always bound as parameters.

use std::collections::{HashMap, HashSet};
use std::fs;
use std::path::Path;

use log::info;
use serde::{Deserialize, Serialize};
use validator::Validate;

use super::association::{AssociationDescriptor, AssociationKind};
use super::errors::MetadataError;
use super::field::{FieldDescriptor, FieldType, SearchableColumn};
use super::{ModelCatalog, ModelSchema};
use crate::statement::FilterOperator;

/// Root of a catalog configuration file.
#[derive(Debug, Clone, Validate, Serialize, Deserialize)]
pub struct CatalogConfig {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub version: Option<String>,
    #[validate(nested)]
    pub models: Vec<ModelConfig>,
}

#[derive(Debug, Clone, Validate, Serialize, Deserialize)]
pub struct ModelConfig {
    #[validate(length(min = 1, message = "Model label cannot be empty"))]
    pub label: String,
    #[serde(default = "default_primary_key")]
    #[validate(length(min = 1, message = "Primary key cannot be empty"))]
    pub primary_key: String,
    #[serde(default)]
    #[validate(nested)]
    pub fields: Vec<FieldConfig>,
    #[serde(default)]
    #[validate(nested)]
    pub associations: Vec<AssociationConfig>,
}

#[derive(Debug, Clone, Validate, Serialize, Deserialize)]
pub struct FieldConfig {
    #[validate(length(min = 1, message = "Field name cannot be empty"))]
    pub name: String,
    #[serde(rename = "type")]
    pub field_type: FieldType,
    /// Properties this field searches, as `property` or `Label.property`.
    /// Defaults to the field's own name on its own model.
    #[serde(default)]
    pub searchable: Option<Vec<String>>,
    /// Whether free-text search includes this field. Off by default.
    #[serde(default)]
    pub queryable: bool,
    /// Whether the field is offered as a filter. On by default.
    #[serde(default = "default_true")]
    pub filterable: bool,
    #[serde(default = "default_operator")]
    pub search_operator: FilterOperator,
}

#[derive(Debug, Clone, Validate, Serialize, Deserialize)]
pub struct AssociationConfig {
    #[validate(length(min = 1, message = "Association name cannot be empty"))]
    pub name: String,
    pub kind: AssociationKind,
    #[validate(length(min = 1, message = "Association target cannot be empty"))]
    pub target: String,
    #[validate(length(min = 1, message = "Foreign key cannot be empty"))]
    pub foreign_key: String,
    #[serde(default = "default_primary_key")]
    #[validate(length(min = 1, message = "Primary key cannot be empty"))]
    pub primary_key: String,
}

fn default_primary_key() -> String {
    "uuid".to_string()
}

fn default_true() -> bool {
    true
}

fn default_operator() -> FilterOperator {
    FilterOperator::Default
}

fn is_word_identifier(value: &str) -> bool {
    let mut chars = value.chars();
    match chars.next() {
        Some(first) if first.is_ascii_alphabetic() || first == '_' => {
            chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
        }
        _ => false,
    }
}

fn ensure_identifier(value: &str, label: &str, what: &str) -> Result<(), MetadataError> {
    if is_word_identifier(value) {
        Ok(())
    } else {
        Err(MetadataError::identifier_in_model(value, label, what))
    }
}

impl CatalogConfig {
    /// Load catalog configuration from a YAML file.
    pub fn from_yaml_file<P: AsRef<Path>>(path: P) -> Result<Self, MetadataError> {
        let path = path.as_ref();
        let contents = fs::read_to_string(path).map_err(|e| MetadataError::ConfigRead {
            error: e.to_string(),
        })?;
        let config = Self::from_yaml_str(&contents)?;
        info!(
            "loaded model catalog `{}` with {} model(s) from {}",
            config.name.as_deref().unwrap_or("unnamed"),
            config.models.len(),
            path.display()
        );
        Ok(config)
    }

    /// Parse catalog configuration from a YAML string.
    pub fn from_yaml_str(yaml: &str) -> Result<Self, MetadataError> {
        serde_yaml::from_str(yaml).map_err(|e| MetadataError::ConfigParse {
            error: e.to_string(),
        })
    }

    /// Structural checks beyond per-field validation: unique labels and
    /// word-shaped identifiers everywhere one can reach statement text.
    pub fn validate_structure(&self) -> Result<(), MetadataError> {
        if self.models.is_empty() {
            return Err(MetadataError::InvalidConfig {
                message: "catalog must define at least one model".to_string(),
            });
        }

        let mut seen = HashSet::new();
        for model in &self.models {
            if !seen.insert(model.label.as_str()) {
                return Err(MetadataError::InvalidConfig {
                    message: format!("duplicate model label `{}`", model.label),
                });
            }

            let label = model.label.as_str();
            ensure_identifier(label, label, "model label")?;
            ensure_identifier(&model.primary_key, label, "primary key")?;
            for field in &model.fields {
                ensure_identifier(&field.name, label, "field name")?;
            }
            for assoc in &model.associations {
                ensure_identifier(&assoc.name, label, "association name")?;
                ensure_identifier(&assoc.target, label, "association target")?;
                ensure_identifier(&assoc.foreign_key, label, "foreign key")?;
                ensure_identifier(&assoc.primary_key, label, "primary key")?;
            }
        }
        Ok(())
    }

    /// Validate and convert into a [`ModelCatalog`].
    pub fn into_catalog(self) -> Result<ModelCatalog, MetadataError> {
        self.validate()?;
        self.validate_structure()?;

        // Property types per model, so searchable entries pointing at other
        // models can pick up the right column type.
        let mut property_types: HashMap<&str, HashMap<&str, FieldType>> = HashMap::new();
        for model in &self.models {
            let types = property_types.entry(model.label.as_str()).or_default();
            for field in &model.fields {
                types.insert(field.name.as_str(), field.field_type);
            }
        }

        let mut catalog = ModelCatalog::new();
        for model_config in &self.models {
            let mut model = ModelSchema::new(&model_config.label, &model_config.primary_key);

            for field_config in &model_config.fields {
                let mut field = FieldDescriptor::new(&field_config.name, field_config.field_type);
                field.queryable = field_config.queryable;
                field.filterable = field_config.filterable;
                field.search_operator = field_config.search_operator;
                field.searchable_columns = resolve_searchable_columns(
                    field_config,
                    &model_config.label,
                    &property_types,
                )?;
                model.push_field(field);
            }

            for assoc in &model_config.associations {
                model.push_association(AssociationDescriptor::new(
                    &assoc.name,
                    assoc.kind,
                    &assoc.target,
                    &assoc.foreign_key,
                    &assoc.primary_key,
                ));
            }

            catalog.insert_model(model);
        }
        Ok(catalog)
    }
}

fn resolve_searchable_columns(
    field: &FieldConfig,
    own_label: &str,
    property_types: &HashMap<&str, HashMap<&str, FieldType>>,
) -> Result<Vec<SearchableColumn>, MetadataError> {
    let specs = match &field.searchable {
        Some(specs) => specs.clone(),
        None => vec![field.name.clone()],
    };

    let mut columns = Vec::with_capacity(specs.len());
    for spec in specs {
        let (collection, property) = match spec.split_once('.') {
            Some((collection, property)) => (collection.to_string(), property.to_string()),
            None => (own_label.to_string(), spec.clone()),
        };
        if !is_word_identifier(&collection) || !is_word_identifier(&property) {
            return Err(MetadataError::InvalidColumnSpec { spec });
        }

        // Prefer the declared type of the referenced property; fall back to
        // the declaring field's own type when the target is not configured.
        let column_type = property_types
            .get(collection.as_str())
            .and_then(|types| types.get(property.as_str()))
            .copied()
            .unwrap_or(field.field_type);

        columns.push(SearchableColumn {
            collection,
            property,
            column_type,
        });
    }
    Ok(columns)
}
