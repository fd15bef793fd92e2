//! Model metadata: which fields a model exposes to the admin UI, how those
//! fields search, and how models associate with each other. The catalog is
//! usually loaded from a YAML file (see [`config`]) but can be assembled
//! programmatically.

pub mod config;
pub mod errors;

mod association;
mod field;

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

pub use association::{AssociationDescriptor, AssociationKind};
pub use config::CatalogConfig;
pub use errors::MetadataError;
pub use field::{FieldDescriptor, FieldType, SearchableColumn};

/// Admin-facing description of one graph model: its label, primary key, and
/// the fields and associations the UI may touch.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelSchema {
    pub label: String,
    pub primary_key: String,
    fields: Vec<FieldDescriptor>,
    associations: Vec<AssociationDescriptor>,
}

impl ModelSchema {
    pub fn new(label: impl Into<String>, primary_key: impl Into<String>) -> Self {
        ModelSchema {
            label: label.into(),
            primary_key: primary_key.into(),
            fields: Vec::new(),
            associations: Vec::new(),
        }
    }

    pub fn push_field(&mut self, field: FieldDescriptor) {
        self.fields.push(field);
    }

    pub fn push_association(&mut self, association: AssociationDescriptor) {
        self.associations.push(association);
    }

    pub fn field(&self, name: &str) -> Option<&FieldDescriptor> {
        self.fields.iter().find(|field| field.name == name)
    }

    pub fn association(&self, name: &str) -> Option<&AssociationDescriptor> {
        self.associations.iter().find(|assoc| assoc.name == name)
    }

    pub fn fields(&self) -> &[FieldDescriptor] {
        &self.fields
    }

    pub fn associations(&self) -> &[AssociationDescriptor] {
        &self.associations
    }

    /// Fields participating in free-text search, in declaration order.
    pub fn queryable_fields(&self) -> impl Iterator<Item = &FieldDescriptor> {
        self.fields.iter().filter(|field| field.queryable)
    }

    /// Fields offered as filters, in declaration order.
    pub fn filterable_fields(&self) -> impl Iterator<Item = &FieldDescriptor> {
        self.fields.iter().filter(|field| field.filterable)
    }
}

/// All model schemas known to the adapter, keyed by label.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ModelCatalog {
    models: HashMap<String, ModelSchema>,
}

impl ModelCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert_model(&mut self, model: ModelSchema) {
        self.models.insert(model.label.clone(), model);
    }

    pub fn get_model(&self, label: &str) -> Result<&ModelSchema, MetadataError> {
        self.models
            .get(label)
            .ok_or_else(|| MetadataError::UnknownModel {
                label: label.to_string(),
            })
    }

    pub fn get_model_opt(&self, label: &str) -> Option<&ModelSchema> {
        self.models.get(label)
    }

    pub fn labels(&self) -> impl Iterator<Item = &str> {
        self.models.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.models.len()
    }

    pub fn is_empty(&self) -> bool {
        self.models.is_empty()
    }
}
