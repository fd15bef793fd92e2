use serde::{Deserialize, Serialize};

use crate::statement::FilterOperator;

/// Declared types a filterable property can have. Statement generation
/// dispatches on this closed set; configuration may not introduce others.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldType {
    Boolean,
    Integer,
    Decimal,
    Float,
    String,
    Text,
    /// Closed value set; filters test list membership.
    Enum,
    /// Reference to another node, stored as a non-negative integer key.
    BelongsTo,
    /// Declared for completeness; date filtering is not supported and such
    /// fields produce no constraint.
    Date,
    #[serde(rename = "datetime")]
    DateTime,
}

impl FieldType {
    pub fn as_str(&self) -> &'static str {
        match self {
            FieldType::Boolean => "boolean",
            FieldType::Integer => "integer",
            FieldType::Decimal => "decimal",
            FieldType::Float => "float",
            FieldType::String => "string",
            FieldType::Text => "text",
            FieldType::Enum => "enum",
            FieldType::BelongsTo => "belongs_to",
            FieldType::Date => "date",
            FieldType::DateTime => "datetime",
        }
    }
}

/// One concrete property a field searches over. A field usually targets its
/// own property, but an association field targets properties of the
/// associated collection (e.g. a `league` field searching `League.name`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchableColumn {
    /// Label of the collection the property lives on.
    pub collection: String,
    /// Bare property name, without any alias prefix.
    pub property: String,
    /// Declared type of the property, driving statement generation.
    pub column_type: FieldType,
}

impl SearchableColumn {
    pub fn new(
        collection: impl Into<String>,
        property: impl Into<String>,
        column_type: FieldType,
    ) -> Self {
        SearchableColumn {
            collection: collection.into(),
            property: property.into(),
            column_type,
        }
    }
}

/// Admin-facing description of one model field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldDescriptor {
    pub name: String,
    pub field_type: FieldType,
    /// Columns consulted when this field participates in search or filters.
    pub searchable_columns: Vec<SearchableColumn>,
    /// Included in free-text search across the model.
    pub queryable: bool,
    /// Offered as a per-field filter.
    pub filterable: bool,
    /// Operator applied during free-text search.
    pub search_operator: FilterOperator,
}

impl FieldDescriptor {
    /// A field with no searchable columns wired up yet; catalog construction
    /// fills those in (defaulting to the field's own property).
    pub fn new(name: impl Into<String>, field_type: FieldType) -> Self {
        FieldDescriptor {
            name: name.into(),
            field_type,
            searchable_columns: Vec::new(),
            queryable: false,
            filterable: true,
            search_operator: FilterOperator::Default,
        }
    }
}
