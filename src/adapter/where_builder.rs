//! Disjunctive statement assembly for free-text search.

use log::debug;
use serde_json::Value;

use crate::metadata::{FieldDescriptor, ModelSchema};
use crate::scope::Scope;
use crate::statement::{build_statement, FilterOperator, Fragment};

/// Collects per-column match candidates and applies them to a scope as one
/// disjunction. Only columns living on the builder's own collection
/// participate: the rendered statement binds a single node alias, so a
/// foreign column has nothing to reference.
pub struct WhereBuilder<'a> {
    scope: Scope,
    model: &'a ModelSchema,
    fragments: Vec<Fragment>,
}

impl<'a> WhereBuilder<'a> {
    pub fn new(scope: Scope, model: &'a ModelSchema) -> Self {
        WhereBuilder {
            scope,
            model,
            fragments: Vec::new(),
        }
    }

    /// Add one candidate per searchable column of `field` that can
    /// interpret `value`.
    pub fn add(&mut self, field: &FieldDescriptor, value: &Value, operator: Option<FilterOperator>) {
        for column in &field.searchable_columns {
            if column.collection != self.model.label {
                debug!(
                    "free-text search skips `{}.{}`: not a `{}` column",
                    column.collection, column.property, self.model.label
                );
                continue;
            }
            if let Some(fragment) =
                build_statement(&column.property, column.column_type, value, operator)
            {
                self.fragments.push(fragment);
            }
        }
    }

    /// Apply the collected candidates to the scope. No candidates means no
    /// constraint, never an empty disjunction.
    pub fn build(self) -> Scope {
        match Fragment::any(self.fragments) {
            Some(fragment) => self.scope.where_fragment(fragment),
            None => self.scope,
        }
    }
}
