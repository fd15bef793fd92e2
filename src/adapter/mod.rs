//! The admin query adapter: one model's list, search, count, fetch and
//! delete requests composed into [`Scope`]s.
//!
//! Composition is pure until a scope resolves; the only exception is filter
//! entries that reach through an association, which run their sub-query
//! eagerly (see [`rewriter`]).

pub mod conditions;
pub mod errors;
pub mod options;
pub mod where_builder;

mod rewriter;

#[cfg(test)]
mod tests;

use std::sync::Arc;

use log::debug;
use serde_json::Value;

use crate::metadata::{MetadataError, ModelCatalog, ModelSchema};
use crate::scope::{GraphStore, NodeHandle, Scope, SortDirection};
use crate::statement::{FilterOperator, Fragment};

pub use conditions::{make_field_conditions, ConditionGroup};
pub use errors::QueryError;
pub use options::{FilterEntry, QueryOptions};
pub use where_builder::WhereBuilder;

/// Adapter for one model of the catalog. Cheap to construct; holds shared
/// handles only.
pub struct GraphAdapter {
    store: Arc<dyn GraphStore>,
    catalog: Arc<ModelCatalog>,
    label: String,
}

impl std::fmt::Debug for GraphAdapter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GraphAdapter")
            .field("label", &self.label)
            .finish_non_exhaustive()
    }
}

impl GraphAdapter {
    /// Fails when `model` is not in the catalog, so every later lookup can
    /// rely on the schema being there.
    pub fn new(
        store: Arc<dyn GraphStore>,
        catalog: Arc<ModelCatalog>,
        model: impl Into<String>,
    ) -> Result<Self, MetadataError> {
        let label = model.into();
        catalog.get_model(&label)?;
        Ok(GraphAdapter {
            store,
            catalog,
            label,
        })
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn primary_key(&self) -> &str {
        &self.model().primary_key
    }

    /// Single-node statements cannot join collections; admin callers use
    /// this to fall back to key-membership filtering.
    pub fn supports_joins(&self) -> bool {
        false
    }

    /// Unconstrained deferred scope over the whole collection.
    pub fn scoped(&self) -> Scope {
        Scope::store(self.store.clone(), self.label.clone())
    }

    /// Compose a scope for one request. Stages apply in a fixed order —
    /// limit, bulk keys, free-text query, filters, sort, pagination — so
    /// equal options always compose the same scope. `base` substitutes the
    /// starting scope; admin sections pass a pre-scoped row set here, and
    /// pagination does not apply to those.
    pub fn all(&self, options: &QueryOptions, base: Option<Scope>) -> Result<Scope, QueryError> {
        let model = self.model();
        let mut scope = base.unwrap_or_else(|| self.scoped());

        if let Some(limit) = options.limit {
            scope = scope.limit(limit);
        }
        if let Some(ids) = &options.bulk_ids {
            scope = scope.where_fragment(Fragment::In {
                column: model.primary_key.clone(),
                values: ids.clone(),
            });
        }
        if let Some(query) = &options.query {
            scope = self.query_scope(scope, query);
        }
        for fragment in self.filter_fragments(&options.filters)? {
            scope = scope.where_fragment(fragment);
        }
        if let Some(sort) = &options.sort {
            scope = self.sort_by(scope, sort, options.sort_reverse)?;
        }
        if let (Some(page), Some(per)) = (options.page, options.per) {
            if scope.is_materialized() {
                debug!("pagination skipped: scope is pre-materialized");
            } else {
                scope = scope
                    .skip(page.saturating_sub(1).saturating_mul(per))
                    .limit(per);
            }
        }
        Ok(scope)
    }

    /// Count the rows `options` matches. Row slicing is stripped first so a
    /// dropdown limit or the current page never skews totals.
    pub fn count(&self, options: &QueryOptions, base: Option<Scope>) -> Result<u64, QueryError> {
        let scope = self.all(&options.without_slicing(), base)?;
        Ok(scope.count()?)
    }

    /// First row of the composed scope, if any.
    pub fn first(
        &self,
        options: &QueryOptions,
        base: Option<Scope>,
    ) -> Result<Option<Box<dyn NodeHandle>>, QueryError> {
        Ok(self.all(options, base)?.first()?)
    }

    /// Fetch one row by primary key.
    pub fn get(&self, id: &Value) -> Result<Option<Box<dyn NodeHandle>>, QueryError> {
        let model = self.model();
        Ok(self
            .scoped()
            .where_fragment(Fragment::eq(model.primary_key.clone(), id.clone()))
            .first()?)
    }

    /// Destroy each row. Rows delete independently; the first failure stops
    /// the pass and propagates.
    pub fn destroy(&self, rows: &[Box<dyn NodeHandle>]) -> Result<(), QueryError> {
        for row in rows {
            row.destroy()?;
        }
        Ok(())
    }

    fn model(&self) -> &ModelSchema {
        self.catalog
            .get_model(&self.label)
            .expect("model presence checked at construction")
    }

    /// Free-text search across the model's queryable fields, each with its
    /// configured operator.
    fn query_scope(&self, scope: Scope, query: &str) -> Scope {
        let model = self.model();
        let value = Value::String(query.to_string());
        let mut builder = WhereBuilder::new(scope, model);
        for field in model.queryable_fields() {
            builder.add(field, &value, Some(field.search_operator));
        }
        builder.build()
    }

    /// One fragment per filter entry that produced a constraint. Multiple
    /// columns of one entry are alternatives; separate entries conjoin when
    /// the caller applies them. Entries naming unknown fields are skipped.
    fn filter_fragments(&self, entries: &[FilterEntry]) -> Result<Vec<Fragment>, QueryError> {
        let model = self.model();
        let mut fragments = Vec::new();
        for entry in entries {
            let Some(field) = model
                .filterable_fields()
                .find(|field| field.name == entry.field)
            else {
                debug!(
                    "`{}` has no filterable field `{}`; skipping its filter",
                    model.label, entry.field
                );
                continue;
            };

            let operator = FilterOperator::parse(&entry.operator);
            let conditions = make_field_conditions(field, &entry.value, operator);
            let resolved =
                rewriter::conditions_for_collection(&self.store, model, field, conditions)?;
            if let Some(fragment) = Fragment::any(resolved) {
                fragments.push(fragment);
            }
        }
        Ok(fragments)
    }

    /// Resolve a sort spec to a property of this model. The admin lists
    /// descending by default; `reverse` flips to ascending.
    ///
    /// Only catalog names reach the rendered ORDER BY: the property must be
    /// the model's primary key or one of its declared fields. The raw sort
    /// string is request input and never enters statement text itself.
    fn sort_by(&self, scope: Scope, sort: &str, reverse: bool) -> Result<Scope, QueryError> {
        let model = self.model();
        let property = match sort.split_once('.') {
            Some((collection, property)) => {
                if collection != model.label {
                    return Err(QueryError::CrossCollectionSort {
                        model: model.label.clone(),
                        column: property.to_string(),
                        collection: collection.to_string(),
                    });
                }
                property
            }
            None => sort,
        };
        if property != model.primary_key && model.field(property).is_none() {
            return Err(QueryError::UnknownSortColumn {
                model: model.label.clone(),
                column: property.to_string(),
            });
        }
        let direction = if reverse {
            SortDirection::Asc
        } else {
            SortDirection::Desc
        };
        Ok(scope.order(property, direction))
    }
}
