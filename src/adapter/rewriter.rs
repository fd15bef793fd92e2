//! Rewriting conditions that target an associated collection into key
//! membership tests on the current collection.
//!
//! Graph stores evaluate these statements against a single node, so a
//! condition on `League.name` cannot run inside a `Division` query. Instead
//! the associated collection is queried first, and the key values of its
//! matches become an `IN` test the current collection can evaluate locally.
//! The sub-query fully materializes before the outer statement is built; an
//! association that matched nothing leaves an empty membership test, which
//! correctly matches no rows.

use std::sync::Arc;

use log::{debug, warn};
use serde_json::Value;

use crate::metadata::{AssociationDescriptor, AssociationKind, FieldDescriptor, ModelSchema};
use crate::scope::{GraphStore, Scope};
use crate::statement::Fragment;

use super::conditions::ConditionGroup;
use super::errors::QueryError;

/// Flatten `conditions` into fragments evaluable on `model`'s own nodes.
/// Own-collection groups pass through; a group for another collection
/// resolves through the association named after the field. A field whose
/// association cannot be found drops its foreign group with a warning —
/// a misconfigured field should not take down the whole query.
pub(crate) fn conditions_for_collection(
    store: &Arc<dyn GraphStore>,
    model: &ModelSchema,
    field: &FieldDescriptor,
    conditions: ConditionGroup,
) -> Result<Vec<Fragment>, QueryError> {
    let mut fragments = Vec::new();
    for (collection, group) in conditions.into_groups() {
        if collection == model.label {
            fragments.extend(group);
            continue;
        }

        match model.association(&field.name) {
            Some(association) => {
                fragments.push(rewrite_through_association(store, model, association, group)?);
            }
            None => {
                warn!(
                    "`{}` has no association named `{}`; dropping its condition on `{collection}`",
                    model.label, field.name
                );
            }
        }
    }
    Ok(fragments)
}

/// Run the foreign group as its own query and fold the matched keys into a
/// membership test. Which key is read and which is tested depends on who
/// holds the reference: a `has_one` owner stores the foreign key itself,
/// while `has_many` targets point back at the owner's primary key.
fn rewrite_through_association(
    store: &Arc<dyn GraphStore>,
    model: &ModelSchema,
    association: &AssociationDescriptor,
    group: Vec<Fragment>,
) -> Result<Fragment, QueryError> {
    let (own_column, matched_key) = match association.kind {
        AssociationKind::HasOne => (
            association.foreign_key.as_str(),
            association.primary_key.as_str(),
        ),
        AssociationKind::HasMany => (
            association.primary_key.as_str(),
            association.foreign_key.as_str(),
        ),
        AssociationKind::ManyToMany => {
            return Err(QueryError::UnsupportedAssociationKind {
                association: association.name.clone(),
                model: model.label.clone(),
                kind: association.kind,
            });
        }
    };

    let mut scope = Scope::store(store.clone(), &association.target);
    if let Some(fragment) = Fragment::any(group) {
        scope = scope.where_fragment(fragment);
    }
    let matches = scope.materialize()?;

    let mut keys: Vec<Value> = Vec::with_capacity(matches.len());
    for row in &matches {
        match row.attribute(matched_key) {
            Some(Value::Null) | None => {
                debug!(
                    "skipping a `{}` row without `{matched_key}` while rewriting `{}`",
                    association.target, association.name
                );
            }
            Some(key) => keys.push(key),
        }
    }
    debug!(
        "rewrote `{}` filter into {} key(s) tested on `{}`.`{own_column}`",
        association.name,
        keys.len(),
        model.label
    );

    Ok(Fragment::In {
        column: own_column.to_string(),
        values: keys,
    })
}
