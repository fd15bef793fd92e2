//! Resolving one field against one filter value.

use serde_json::Value;

use crate::metadata::FieldDescriptor;
use crate::statement::{build_statement, FilterOperator, Fragment};

/// Fragments produced for one field, grouped by the collection their columns
/// live on, in first-seen order. Fragments within a group are alternatives;
/// groups for foreign collections still need rewriting before they can
/// constrain the current collection.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ConditionGroup {
    groups: Vec<(String, Vec<Fragment>)>,
}

impl ConditionGroup {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, collection: &str, fragment: Fragment) {
        match self
            .groups
            .iter_mut()
            .find(|(label, _)| label == collection)
        {
            Some((_, fragments)) => fragments.push(fragment),
            None => self.groups.push((collection.to_string(), vec![fragment])),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &[Fragment])> {
        self.groups
            .iter()
            .map(|(label, fragments)| (label.as_str(), fragments.as_slice()))
    }

    pub fn into_groups(self) -> Vec<(String, Vec<Fragment>)> {
        self.groups
    }
}

/// Give every searchable column of `field` a chance to interpret the value.
/// Columns that cannot (wrong type, unparseable input) contribute nothing;
/// the rest group by their collection.
pub fn make_field_conditions(
    field: &FieldDescriptor,
    value: &Value,
    operator: Option<FilterOperator>,
) -> ConditionGroup {
    let mut conditions = ConditionGroup::new();
    for column in &field.searchable_columns {
        if let Some(fragment) =
            build_statement(&column.property, column.column_type, value, operator)
        {
            conditions.push(&column.collection, fragment);
        }
    }
    conditions
}
