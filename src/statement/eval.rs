//! Structural evaluation of fragments against a node's attributes, matching
//! what a graph store would do with the rendered statement. Used by
//! pre-materialized scopes and the in-memory store, which never render text.

use std::cmp::Ordering;

use log::warn;
use regex::Regex;
use serde_json::Value;

use crate::scope::NodeHandle;
use crate::statement::fragment::{CompareOp, Fragment};

impl Fragment {
    /// Whether `node` satisfies this fragment. Follows store comparison
    /// semantics: a missing or null attribute fails every test except
    /// `IS NULL`, and `=~` must match the whole string.
    pub fn matches(&self, node: &dyn NodeHandle) -> bool {
        match self {
            Fragment::Compare { column, op, value } => match node.attribute(column) {
                Some(attr) if !attr.is_null() => compare_matches(&attr, *op, value),
                _ => false,
            },
            Fragment::Matches { column, pattern } => match node.attribute(column) {
                Some(Value::String(text)) => regex_full_match(pattern, &text.to_lowercase()),
                _ => false,
            },
            Fragment::In { column, values } => match node.attribute(column) {
                Some(attr) if !attr.is_null() => values.iter().any(|v| loosely_equal(&attr, v)),
                _ => false,
            },
            Fragment::IsNull { column, negated } => {
                let is_null = matches!(node.attribute(column), None | Some(Value::Null));
                is_null != *negated
            }
            Fragment::EmptyString { column, negated } => match node.attribute(column) {
                // Null propagates through both `= ''` and `<> ''`, so a
                // missing attribute never matches either form.
                None | Some(Value::Null) => false,
                Some(attr) => {
                    let empty = attr == Value::String(String::new());
                    empty != *negated
                }
            },
            Fragment::Any(parts) => parts.iter().any(|part| part.matches(node)),
            Fragment::All(parts) => parts.iter().all(|part| part.matches(node)),
        }
    }
}

fn compare_matches(attr: &Value, op: CompareOp, value: &Value) -> bool {
    match value_ordering(attr, value) {
        Some(ordering) => match op {
            CompareOp::Eq => ordering == Ordering::Equal,
            CompareOp::Gte => ordering != Ordering::Less,
            CompareOp::Lte => ordering != Ordering::Greater,
        },
        None => false,
    }
}

/// Ordering between two attribute values, or `None` when the types are not
/// comparable (which a store treats as "no match").
fn value_ordering(a: &Value, b: &Value) -> Option<Ordering> {
    if let (Some(x), Some(y)) = (as_f64(a), as_f64(b)) {
        return x.partial_cmp(&y);
    }
    match (a, b) {
        (Value::String(x), Value::String(y)) => Some(x.cmp(y)),
        (Value::Bool(x), Value::Bool(y)) => Some(x.cmp(y)),
        _ => None,
    }
}

/// Equality with numeric coercion, so `18` stored as a float still matches a
/// filter parsed to an integer.
fn loosely_equal(a: &Value, b: &Value) -> bool {
    if let (Some(x), Some(y)) = (as_f64(a), as_f64(b)) {
        return x == y;
    }
    a == b
}

fn as_f64(value: &Value) -> Option<f64> {
    value.as_f64()
}

fn regex_full_match(pattern: &str, text: &str) -> bool {
    match Regex::new(&format!("^(?:{pattern})$")) {
        Ok(re) => re.is_match(text),
        Err(error) => {
            warn!("unevaluable match pattern `{pattern}`: {error}");
            false
        }
    }
}

/// Total order over optional attribute values, for sorting materialized
/// rows: absent/null first, then booleans, numbers, strings, and finally
/// compound values by their serialized form.
pub(crate) fn compare_values(a: Option<&Value>, b: Option<&Value>) -> Ordering {
    match (normalize(a), normalize(b)) {
        (None, None) => Ordering::Equal,
        (None, Some(_)) => Ordering::Less,
        (Some(_), None) => Ordering::Greater,
        (Some(x), Some(y)) => value_ordering(x, y).unwrap_or_else(|| {
            let rank = type_rank(x).cmp(&type_rank(y));
            if rank == Ordering::Equal {
                x.to_string().cmp(&y.to_string())
            } else {
                rank
            }
        }),
    }
}

fn normalize(value: Option<&Value>) -> Option<&Value> {
    match value {
        None | Some(Value::Null) => None,
        other => other,
    }
}

fn type_rank(value: &Value) -> u8 {
    match value {
        Value::Null => 0,
        Value::Bool(_) => 1,
        Value::Number(_) => 2,
        Value::String(_) => 3,
        Value::Array(_) => 4,
        Value::Object(_) => 5,
    }
}
