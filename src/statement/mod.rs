//! Statement generation: turning one admin filter input (column, declared
//! type, raw value, operator) into a [`Fragment`], the typed predicate tree
//! that later renders to parameterized statement text.
//!
//! Generation is total but partial in effect: input that cannot be
//! interpreted for the declared type produces `None` rather than an error,
//! so a half-typed filter simply constrains nothing.

mod eval;
pub mod fragment;
pub mod operator;

use log::debug;
use serde_json::{Number, Value};

use crate::metadata::FieldType;

pub use fragment::{CompareOp, Fragment, ParamBinder, PARAM_PREFIX};
pub use operator::FilterOperator;

pub(crate) use eval::compare_values;

/// String forms the boolean builder accepts, mirroring what admin UIs send
/// for checkbox filters.
const TRUE_LITERALS: [&str; 3] = ["true", "t", "1"];
const FALSE_LITERALS: [&str; 3] = ["false", "f", "0"];

/// Build the predicate for one column. `operator` is the parsed form of the
/// UI's operator string; pass `None` when the string was unrecognized.
///
/// Unary operators win over the declared type, and may arrive through the
/// value slot (dropdown filters submit them there). A `_discard` in either
/// slot suppresses the condition entirely.
pub fn build_statement(
    column: &str,
    column_type: FieldType,
    value: &Value,
    operator: Option<FilterOperator>,
) -> Option<Fragment> {
    if operator == Some(FilterOperator::Discard) || value.as_str() == Some("_discard") {
        return None;
    }

    if let Some(op) = operator {
        if let Some(fragment) = unary_fragment(column, op) {
            return Some(fragment);
        }
    }
    if let Some(raw) = value.as_str() {
        if let Some(op) = FilterOperator::parse(raw) {
            if let Some(fragment) = unary_fragment(column, op) {
                return Some(fragment);
            }
        }
    }

    match column_type {
        FieldType::Boolean => boolean_statement(column, value),
        FieldType::Integer => numeric_statement(column, value, operator, NumericParse::Integer),
        FieldType::Decimal | FieldType::Float => {
            numeric_statement(column, value, operator, NumericParse::Float)
        }
        FieldType::String | FieldType::Text => string_statement(column, value, operator),
        FieldType::Enum => enum_statement(column, value),
        FieldType::BelongsTo => belongs_to_statement(column, value),
        FieldType::Date | FieldType::DateTime => {
            debug!(
                "filtering is not supported for {} column `{column}`",
                column_type.as_str()
            );
            None
        }
    }
}

/// Null/empty tests carried by the operator itself. `None` when the operator
/// is not unary.
fn unary_fragment(column: &str, operator: FilterOperator) -> Option<Fragment> {
    let is_null = |negated: bool| Fragment::IsNull {
        column: column.to_string(),
        negated,
    };
    let empty = |negated: bool| Fragment::EmptyString {
        column: column.to_string(),
        negated,
    };

    match operator {
        FilterOperator::Blank => Some(Fragment::Any(vec![is_null(false), empty(false)])),
        FilterOperator::Present => Some(Fragment::All(vec![is_null(true), empty(true)])),
        FilterOperator::Null => Some(is_null(false)),
        FilterOperator::NotNull => Some(is_null(true)),
        FilterOperator::Empty => Some(empty(false)),
        FilterOperator::NotEmpty => Some(empty(true)),
        _ => None,
    }
}

fn boolean_statement(column: &str, value: &Value) -> Option<Fragment> {
    let truth = match value {
        Value::Bool(b) => *b,
        Value::String(s) if TRUE_LITERALS.contains(&s.as_str()) => true,
        Value::String(s) if FALSE_LITERALS.contains(&s.as_str()) => false,
        _ => return None,
    };

    if truth {
        Some(Fragment::eq(column, Value::Bool(true)))
    } else {
        // Stored graphs routinely omit false flags, so "false" must also
        // match nodes without the property.
        Some(Fragment::Any(vec![
            Fragment::IsNull {
                column: column.to_string(),
                negated: false,
            },
            Fragment::eq(column, Value::Bool(false)),
        ]))
    }
}

#[derive(Clone, Copy)]
enum NumericParse {
    Integer,
    Float,
}

fn parse_numeric(kind: NumericParse, value: &Value) -> Option<Value> {
    match value {
        Value::Number(_) => Some(value.clone()),
        Value::String(raw) => match kind {
            NumericParse::Integer => raw.parse::<i64>().ok().map(Value::from),
            NumericParse::Float => raw
                .parse::<f64>()
                .ok()
                .and_then(Number::from_f64)
                .map(Value::Number),
        },
        _ => None,
    }
}

fn numeric_statement(
    column: &str,
    value: &Value,
    operator: Option<FilterOperator>,
    kind: NumericParse,
) -> Option<Fragment> {
    match value {
        // Array form carries [exact, range_begin, range_end].
        Value::Array(items) => {
            let bound = |index: usize| items.get(index).and_then(|v| parse_numeric(kind, v));
            if operator == Some(FilterOperator::Between) {
                range_fragment(column, bound(1), bound(2))
            } else {
                bound(0).map(|v| Fragment::eq(column, v))
            }
        }
        _ => parse_numeric(kind, value).map(|v| Fragment::eq(column, v)),
    }
}

/// Inclusive range; either bound may be absent, both absent means no
/// constraint.
fn range_fragment(column: &str, min: Option<Value>, max: Option<Value>) -> Option<Fragment> {
    let gte = |value: Value| Fragment::Compare {
        column: column.to_string(),
        op: CompareOp::Gte,
        value,
    };
    let lte = |value: Value| Fragment::Compare {
        column: column.to_string(),
        op: CompareOp::Lte,
        value,
    };

    match (min, max) {
        (Some(min), Some(max)) => Some(Fragment::All(vec![gte(min), lte(max)])),
        (Some(min), None) => Some(gte(min)),
        (None, Some(max)) => Some(lte(max)),
        (None, None) => None,
    }
}

fn string_statement(
    column: &str,
    value: &Value,
    operator: Option<FilterOperator>,
) -> Option<Fragment> {
    let raw = value.as_str()?;
    if raw.trim().is_empty() {
        return None;
    }

    // The lower-cased value is escaped before it enters the pattern, so the
    // bound parameter matches it literally.
    let needle = regex::escape(&raw.to_lowercase());
    let pattern = match operator? {
        FilterOperator::Default | FilterOperator::Like => format!(".*{needle}.*"),
        FilterOperator::StartsWith => format!("{needle}.*"),
        FilterOperator::EndsWith => format!(".*{needle}"),
        FilterOperator::Is => needle,
        _ => return None,
    };

    Some(Fragment::Matches {
        column: column.to_string(),
        pattern,
    })
}

fn enum_statement(column: &str, value: &Value) -> Option<Fragment> {
    let values = match value {
        Value::String(s) if !s.is_empty() => vec![value.clone()],
        Value::Number(_) => vec![value.clone()],
        Value::Array(items) if !items.is_empty() => items.clone(),
        _ => return None,
    };

    Some(Fragment::In {
        column: column.to_string(),
        values,
    })
}

/// Foreign keys are integer-valued; only input that reads back identically
/// qualifies, so `"042"` or `"4.2"` never turns into a key test.
fn belongs_to_statement(column: &str, value: &Value) -> Option<Fragment> {
    match value {
        Value::Number(n) if n.is_u64() => Some(Fragment::eq(column, value.clone())),
        Value::String(raw) => {
            let parsed: u64 = raw.parse().ok()?;
            if parsed.to_string() == *raw {
                Some(Fragment::eq(column, Value::from(parsed)))
            } else {
                None
            }
        }
        _ => None,
    }
}
