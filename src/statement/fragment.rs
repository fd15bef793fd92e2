use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Prefix for generated parameter names; the full name is `query_param_<n>`
/// with `n` assigned in rendering order.
pub const PARAM_PREFIX: &str = "query_param_";

/// Comparison operators a [`Fragment::Compare`] can render.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CompareOp {
    Eq,
    Gte,
    Lte,
}

impl CompareOp {
    pub fn as_cypher(&self) -> &'static str {
        match self {
            CompareOp::Eq => "=",
            CompareOp::Gte => ">=",
            CompareOp::Lte => "<=",
        }
    }
}

/// One predicate over a single node, kept as a tree instead of statement
/// text. Values never appear in the rendered text; every value slot becomes
/// a `$query_param_<n>` placeholder bound in the parameter map, so the
/// placeholder and value counts agree by construction.
///
/// Property names inside fragments are bare (`name`, not `n.name`); the
/// node alias is supplied at render time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Fragment {
    /// `(n.column <op> $p)` with the value bound as a parameter.
    Compare {
        column: String,
        op: CompareOp,
        value: Value,
    },
    /// `(LOWER(n.column) =~ $p)` — case-insensitive full-string regex match.
    /// `pattern` is the final regex source and is bound as the parameter
    /// value; any user text inside it has already been escaped.
    Matches { column: String, pattern: String },
    /// `(n.column IN $p)` with the whole list bound as one parameter.
    /// An empty list is a real constraint (membership in the empty set),
    /// not an absent one.
    In { column: String, values: Vec<Value> },
    /// `(n.column IS NULL)`, or `IS NOT NULL` when negated.
    IsNull { column: String, negated: bool },
    /// `(n.column = '')`, or `<> ''` when negated. The empty string is part
    /// of the statement shape, not user input, so it stays literal.
    EmptyString { column: String, negated: bool },
    /// Disjunction of sub-fragments.
    Any(Vec<Fragment>),
    /// Conjunction of sub-fragments.
    All(Vec<Fragment>),
}

impl Fragment {
    pub fn eq(column: impl Into<String>, value: Value) -> Self {
        Fragment::Compare {
            column: column.into(),
            op: CompareOp::Eq,
            value,
        }
    }

    /// Combine fragments with OR. `None` when the input is empty; a single
    /// fragment is returned as-is rather than wrapped.
    pub fn any(mut fragments: Vec<Fragment>) -> Option<Fragment> {
        match fragments.len() {
            0 => None,
            1 => fragments.pop(),
            _ => Some(Fragment::Any(fragments)),
        }
    }

    /// Combine fragments with AND, with the same collapsing as [`Fragment::any`].
    pub fn all(mut fragments: Vec<Fragment>) -> Option<Fragment> {
        match fragments.len() {
            0 => None,
            1 => fragments.pop(),
            _ => Some(Fragment::All(fragments)),
        }
    }

    /// Number of parameters this fragment binds when rendered.
    pub fn param_count(&self) -> usize {
        match self {
            Fragment::Compare { .. } | Fragment::Matches { .. } | Fragment::In { .. } => 1,
            Fragment::IsNull { .. } | Fragment::EmptyString { .. } => 0,
            Fragment::Any(parts) | Fragment::All(parts) => {
                parts.iter().map(Fragment::param_count).sum()
            }
        }
    }

    /// Render to statement text, binding values through `binder`. The same
    /// fragment always renders the same text for a fresh binder; parameter
    /// names depend only on rendering order.
    pub fn to_cypher(&self, alias: &str, binder: &mut ParamBinder) -> String {
        match self {
            Fragment::Compare { column, op, value } => {
                let placeholder = binder.bind(value.clone());
                format!("({alias}.{column} {} {placeholder})", op.as_cypher())
            }
            Fragment::Matches { column, pattern } => {
                let placeholder = binder.bind(Value::String(pattern.clone()));
                format!("(LOWER({alias}.{column}) =~ {placeholder})")
            }
            Fragment::In { column, values } => {
                let placeholder = binder.bind(Value::Array(values.clone()));
                format!("({alias}.{column} IN {placeholder})")
            }
            Fragment::IsNull { column, negated } => {
                if *negated {
                    format!("({alias}.{column} IS NOT NULL)")
                } else {
                    format!("({alias}.{column} IS NULL)")
                }
            }
            Fragment::EmptyString { column, negated } => {
                if *negated {
                    format!("({alias}.{column} <> '')")
                } else {
                    format!("({alias}.{column} = '')")
                }
            }
            Fragment::Any(parts) => Self::render_joined(parts, " OR ", alias, binder),
            Fragment::All(parts) => Self::render_joined(parts, " AND ", alias, binder),
        }
    }

    fn render_joined(
        parts: &[Fragment],
        separator: &str,
        alias: &str,
        binder: &mut ParamBinder,
    ) -> String {
        let rendered: Vec<String> = parts
            .iter()
            .map(|part| part.to_cypher(alias, binder))
            .collect();
        format!("({})", rendered.join(separator))
    }
}

/// Allocates sequential parameter names and collects their values while a
/// statement renders.
#[derive(Debug, Default)]
pub struct ParamBinder {
    counter: usize,
    params: HashMap<String, Value>,
}

impl ParamBinder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `value` under the next parameter name and return the
    /// placeholder to splice into the statement text.
    pub fn bind(&mut self, value: Value) -> String {
        let name = format!("{PARAM_PREFIX}{}", self.counter);
        self.counter += 1;
        self.params.insert(name.clone(), value);
        format!("${name}")
    }

    pub fn len(&self) -> usize {
        self.params.len()
    }

    pub fn is_empty(&self) -> bool {
        self.params.is_empty()
    }

    pub fn into_params(self) -> HashMap<String, Value> {
        self.params
    }
}
