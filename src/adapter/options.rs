//! Query options as submitted by the admin UI.
//!
//! The wire shape is forgiving by design: the UI round-trips user input
//! straight into these structures, so parsing skips anything unusable
//! instead of failing the whole request.

use log::debug;
use serde_json::Value;

/// Everything one list/search/count request can ask for. Construct directly
/// for programmatic use, or parse the UI payload with
/// [`QueryOptions::from_json`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct QueryOptions {
    /// Hard cap on returned rows, used by dropdown-style lookups.
    pub limit: Option<usize>,
    /// Restrict to these primary keys (bulk actions).
    pub bulk_ids: Option<Vec<Value>>,
    /// Free-text search across the model's queryable fields.
    pub query: Option<String>,
    /// Per-field filters, in submission order.
    pub filters: Vec<FilterEntry>,
    /// Field name to sort by, optionally as `Label.property`.
    pub sort: Option<String>,
    pub sort_reverse: bool,
    /// 1-based page number; takes effect together with `per`.
    pub page: Option<usize>,
    pub per: Option<usize>,
}

/// One submitted filter row.
#[derive(Debug, Clone, PartialEq)]
pub struct FilterEntry {
    pub field: String,
    pub operator: String,
    pub value: Value,
}

impl QueryOptions {
    /// Parse the UI's JSON payload. Filters arrive keyed by field name, each
    /// holding one entry per filter row:
    ///
    /// ```json
    /// {
    ///   "query": "jets",
    ///   "filters": {"name": {"0001": {"v": "east", "o": "like"}}},
    ///   "sort": "name",
    ///   "sort_reverse": "true",
    ///   "page": 2,
    ///   "per": 20
    /// }
    /// ```
    pub fn from_json(input: &Value) -> Self {
        let mut options = QueryOptions::default();
        let Some(map) = input.as_object() else {
            debug!("options payload is not an object; using defaults");
            return options;
        };

        options.limit = map.get("limit").and_then(parse_count);
        options.bulk_ids = map.get("bulk_ids").and_then(Value::as_array).cloned();
        options.query = map
            .get("query")
            .and_then(Value::as_str)
            .filter(|q| !q.is_empty())
            .map(str::to_string);
        options.filters = map.get("filters").map(parse_filters).unwrap_or_default();
        options.sort = map
            .get("sort")
            .and_then(Value::as_str)
            .filter(|s| !s.is_empty())
            .map(str::to_string);
        options.sort_reverse = map.get("sort_reverse").map(truthy).unwrap_or(false);
        options.page = map.get("page").and_then(parse_count);
        options.per = map.get("per").and_then(parse_count);
        options
    }

    /// Copy with row slicing removed; counting composes this form so a
    /// dropdown limit or current page never skews totals.
    pub fn without_slicing(&self) -> Self {
        let mut options = self.clone();
        options.limit = None;
        options.page = None;
        options
    }
}

fn parse_count(value: &Value) -> Option<usize> {
    match value {
        Value::Number(n) => n.as_u64().map(|n| n as usize),
        Value::String(s) => s.parse().ok(),
        // `false` explicitly clears a previously-set option.
        _ => None,
    }
}

fn truthy(value: &Value) -> bool {
    match value {
        Value::Bool(b) => *b,
        Value::String(s) => s == "true",
        _ => false,
    }
}

fn parse_filters(value: &Value) -> Vec<FilterEntry> {
    let mut entries = Vec::new();
    let Some(fields) = value.as_object() else {
        debug!("filters payload is not an object; ignoring");
        return entries;
    };

    for (field, submissions) in fields {
        let Some(submissions) = submissions.as_object() else {
            debug!("filter rows for `{field}` are not an object; ignoring");
            continue;
        };
        for submission in submissions.values() {
            let Some(row) = submission.as_object() else {
                debug!("skipping malformed filter row for `{field}`");
                continue;
            };
            let operator = row
                .get("o")
                .and_then(Value::as_str)
                .unwrap_or("default")
                .to_string();
            let value = row.get("v").cloned().unwrap_or(Value::Null);
            entries.push(FilterEntry {
                field: field.clone(),
                operator,
                value,
            });
        }
    }
    entries
}
