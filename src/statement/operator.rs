use std::fmt;

use serde::{Deserialize, Serialize};

/// Filter operators accepted from the admin UI.
///
/// The UI submits operators as plain strings; unrecognized strings are not an
/// error — they simply produce no constraint (see the statement builder).
/// Unary operators carry their own semantics and ignore the filter value;
/// they can arrive in the operator slot or, for dropdown-driven fields, in
/// the value slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum FilterOperator {
    /// Substring match, the UI default.
    Default,
    /// Alias of `Default` for explicit "like" submissions.
    Like,
    StartsWith,
    EndsWith,
    /// Exact match; the UI sends either `is` or `=`.
    Is,
    /// Numeric range; bounds travel in the value array.
    Between,
    /// Null or empty string.
    Blank,
    /// Neither null nor empty string.
    Present,
    Null,
    NotNull,
    Empty,
    NotEmpty,
    /// Sent for filter rows the user disabled; always yields no constraint.
    Discard,
}

impl FilterOperator {
    /// Parse the UI's string form. Returns `None` for unknown operators.
    pub fn parse(raw: &str) -> Option<Self> {
        match raw {
            "default" => Some(Self::Default),
            "like" => Some(Self::Like),
            "starts_with" => Some(Self::StartsWith),
            "ends_with" => Some(Self::EndsWith),
            "is" | "=" => Some(Self::Is),
            "between" => Some(Self::Between),
            "_blank" => Some(Self::Blank),
            "_present" => Some(Self::Present),
            "_null" => Some(Self::Null),
            "_not_null" => Some(Self::NotNull),
            "_empty" => Some(Self::Empty),
            "_not_empty" => Some(Self::NotEmpty),
            "_discard" => Some(Self::Discard),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Default => "default",
            Self::Like => "like",
            Self::StartsWith => "starts_with",
            Self::EndsWith => "ends_with",
            Self::Is => "is",
            Self::Between => "between",
            Self::Blank => "_blank",
            Self::Present => "_present",
            Self::Null => "_null",
            Self::NotNull => "_not_null",
            Self::Empty => "_empty",
            Self::NotEmpty => "_not_empty",
            Self::Discard => "_discard",
        }
    }

    /// Whether this operator tests null/empty state and ignores the value.
    pub fn is_unary(&self) -> bool {
        matches!(
            self,
            Self::Blank | Self::Present | Self::Null | Self::NotNull | Self::Empty | Self::NotEmpty
        )
    }
}

impl fmt::Display for FilterOperator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<String> for FilterOperator {
    type Error = String;

    fn try_from(raw: String) -> Result<Self, Self::Error> {
        Self::parse(&raw).ok_or_else(|| format!("unknown filter operator `{}`", raw))
    }
}

impl From<FilterOperator> for String {
    fn from(op: FilterOperator) -> Self {
        op.as_str().to_string()
    }
}
