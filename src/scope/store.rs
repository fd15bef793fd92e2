use std::collections::HashMap;
use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::entity::NodeHandle;
use super::errors::StoreError;
use crate::statement::{Fragment, ParamBinder};

/// Alias the rendered statement binds the matched node to. Single-node
/// queries only; every property reference renders as `n.<property>`.
pub const NODE_ALIAS: &str = "n";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    Asc,
    Desc,
}

impl SortDirection {
    pub fn as_cypher(&self) -> &'static str {
        match self {
            SortDirection::Asc => "ASC",
            SortDirection::Desc => "DESC",
        }
    }
}

impl fmt::Display for SortDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_cypher())
    }
}

/// Accumulated description of one single-label query: which nodes to match,
/// how to order them, and which slice to return. Stores receive this intact;
/// text-protocol drivers render it with [`NodeQuery::to_cypher`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NodeQuery {
    pub label: String,
    /// Conjunction of predicates; empty means match every node.
    pub predicates: Vec<Fragment>,
    pub order: Option<(String, SortDirection)>,
    pub limit: Option<usize>,
    pub skip: Option<usize>,
}

impl NodeQuery {
    pub fn new(label: impl Into<String>) -> Self {
        NodeQuery {
            label: label.into(),
            predicates: Vec::new(),
            order: None,
            limit: None,
            skip: None,
        }
    }

    /// Render as a row-returning statement plus its parameter bindings.
    /// Values never appear in the text; they all travel through the map.
    /// Parameter names are sequential in rendering order, so rendering the
    /// same query twice yields identical text and bindings.
    pub fn to_cypher(&self) -> CypherStatement {
        let mut binder = ParamBinder::new();
        let mut statement = self.render_match(&mut binder);

        statement.push_str(&format!(" RETURN {NODE_ALIAS}"));
        if let Some((property, direction)) = &self.order {
            statement.push_str(&format!(" ORDER BY {NODE_ALIAS}.{property} {direction}"));
        }
        if let Some(skip) = self.skip {
            statement.push_str(&format!(" SKIP {skip}"));
        }
        if let Some(limit) = self.limit {
            statement.push_str(&format!(" LIMIT {limit}"));
        }

        CypherStatement {
            statement,
            params: binder.into_params(),
        }
    }

    /// Render as a count over the matched set. Ordering and slicing do not
    /// apply to counting and are left out.
    pub fn to_cypher_count(&self) -> CypherStatement {
        let mut binder = ParamBinder::new();
        let mut statement = self.render_match(&mut binder);
        statement.push_str(&format!(" RETURN count({NODE_ALIAS}) AS count"));

        CypherStatement {
            statement,
            params: binder.into_params(),
        }
    }

    fn render_match(&self, binder: &mut ParamBinder) -> String {
        let mut statement = format!("MATCH ({NODE_ALIAS}:`{}`)", self.label);
        if !self.predicates.is_empty() {
            let rendered: Vec<String> = self
                .predicates
                .iter()
                .map(|predicate| predicate.to_cypher(NODE_ALIAS, binder))
                .collect();
            statement.push_str(" WHERE ");
            statement.push_str(&rendered.join(" AND "));
        }
        statement
    }
}

/// A rendered statement and the values bound to its placeholders.
#[derive(Debug, Clone, PartialEq)]
pub struct CypherStatement {
    pub statement: String,
    pub params: HashMap<String, Value>,
}

/// Seam between query composition and an actual graph database. The adapter
/// builds [`NodeQuery`] values; a driver implementing this trait decides how
/// to execute them (over Bolt, HTTP, or entirely in memory).
pub trait GraphStore: Send + Sync {
    /// Execute `query` and return the matched nodes, ordered and sliced as
    /// the query asks.
    fn fetch(&self, query: &NodeQuery) -> Result<Vec<Box<dyn NodeHandle>>, StoreError>;

    /// Count the nodes `query` matches, ignoring any order or slice.
    fn count(&self, query: &NodeQuery) -> Result<u64, StoreError>;
}
