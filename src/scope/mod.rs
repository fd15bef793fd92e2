//! Query scopes: a deferred, driver-backed query and an already-fetched row
//! set behind one interface. Every operation is available on both; the
//! store-backed variant accumulates into a [`NodeQuery`] while the
//! pre-materialized variant works on the rows it holds, so callers compose
//! without caring which they were given.

pub mod entity;
pub mod errors;
pub mod store;

use std::fmt;
use std::sync::Arc;

pub use entity::NodeHandle;
pub use errors::StoreError;
pub use store::{CypherStatement, GraphStore, NodeQuery, SortDirection, NODE_ALIAS};

use crate::statement::{compare_values, Fragment};

/// A composable node query. `where_fragment`, `order`, `skip` and `limit`
/// stack in any order; `count`, `first` and `materialize` resolve the scope.
pub enum Scope {
    Store(StoreScope),
    Memory(MemoryScope),
}

impl Scope {
    /// Deferred scope over every node carrying `label`.
    pub fn store(store: Arc<dyn GraphStore>, label: impl Into<String>) -> Self {
        Scope::Store(StoreScope {
            store,
            query: NodeQuery::new(label),
        })
    }

    /// Scope over rows that were already fetched (or constructed) elsewhere.
    pub fn memory(rows: Vec<Box<dyn NodeHandle>>) -> Self {
        Scope::Memory(MemoryScope {
            rows,
            skip: None,
            limit: None,
        })
    }

    /// Whether this scope holds concrete rows instead of a deferred query.
    pub fn is_materialized(&self) -> bool {
        matches!(self, Scope::Memory(_))
    }

    /// The accumulated query of a deferred scope, if that is what this is.
    pub fn as_store_query(&self) -> Option<&NodeQuery> {
        match self {
            Scope::Store(scope) => Some(&scope.query),
            Scope::Memory(_) => None,
        }
    }

    /// Restrict to nodes matching `fragment`. Deferred scopes conjoin it
    /// with earlier predicates; pre-materialized scopes evaluate it now.
    pub fn where_fragment(self, fragment: Fragment) -> Self {
        match self {
            Scope::Store(mut scope) => {
                scope.query.predicates.push(fragment);
                Scope::Store(scope)
            }
            Scope::Memory(mut scope) => {
                scope.rows.retain(|row| fragment.matches(row.as_ref()));
                Scope::Memory(scope)
            }
        }
    }

    pub fn order(self, property: &str, direction: SortDirection) -> Self {
        match self {
            Scope::Store(mut scope) => {
                scope.query.order = Some((property.to_string(), direction));
                Scope::Store(scope)
            }
            Scope::Memory(mut scope) => {
                scope.rows.sort_by(|a, b| {
                    let ordering =
                        compare_values(a.attribute(property).as_ref(), b.attribute(property).as_ref());
                    match direction {
                        SortDirection::Asc => ordering,
                        SortDirection::Desc => ordering.reverse(),
                    }
                });
                Scope::Memory(scope)
            }
        }
    }

    /// Keep at most `n` rows. On pre-materialized scopes the slice applies
    /// when the scope resolves, after any later `where_fragment`, matching
    /// how a deferred query applies LIMIT after WHERE.
    pub fn limit(self, n: usize) -> Self {
        match self {
            Scope::Store(mut scope) => {
                scope.query.limit = Some(n);
                Scope::Store(scope)
            }
            Scope::Memory(mut scope) => {
                scope.limit = Some(n);
                Scope::Memory(scope)
            }
        }
    }

    /// Skip the first `n` rows, with the same deferred behavior as
    /// [`Scope::limit`].
    pub fn skip(self, n: usize) -> Self {
        match self {
            Scope::Store(mut scope) => {
                scope.query.skip = Some(n);
                Scope::Store(scope)
            }
            Scope::Memory(mut scope) => {
                scope.skip = Some(n);
                Scope::Memory(scope)
            }
        }
    }

    /// Number of matching rows, ignoring any order or slice.
    pub fn count(&self) -> Result<u64, StoreError> {
        match self {
            Scope::Store(scope) => scope.store.count(&scope.query),
            Scope::Memory(scope) => Ok(scope.rows.len() as u64),
        }
    }

    /// Resolve and return the first row, if any.
    pub fn first(self) -> Result<Option<Box<dyn NodeHandle>>, StoreError> {
        match self {
            Scope::Store(mut scope) => {
                scope.query.limit = Some(1);
                let mut rows = scope.store.fetch(&scope.query)?;
                Ok(if rows.is_empty() {
                    None
                } else {
                    Some(rows.remove(0))
                })
            }
            Scope::Memory(scope) => Ok(scope.resolve().into_iter().next()),
        }
    }

    /// Resolve the scope into concrete rows.
    pub fn materialize(self) -> Result<Vec<Box<dyn NodeHandle>>, StoreError> {
        match self {
            Scope::Store(scope) => scope.store.fetch(&scope.query),
            Scope::Memory(scope) => Ok(scope.resolve()),
        }
    }
}

impl fmt::Debug for Scope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Scope::Store(scope) => f
                .debug_struct("StoreScope")
                .field("query", &scope.query)
                .finish_non_exhaustive(),
            Scope::Memory(scope) => f
                .debug_struct("MemoryScope")
                .field("rows", &scope.rows.len())
                .field("skip", &scope.skip)
                .field("limit", &scope.limit)
                .finish(),
        }
    }
}

/// Deferred query plus the store that will eventually run it.
pub struct StoreScope {
    store: Arc<dyn GraphStore>,
    query: NodeQuery,
}

/// Rows held in memory, with any slice kept pending until resolution.
pub struct MemoryScope {
    rows: Vec<Box<dyn NodeHandle>>,
    skip: Option<usize>,
    limit: Option<usize>,
}

impl MemoryScope {
    fn resolve(self) -> Vec<Box<dyn NodeHandle>> {
        let mut rows = self.rows;
        if let Some(skip) = self.skip {
            rows = rows.split_off(skip.min(rows.len()));
        }
        if let Some(limit) = self.limit {
            rows.truncate(limit);
        }
        rows
    }
}
