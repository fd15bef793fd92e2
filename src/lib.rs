//! Admingraph - admin query adapter for property-graph stores
//!
//! This crate translates the declarative query surface of an admin UI
//! (free-text search, per-field filters, sort, pagination, bulk actions)
//! into parameterized graph queries:
//! - Typed predicate fragments instead of statement text
//! - Filters that reach through associations via key-membership sub-queries
//! - One scope interface over deferred store queries and in-memory row sets
//! - A YAML model catalog describing fields and associations
//!
//! The store itself stays behind the [`scope::GraphStore`] trait; the
//! [`testing`] module ships an in-memory implementation.

pub mod adapter;
pub mod metadata;
pub mod scope;
pub mod statement;
pub mod testing;

pub use adapter::{FilterEntry, GraphAdapter, QueryError, QueryOptions, WhereBuilder};
pub use metadata::{CatalogConfig, MetadataError, ModelCatalog, ModelSchema};
pub use scope::{CypherStatement, GraphStore, NodeHandle, NodeQuery, Scope, StoreError};
pub use statement::{build_statement, FilterOperator, Fragment};
