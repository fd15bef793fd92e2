//! In-memory [`GraphStore`] for tests and embedded use.
//!
//! Honors the full query contract — predicates, order, skip, limit — by
//! evaluating fragments structurally, so adapter behavior can be exercised
//! without a running database. Nodes automatically receive a `uuid`
//! property, matching the primary-key convention of the configured models.

use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use serde_json::Value;
use uuid::Uuid;

use crate::scope::{GraphStore, NodeHandle, NodeQuery, SortDirection, StoreError};
use crate::statement::compare_values;

type Rows = HashMap<String, Vec<StoredNode>>;

#[derive(Debug, Clone)]
struct StoredNode {
    uuid: String,
    props: serde_json::Map<String, Value>,
}

/// Shared, thread-safe node storage keyed by label. Cloning yields another
/// handle onto the same storage.
#[derive(Debug, Clone, Default)]
pub struct MemoryGraph {
    rows: Arc<RwLock<Rows>>,
}

impl MemoryGraph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a node with the given properties (a JSON object; anything else
    /// is treated as no properties). Generates a `uuid` property when the
    /// object does not carry one, and returns the node's uuid.
    pub fn insert(&self, label: &str, props: Value) -> String {
        let mut map = match props {
            Value::Object(map) => map,
            _ => serde_json::Map::new(),
        };
        let uuid = map
            .get("uuid")
            .and_then(Value::as_str)
            .map(str::to_string)
            .unwrap_or_else(|| Uuid::new_v4().to_string());
        map.insert("uuid".to_string(), Value::String(uuid.clone()));

        self.rows
            .write()
            .expect("memory store lock poisoned")
            .entry(label.to_string())
            .or_default()
            .push(StoredNode {
                uuid: uuid.clone(),
                props: map,
            });
        uuid
    }

    /// Remove one node by label and uuid. Returns whether anything was
    /// removed; removing an already-deleted node is not an error.
    pub fn remove(&self, label: &str, uuid: &str) -> bool {
        let mut rows = self.rows.write().expect("memory store lock poisoned");
        match rows.get_mut(label) {
            Some(nodes) => {
                let before = nodes.len();
                nodes.retain(|node| node.uuid != uuid);
                nodes.len() != before
            }
            None => false,
        }
    }

    /// Number of stored nodes carrying `label`.
    pub fn node_count(&self, label: &str) -> usize {
        self.rows
            .read()
            .expect("memory store lock poisoned")
            .get(label)
            .map(Vec::len)
            .unwrap_or(0)
    }

    fn matching_handles(&self, query: &NodeQuery) -> Vec<MemoryNode> {
        let rows = self.rows.read().expect("memory store lock poisoned");
        let Some(nodes) = rows.get(&query.label) else {
            return Vec::new();
        };

        nodes
            .iter()
            .map(|node| MemoryNode {
                graph: self.clone(),
                label: query.label.clone(),
                uuid: node.uuid.clone(),
                props: node.props.clone(),
            })
            .filter(|node| query.predicates.iter().all(|p| p.matches(node)))
            .collect()
    }
}

impl GraphStore for MemoryGraph {
    fn fetch(&self, query: &NodeQuery) -> Result<Vec<Box<dyn NodeHandle>>, StoreError> {
        let mut handles = self.matching_handles(query);

        if let Some((property, direction)) = &query.order {
            handles.sort_by(|a, b| {
                let left = a.attribute(property);
                let right = b.attribute(property);
                let ordering = compare_values(left.as_ref(), right.as_ref());
                match direction {
                    SortDirection::Asc => ordering,
                    SortDirection::Desc => ordering.reverse(),
                }
            });
        }
        if let Some(skip) = query.skip {
            handles.drain(..skip.min(handles.len()));
        }
        if let Some(limit) = query.limit {
            handles.truncate(limit);
        }

        Ok(handles
            .into_iter()
            .map(|handle| Box::new(handle) as Box<dyn NodeHandle>)
            .collect())
    }

    fn count(&self, query: &NodeQuery) -> Result<u64, StoreError> {
        Ok(self.matching_handles(query).len() as u64)
    }
}

/// A node fetched from a [`MemoryGraph`]. Holds a snapshot of the properties
/// and a handle back to the storage so `destroy` works.
#[derive(Debug, Clone)]
pub struct MemoryNode {
    graph: MemoryGraph,
    label: String,
    uuid: String,
    props: serde_json::Map<String, Value>,
}

impl NodeHandle for MemoryNode {
    fn attribute(&self, name: &str) -> Option<Value> {
        self.props.get(name).cloned()
    }

    fn destroy(&self) -> Result<(), StoreError> {
        self.graph.remove(&self.label, &self.uuid);
        Ok(())
    }
}
