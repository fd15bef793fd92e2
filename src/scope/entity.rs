use std::fmt;

use serde_json::Value;

use super::errors::StoreError;

/// A fetched node, owned by whichever store produced it. The adapter reads
/// attributes by property name and can ask the node to delete itself; it
/// never assumes anything else about the backing representation.
pub trait NodeHandle: fmt::Debug + Send + Sync {
    /// Property value by name; `None` when the node has no such property.
    fn attribute(&self, name: &str) -> Option<Value>;

    /// Remove the node from its store. Implementations decide whether
    /// relationships go with it.
    fn destroy(&self) -> Result<(), StoreError>;
}
