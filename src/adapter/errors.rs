use thiserror::Error;

use crate::metadata::{AssociationKind, MetadataError};
use crate::scope::StoreError;

/// Errors raised while composing or executing admin queries.
#[derive(Debug, Error)]
pub enum QueryError {
    /// Single-node statements bind one alias; a column on another
    /// collection cannot appear in ORDER BY.
    #[error("cannot sort `{model}` by `{column}`: the column belongs to `{collection}`")]
    CrossCollectionSort {
        model: String,
        column: String,
        collection: String,
    },
    /// Sort keys must name the model's primary key or one of its catalog
    /// fields; request input never reaches statement text as an identifier.
    #[error("cannot sort `{model}` by `{column}`: not a sortable column")]
    UnknownSortColumn { model: String, column: String },
    /// Cross-collection filters rewrite through one foreign/primary key
    /// pair; a many-to-many association has none.
    #[error("association `{association}` on `{model}` is {kind}; filters cannot rewrite through it")]
    UnsupportedAssociationKind {
        association: String,
        model: String,
        kind: AssociationKind,
    },
    #[error(transparent)]
    Store(#[from] StoreError),
    #[error(transparent)]
    Metadata(#[from] MetadataError),
}
