use thiserror::Error;

/// Failures surfaced by a graph store while executing a query or mutating a
/// node. Drivers construct these; everything above only propagates them.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("graph store backend failure: {0}")]
    Backend(#[source] Box<dyn std::error::Error + Send + Sync>),
    #[error("graph store rejected the statement: {0}")]
    MalformedQuery(String),
}

impl StoreError {
    /// Wrap any driver error as a backend failure.
    pub fn backend(error: impl Into<Box<dyn std::error::Error + Send + Sync>>) -> Self {
        StoreError::Backend(error.into())
    }
}
