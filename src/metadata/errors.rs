//! Error types for catalog lookup and configuration loading.

use thiserror::Error;

#[derive(Debug, Clone, Error, PartialEq)]
pub enum MetadataError {
    #[error("No model found for label `{label}`")]
    UnknownModel { label: String },
    #[error("Invalid identifier `{name}`: {reason}")]
    InvalidIdentifier { name: String, reason: String },
    #[error("Invalid searchable column `{spec}`: expected `property` or `Label.property`")]
    InvalidColumnSpec { spec: String },
    #[error("Failed to read catalog file: {error}")]
    ConfigRead { error: String },
    #[error("Failed to parse catalog: {error}")]
    ConfigParse { error: String },
    #[error("Invalid catalog: {message}")]
    InvalidConfig { message: String },
    #[error("Catalog validation error: {0}")]
    Validation(#[from] validator::ValidationErrors),
}

impl MetadataError {
    /// Attach the model label to an identifier error raised while building
    /// that model's entry.
    pub fn identifier_in_model(name: impl Into<String>, label: &str, reason: &str) -> Self {
        MetadataError::InvalidIdentifier {
            name: name.into(),
            reason: format!("{reason} (model `{label}`)"),
        }
    }
}
