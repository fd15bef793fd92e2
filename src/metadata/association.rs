use std::fmt;

use serde::{Deserialize, Serialize};

/// Cardinality of an association between two models. Cross-collection
/// filters support the first two; many-to-many has no single key pair to
/// rewrite through and is rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AssociationKind {
    HasOne,
    HasMany,
    ManyToMany,
}

impl AssociationKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            AssociationKind::HasOne => "has_one",
            AssociationKind::HasMany => "has_many",
            AssociationKind::ManyToMany => "many_to_many",
        }
    }
}

impl fmt::Display for AssociationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A named association from one model to another.
///
/// Key roles depend on the kind. For `has_one`, `foreign_key` is the
/// referencing property on the owning model and `primary_key` is the
/// property read off matched target rows. For `has_many` the roles flip:
/// `primary_key` is the owning model's key and `foreign_key` is the
/// back-reference read off matched target rows.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AssociationDescriptor {
    /// Field name the admin UI uses to reach this association.
    pub name: String,
    pub kind: AssociationKind,
    /// Label of the associated collection.
    pub target: String,
    pub foreign_key: String,
    pub primary_key: String,
}

impl AssociationDescriptor {
    pub fn new(
        name: impl Into<String>,
        kind: AssociationKind,
        target: impl Into<String>,
        foreign_key: impl Into<String>,
        primary_key: impl Into<String>,
    ) -> Self {
        AssociationDescriptor {
            name: name.into(),
            kind,
            target: target.into(),
            foreign_key: foreign_key.into(),
            primary_key: primary_key.into(),
        }
    }
}
