use serde::{Deserialize, Serialize};
use std::fmt;

/// The kinds of entity the store keeps a table for.
///
/// Used by the identity allocator to keep one counter per kind and by
/// errors to name the table an id was looked up in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntityKind {
    User,
    Document,
    Tag,
    DocumentTag,
    SemanticLink,
    Ontology,
    Priority,
}

impl EntityKind {
    /// Number of entity kinds.
    pub const COUNT: usize = 7;

    /// All kinds, in allocator slot order.
    pub const ALL: [EntityKind; Self::COUNT] = [
        EntityKind::User,
        EntityKind::Document,
        EntityKind::Tag,
        EntityKind::DocumentTag,
        EntityKind::SemanticLink,
        EntityKind::Ontology,
        EntityKind::Priority,
    ];

    /// Index of this kind's counter in the allocator.
    pub(crate) fn slot(self) -> usize {
        match self {
            Self::User => 0,
            Self::Document => 1,
            Self::Tag => 2,
            Self::DocumentTag => 3,
            Self::SemanticLink => 4,
            Self::Ontology => 5,
            Self::Priority => 6,
        }
    }
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::User => "user",
            Self::Document => "document",
            Self::Tag => "tag",
            Self::DocumentTag => "document_tag",
            Self::SemanticLink => "semantic_link",
            Self::Ontology => "ontology",
            Self::Priority => "priority",
        };
        write!(f, "{s}")
    }
}
