use serde::{Deserialize, Serialize};

use super::{DocumentId, DocumentTagId, TagId};

/// A tag shared across all users.
///
/// Tag names are unique under case-insensitive comparison. The stored name
/// keeps the casing of whichever variant was resolved first.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tag {
    id: TagId,
    name: String,
}

impl Tag {
    /// Creates a new tag.
    ///
    /// # Examples
    ///
    /// ```
    /// use docgraph::{Tag, TagId};
    ///
    /// let tag = Tag::new(TagId::new(1), "Research");
    /// assert_eq!(tag.id(), TagId::new(1));
    /// assert_eq!(tag.name(), "Research");
    /// ```
    pub fn new(id: TagId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
        }
    }

    /// Returns the tag's unique identifier.
    pub fn id(&self) -> TagId {
        self.id
    }

    /// Returns the tag name as first stored.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the key used for case-insensitive uniqueness.
    pub fn key(&self) -> String {
        tag_key(&self.name)
    }
}

/// Folds a tag name to its uniqueness key.
pub(crate) fn tag_key(name: &str) -> String {
    name.trim().to_lowercase()
}

/// Join row associating a tag with a document.
///
/// At most one row exists per `(document_id, tag_id)` pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentTag {
    pub id: DocumentTagId,
    pub document_id: DocumentId,
    pub tag_id: TagId,
}

/// A tag with the number of documents it is attached to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TagUsage {
    pub tag: Tag,
    pub document_count: usize,
}
