use serde::{Deserialize, Serialize};

use super::{DocumentId, LinkId};

/// Strength given to a link when the detector did not report one.
pub const DEFAULT_STRENGTH: u32 = 1;

/// A typed, weighted relationship asserted from one document to another.
///
/// Rows are directed as stored so the asserting side is preserved, but two
/// rows between the same documents in opposite directions describe the same
/// relationship. The graph index collapses them at read time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SemanticLink {
    pub id: LinkId,
    pub source: DocumentId,
    pub target: DocumentId,
    /// Free-form relationship type; the store does not check a vocabulary.
    pub link_type: String,
    /// Always positive.
    pub strength: u32,
}

impl SemanticLink {
    /// Returns true if `document` is either endpoint.
    pub fn touches(&self, document: DocumentId) -> bool {
        self.source == document || self.target == document
    }

    /// Returns the endpoints as an unordered pair, smaller id first.
    pub fn pair(&self) -> (DocumentId, DocumentId) {
        pair_key(self.source, self.target)
    }
}

/// Orders two document ids into an unordered pair key.
pub fn pair_key(a: DocumentId, b: DocumentId) -> (DocumentId, DocumentId) {
    (a.min(b), a.max(b))
}

/// Input for creating a semantic link.
///
/// # Examples
///
/// ```
/// use docgraph::{DocumentId, NewLink};
///
/// let link = NewLink::new(DocumentId::new(1), DocumentId::new(2), "extends");
/// assert_eq!(link.strength, None);
///
/// let strong = link.with_strength(8);
/// assert_eq!(strong.strength, Some(8));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewLink {
    pub source: DocumentId,
    pub target: DocumentId,
    pub link_type: String,
    /// Defaults to [`DEFAULT_STRENGTH`] when absent.
    #[serde(default)]
    pub strength: Option<u32>,
}

impl NewLink {
    pub fn new(source: DocumentId, target: DocumentId, link_type: impl Into<String>) -> Self {
        Self {
            source,
            target,
            link_type: link_type.into(),
            strength: None,
        }
    }

    pub fn with_strength(mut self, strength: u32) -> Self {
        self.strength = Some(strength);
        self
    }
}

/// Update for an existing link. Only type and strength can change.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LinkUpdate {
    pub link_type: Option<String>,
    pub strength: Option<u32>,
}
