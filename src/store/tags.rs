//! Tag resolution and the document/tag association table.

use std::collections::{HashMap, HashSet};

use tracing::debug;

use crate::error::{StoreError, StoreResult};
use crate::models::tag_key;
use crate::{
    Document, DocumentId, DocumentTag, DocumentTagId, EntityKind, Tag, TagId, TagUsage, UserId,
};

use super::{IdAllocator, Store, Tables};

fn empty_tag_name() -> StoreError {
    StoreError::InvalidValue {
        kind: EntityKind::Tag,
        field: "name",
        reason: "must not be empty",
    }
}

impl Tables {
    /// Returns the tag whose name matches `name` ignoring case, creating it
    /// if none exists. An existing tag is returned unchanged.
    pub(super) fn resolve_tag(&mut self, ids: &IdAllocator, name: &str) -> StoreResult<Tag> {
        let key = tag_key(name);
        if key.is_empty() {
            return Err(empty_tag_name());
        }

        if let Some(&id) = self.tag_names.get(&key)
            && let Some(tag) = self.tags.get(id)
        {
            return Ok(tag.clone());
        }

        let id = TagId::new(ids.next_id(EntityKind::Tag));
        let tag = Tag::new(id, name.trim());
        self.tags.put(id, tag.clone());
        self.tag_names.insert(key, id);

        debug!(tag_id = %id, name = %tag.name(), "created tag");
        Ok(tag)
    }

    /// Attaches `tag` to `document`, returning the existing join row if the
    /// pair is already associated.
    pub(super) fn attach_tag(
        &mut self,
        ids: &IdAllocator,
        document: DocumentId,
        tag: TagId,
    ) -> StoreResult<DocumentTag> {
        if !self.documents.contains(document) {
            return Err(StoreError::invalid_reference(EntityKind::Document, document.get()));
        }
        if !self.tags.contains(tag) {
            return Err(StoreError::invalid_reference(EntityKind::Tag, tag.get()));
        }

        if let Some(existing) = self
            .document_tags
            .find(|dt| dt.document_id == document && dt.tag_id == tag)
        {
            return Ok(*existing);
        }

        let id = DocumentTagId::new(ids.next_id(EntityKind::DocumentTag));
        let row = DocumentTag {
            id,
            document_id: document,
            tag_id: tag,
        };
        self.document_tags.put(id, row);

        debug!(document_id = %document, tag_id = %tag, "attached tag");
        Ok(row)
    }

    /// Tags attached to `document`, in the order they were attached.
    pub(super) fn tags_of(&self, document: DocumentId) -> Vec<Tag> {
        let mut rows = self
            .document_tags
            .list_where(|dt| dt.document_id == document);
        rows.sort_by_key(|dt| dt.id);

        rows.iter()
            .filter_map(|dt| self.tags.get(dt.tag_id).cloned())
            .collect()
    }
}

impl Store {
    /// Gets or creates a tag by name, ignoring case.
    ///
    /// The stored name keeps the casing of the first variant resolved.
    ///
    /// # Examples
    ///
    /// ```
    /// use docgraph::Store;
    ///
    /// # fn main() -> Result<(), docgraph::StoreError> {
    /// let store = Store::new();
    /// let first = store.get_or_create_tag("Research")?;
    /// let again = store.get_or_create_tag("RESEARCH")?;
    ///
    /// assert_eq!(first.id(), again.id());
    /// assert_eq!(again.name(), "Research");
    /// # Ok(())
    /// # }
    /// ```
    pub fn get_or_create_tag(&self, name: &str) -> StoreResult<Tag> {
        self.tables.write().resolve_tag(&self.ids, name)
    }

    pub fn get_tag(&self, id: TagId) -> Option<Tag> {
        self.tables.read().tags.get(id).cloned()
    }

    /// Looks up a tag by name without creating it.
    pub fn find_tag(&self, name: &str) -> Option<Tag> {
        let tables = self.tables.read();
        tables
            .tag_names
            .get(&tag_key(name))
            .and_then(|&id| tables.tags.get(id))
            .cloned()
    }

    /// Returns every tag ordered by case-folded name.
    pub fn list_tags(&self) -> Vec<Tag> {
        let mut tags = self.tables.read().tags.list_where(|_| true);
        tags.sort_by_cached_key(|t| (t.key(), t.id()));
        tags
    }

    /// Associates a tag with a document. Calling it twice for the same
    /// pair returns the same row.
    pub fn add_tag_to_document(
        &self,
        document: DocumentId,
        tag: TagId,
    ) -> StoreResult<DocumentTag> {
        self.tables.write().attach_tag(&self.ids, document, tag)
    }

    /// Removes the association between a document and a tag.
    ///
    /// Returns false if the pair was not associated.
    pub fn remove_tag_from_document(&self, document: DocumentId, tag: TagId) -> bool {
        let removed = self
            .tables
            .write()
            .document_tags
            .retain(|dt| !(dt.document_id == document && dt.tag_id == tag));

        if removed > 0 {
            debug!(document_id = %document, tag_id = %tag, "detached tag");
        }
        removed > 0
    }

    /// Resolves each name to a tag and attaches it to `document`.
    ///
    /// Names differing only in case resolve to one tag. Returns the distinct
    /// tags in first-seen order. The document must exist; nothing is
    /// written if it does not.
    pub fn tag_document<S: AsRef<str>>(
        &self,
        document: DocumentId,
        names: &[S],
    ) -> StoreResult<Vec<Tag>> {
        let mut tables = self.tables.write();
        if !tables.documents.contains(document) {
            return Err(StoreError::invalid_reference(EntityKind::Document, document.get()));
        }
        if names.iter().any(|n| tag_key(n.as_ref()).is_empty()) {
            return Err(empty_tag_name());
        }

        let mut seen = HashSet::new();
        let mut tags = Vec::new();
        for name in names {
            let tag = tables.resolve_tag(&self.ids, name.as_ref())?;
            tables.attach_tag(&self.ids, document, tag.id())?;
            if seen.insert(tag.id()) {
                tags.push(tag);
            }
        }
        Ok(tags)
    }

    /// Returns the tags attached to a document, in attach order.
    pub fn document_tags(&self, document: DocumentId) -> StoreResult<Vec<Tag>> {
        let tables = self.tables.read();
        if !tables.documents.contains(document) {
            return Err(StoreError::not_found(EntityKind::Document, document.get()));
        }
        Ok(tables.tags_of(document))
    }

    /// Returns the documents carrying `tag`, ordered by id.
    pub fn documents_with_tag(&self, tag: TagId) -> StoreResult<Vec<Document>> {
        let tables = self.tables.read();
        if !tables.tags.contains(tag) {
            return Err(StoreError::not_found(EntityKind::Tag, tag.get()));
        }

        let mut documents: Vec<Document> = tables
            .document_tags
            .values()
            .filter(|dt| dt.tag_id == tag)
            .filter_map(|dt| tables.documents.get(dt.document_id).cloned())
            .collect();
        documents.sort_by_key(|d| d.id);
        Ok(documents)
    }

    /// Counts how many documents carry each tag.
    ///
    /// With an owner, only that user's documents are counted and unused
    /// tags are left out. Without one, every tag is listed. Sorted by count
    /// descending, then by name.
    pub fn tag_usage(&self, owner: Option<UserId>) -> Vec<TagUsage> {
        let tables = self.tables.read();

        let mut counts: HashMap<TagId, usize> = HashMap::new();
        for dt in tables.document_tags.values() {
            let counted = match owner {
                Some(owner) => tables
                    .documents
                    .get(dt.document_id)
                    .is_some_and(|d| d.owner == owner),
                None => true,
            };
            if counted {
                *counts.entry(dt.tag_id).or_default() += 1;
            }
        }

        let mut usage: Vec<TagUsage> = tables
            .tags
            .values()
            .map(|tag| TagUsage {
                tag: tag.clone(),
                document_count: counts.get(&tag.id()).copied().unwrap_or(0),
            })
            .filter(|u| owner.is_none() || u.document_count > 0)
            .collect();

        usage.sort_by(|a, b| {
            b.document_count
                .cmp(&a.document_count)
                .then_with(|| a.tag.key().cmp(&b.tag.key()))
                .then_with(|| a.tag.id().cmp(&b.tag.id()))
        });
        usage
    }
}
