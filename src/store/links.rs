use std::collections::HashSet;

use tracing::debug;

use crate::error::{StoreError, StoreResult};
use crate::{
    DEFAULT_STRENGTH, DocumentId, EntityKind, LinkId, LinkUpdate, NewLink, SemanticLink,
};

use super::{IdAllocator, Store, Tables};

fn validated_strength(strength: Option<u32>) -> StoreResult<u32> {
    match strength {
        Some(0) => Err(StoreError::InvalidValue {
            kind: EntityKind::SemanticLink,
            field: "strength",
            reason: "must be a positive integer",
        }),
        Some(strength) => Ok(strength),
        None => Ok(DEFAULT_STRENGTH),
    }
}

impl Tables {
    /// Checks a link's endpoints and strength without writing anything.
    fn check_link(&self, link: &NewLink) -> StoreResult<()> {
        for endpoint in [link.source, link.target] {
            if !self.documents.contains(endpoint) {
                return Err(StoreError::invalid_reference(
                    EntityKind::Document,
                    endpoint.get(),
                ));
            }
        }
        validated_strength(link.strength).map(|_| ())
    }

    fn insert_link(&mut self, ids: &IdAllocator, link: NewLink) -> StoreResult<SemanticLink> {
        self.check_link(&link)?;

        let id = LinkId::new(ids.next_id(EntityKind::SemanticLink));
        let row = SemanticLink {
            id,
            source: link.source,
            target: link.target,
            link_type: link.link_type,
            strength: validated_strength(link.strength)?,
        };
        self.links.put(id, row.clone());

        debug!(
            link_id = %id,
            source = %row.source,
            target = %row.target,
            strength = row.strength,
            "created link"
        );
        Ok(row)
    }

    /// Links whose endpoints both lie in `documents`, in creation order.
    pub(super) fn links_within(&self, documents: &HashSet<DocumentId>) -> Vec<SemanticLink> {
        let mut links = self
            .links
            .list_where(|l| documents.contains(&l.source) && documents.contains(&l.target));
        links.sort_by_key(|l| l.id);
        links
    }
}

impl Store {
    /// Records a semantic link between two existing documents.
    ///
    /// Strength defaults to 1; zero is rejected. Either direction may be
    /// stored, and both directions may coexist.
    pub fn create_link(&self, link: NewLink) -> StoreResult<SemanticLink> {
        self.tables.write().insert_link(&self.ids, link)
    }

    /// Records several links at once. If any link is rejected, none are
    /// stored.
    pub fn record_links(&self, links: Vec<NewLink>) -> StoreResult<Vec<SemanticLink>> {
        let mut tables = self.tables.write();
        for link in &links {
            tables.check_link(link)?;
        }

        links
            .into_iter()
            .map(|link| tables.insert_link(&self.ids, link))
            .collect()
    }

    /// Replaces every link asserted from `source` with `links`.
    ///
    /// Used when a document is re-analysed. Links asserted by other
    /// documents towards `source` are kept. Every replacement must have
    /// `source` as its source; on any rejection the old links stay.
    pub fn replace_links_from(
        &self,
        source: DocumentId,
        links: Vec<NewLink>,
    ) -> StoreResult<Vec<SemanticLink>> {
        let mut tables = self.tables.write();
        if !tables.documents.contains(source) {
            return Err(StoreError::not_found(EntityKind::Document, source.get()));
        }
        for link in &links {
            if link.source != source {
                return Err(StoreError::InvalidValue {
                    kind: EntityKind::SemanticLink,
                    field: "source",
                    reason: "does not match the document being re-linked",
                });
            }
            tables.check_link(link)?;
        }

        let removed = tables.links.retain(|l| l.source != source);
        debug!(document_id = %source, removed, "cleared outgoing links");

        links
            .into_iter()
            .map(|link| tables.insert_link(&self.ids, link))
            .collect()
    }

    pub fn get_link(&self, id: LinkId) -> Option<SemanticLink> {
        self.tables.read().links.get(id).cloned()
    }

    /// Changes a link's type and/or strength in place.
    pub fn update_link(&self, id: LinkId, update: LinkUpdate) -> StoreResult<SemanticLink> {
        let mut tables = self.tables.write();
        let link = tables
            .links
            .get_mut(id)
            .ok_or_else(|| StoreError::not_found(EntityKind::SemanticLink, id.get()))?;

        if let Some(strength) = update.strength {
            link.strength = validated_strength(Some(strength))?;
        }
        if let Some(link_type) = update.link_type {
            link.link_type = link_type;
        }

        debug!(link_id = %id, strength = link.strength, "updated link");
        Ok(link.clone())
    }

    pub fn delete_link(&self, id: LinkId) -> bool {
        let deleted = self.tables.write().links.delete(id);
        if deleted {
            debug!(link_id = %id, "deleted link");
        }
        deleted
    }

    /// Returns every link where `document` is source or target, in
    /// creation order.
    pub fn document_links(&self, document: DocumentId) -> StoreResult<Vec<SemanticLink>> {
        let tables = self.tables.read();
        if !tables.documents.contains(document) {
            return Err(StoreError::not_found(EntityKind::Document, document.get()));
        }

        let mut links = tables.links.list_where(|l| l.touches(document));
        links.sort_by_key(|l| l.id);
        Ok(links)
    }

    /// Returns links with both endpoints in `documents`, in creation order.
    pub fn links_among(&self, documents: &HashSet<DocumentId>) -> Vec<SemanticLink> {
        self.tables.read().links_within(documents)
    }
}
