use std::collections::HashSet;

use tracing::debug;

use crate::error::{StoreError, StoreResult};
use crate::ingest::{UploadReceipt, UploadRequest};
use crate::models::tag_key;
use crate::{Document, DocumentId, DocumentPatch, EntityKind, NewDocument, UserId};

use super::{IdAllocator, Store, Tables, now};

impl Tables {
    fn insert_document(
        &mut self,
        ids: &IdAllocator,
        owner: UserId,
        new_document: NewDocument,
    ) -> StoreResult<Document> {
        if !self.users.contains(owner) {
            return Err(StoreError::invalid_reference(EntityKind::User, owner.get()));
        }

        let id = DocumentId::new(ids.next_id(EntityKind::Document));
        let timestamp = now();
        let document = Document {
            id,
            owner,
            title: new_document.title,
            filename: new_document.filename,
            file_type: new_document.file_type,
            category: new_document.category,
            summary: new_document.summary,
            content: new_document.content,
            created_at: timestamp,
            updated_at: timestamp,
        };
        self.documents.put(id, document.clone());

        debug!(document_id = %id, owner = %owner, "created document");
        Ok(document)
    }

    pub(super) fn owned_documents(&self, owner: UserId) -> Vec<Document> {
        let mut documents = self.documents.list_where(|d| d.owner == owner);
        documents.sort_by_key(|d| d.id);
        documents
    }
}

impl Store {
    /// Creates a document owned by `owner`.
    ///
    /// Fails with [`StoreError::InvalidReference`] if the owner is unknown.
    pub fn create_document(&self, owner: UserId, document: NewDocument) -> StoreResult<Document> {
        self.tables
            .write()
            .insert_document(&self.ids, owner, document)
    }

    pub fn get_document(&self, id: DocumentId) -> Option<Document> {
        self.tables.read().documents.get(id).cloned()
    }

    /// Applies a partial update and bumps `updated_at`.
    pub fn update_document(&self, id: DocumentId, patch: DocumentPatch) -> StoreResult<Document> {
        let mut tables = self.tables.write();
        let document = tables
            .documents
            .get_mut(id)
            .ok_or_else(|| StoreError::not_found(EntityKind::Document, id.get()))?;

        patch.apply(document);
        document.updated_at = now().max(document.updated_at);

        debug!(document_id = %id, "updated document");
        Ok(document.clone())
    }

    /// Returns a user's documents ordered by id.
    pub fn list_user_documents(&self, owner: UserId) -> Vec<Document> {
        self.tables.read().owned_documents(owner)
    }

    /// Returns a user's most recently updated documents, newest first.
    ///
    /// Documents updated at the same instant are ordered by descending id.
    pub fn recent_documents(&self, owner: UserId, limit: usize) -> Vec<Document> {
        let mut documents = self.tables.read().documents.list_where(|d| d.owner == owner);
        documents.sort_by(|a, b| {
            b.updated_at
                .cmp(&a.updated_at)
                .then_with(|| b.id.cmp(&a.id))
        });
        documents.truncate(limit);
        documents
    }

    /// Stores an uploaded document together with its tags.
    ///
    /// The document is created, each tag name is resolved (names differing
    /// only in case collapse into one tag) and attached, all in a single
    /// critical section. Nothing is written if any input is rejected.
    pub fn ingest_upload(
        &self,
        owner: UserId,
        request: &UploadRequest,
    ) -> StoreResult<UploadReceipt> {
        let mut tables = self.tables.write();

        if !tables.users.contains(owner) {
            return Err(StoreError::invalid_reference(EntityKind::User, owner.get()));
        }
        if request.tag_names.iter().any(|n| tag_key(n).is_empty()) {
            return Err(StoreError::InvalidValue {
                kind: EntityKind::Tag,
                field: "name",
                reason: "must not be empty",
            });
        }

        let document = tables.insert_document(&self.ids, owner, request.to_new_document())?;

        let mut seen = HashSet::new();
        let mut tag_ids = Vec::new();
        for name in &request.tag_names {
            let tag = tables.resolve_tag(&self.ids, name)?;
            tables.attach_tag(&self.ids, document.id, tag.id())?;
            if seen.insert(tag.id()) {
                tag_ids.push(tag.id());
            }
        }

        Ok(UploadReceipt {
            document_id: document.id,
            tag_ids,
        })
    }
}
