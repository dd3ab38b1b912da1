//! Read-side aggregates composed from several tables.
//!
//! Each method takes the read lock once so the aggregate is consistent with
//! a single point in time.

use std::collections::HashSet;

use crate::error::{StoreError, StoreResult};
use crate::graph::{DocumentGraph, GraphNode, GraphOptions, SemanticGraph, build_graph};
use crate::{DocumentId, DocumentWithTags, EntityKind, UserId};

use super::Store;

impl Store {
    /// Returns a document with its tags, or `None` if the document does
    /// not exist.
    pub fn document_with_tags(&self, id: DocumentId) -> Option<DocumentWithTags> {
        let tables = self.tables.read();
        let document = tables.documents.get(id)?.clone();
        let tags = tables.tags_of(id);
        Some(DocumentWithTags { document, tags })
    }

    /// Returns all of a user's documents with their tags, ordered by id.
    ///
    /// Fails with [`StoreError::NotFound`] if the user does not exist.
    pub fn user_documents_with_tags(&self, owner: UserId) -> StoreResult<Vec<DocumentWithTags>> {
        let tables = self.tables.read();
        if !tables.users.contains(owner) {
            return Err(StoreError::not_found(EntityKind::User, owner.get()));
        }

        Ok(tables
            .owned_documents(owner)
            .into_iter()
            .map(|document| {
                let tags = tables.tags_of(document.id);
                DocumentWithTags { document, tags }
            })
            .collect())
    }

    /// Builds the deduplicated graph over the given documents.
    ///
    /// Ids that name no stored document are ignored.
    pub fn graph_for(&self, documents: &[DocumentId], options: GraphOptions) -> SemanticGraph {
        let tables = self.tables.read();
        let ids: HashSet<DocumentId> = documents
            .iter()
            .copied()
            .filter(|&id| tables.documents.contains(id))
            .collect();
        let links = tables.links_within(&ids);

        build_graph(&ids, &links, options)
    }

    /// Builds the graph over all of a user's documents, with node details
    /// for rendering.
    pub fn document_graph(
        &self,
        owner: UserId,
        options: GraphOptions,
    ) -> StoreResult<DocumentGraph> {
        let tables = self.tables.read();
        if !tables.users.contains(owner) {
            return Err(StoreError::not_found(EntityKind::User, owner.get()));
        }

        let ids: HashSet<DocumentId> = tables
            .documents
            .values()
            .filter(|d| d.owner == owner)
            .map(|d| d.id)
            .collect();
        let links = tables.links_within(&ids);
        let graph = build_graph(&ids, &links, options);

        let nodes = graph
            .nodes
            .iter()
            .filter_map(|&id| tables.documents.get(id))
            .map(|d| GraphNode {
                id: d.id,
                title: d.title.clone(),
                category: d.category.clone(),
                file_type: d.file_type.clone(),
            })
            .collect();

        Ok(DocumentGraph {
            nodes,
            edges: graph.edges,
        })
    }
}
