pub mod config;
pub mod dataset;
pub mod error;
pub mod graph;
pub mod ingest;
pub mod logging;
pub mod models;
pub mod snapshot;
pub mod store;

pub use error::{StoreError, StoreResult};
pub use models::{
    DEFAULT_STRENGTH, Document, DocumentId, DocumentPatch, DocumentTag, DocumentTagId,
    DocumentWithTags, EntityKind, LinkId, LinkUpdate, NewDocument, NewLink, NewPriority, NewUser,
    Ontology, OntologyId, OntologyUpdate, Priority, PriorityId, PriorityUpdate, SemanticLink, Tag,
    TagId, TagUsage, User, UserId, pair_key,
};
pub use store::{CascadeReport, IdAllocator, Store, StoreCounts};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn store_accessible_from_crate_root() {
        let store = Store::new();
        assert_eq!(store.counts(), StoreCounts::default());
    }

    #[test]
    fn store_is_shareable_across_threads() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<Store>();
    }

    #[test]
    fn types_accessible_from_crate_root() {
        let tag = Tag::new(TagId::new(1), "test");
        assert_eq!(tag.name(), "test");

        let link = NewLink::new(DocumentId::new(1), DocumentId::new(2), "cites");
        assert_eq!(link.strength, None);
        assert_eq!(DEFAULT_STRENGTH, 1);

        assert_eq!(format!("{}", EntityKind::SemanticLink), "semantic_link");
    }
}
