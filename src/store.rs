//! In-memory relational store for users, documents, tags, semantic links,
//! ontologies and priorities.
//!
//! All tables live behind one `RwLock`. Every mutating operation holds the
//! write lock for its whole duration, so readers never see a half-applied
//! change such as a cascade delete in progress. Reads share the read lock.
//!
//! The store is `Send + Sync`; share it between workers with `Arc<Store>`.

mod cascade;
mod documents;
mod ids;
mod links;
mod ontologies;
mod priorities;
mod query;
mod table;
mod tags;
mod users;


use std::collections::HashMap;

use parking_lot::RwLock;
use time::OffsetDateTime;

use crate::{
    Document, DocumentId, DocumentTag, DocumentTagId, LinkId, Ontology, OntologyId, Priority,
    PriorityId, SemanticLink, Tag, TagId, User, UserId,
};

pub use cascade::CascadeReport;
pub use ids::IdAllocator;

use table::Table;

/// One table per entity kind, plus the lookup index used by the tag resolver.
#[derive(Debug, Default)]
pub(crate) struct Tables {
    users: Table<UserId, User>,
    documents: Table<DocumentId, Document>,
    tags: Table<TagId, Tag>,
    document_tags: Table<DocumentTagId, DocumentTag>,
    links: Table<LinkId, SemanticLink>,
    ontologies: Table<OntologyId, Ontology>,
    priorities: Table<PriorityId, Priority>,
    /// Case-folded tag name to tag id.
    tag_names: HashMap<String, TagId>,
}

/// Row counts per table, for diagnostics.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, serde::Serialize)]
pub struct StoreCounts {
    pub users: usize,
    pub documents: usize,
    pub tags: usize,
    pub document_tags: usize,
    pub links: usize,
    pub ontologies: usize,
    pub priorities: usize,
}

/// The shared store. See the module docs for the locking discipline.
///
/// # Examples
///
/// ```
/// use docgraph::{NewDocument, NewUser, Store};
///
/// # fn main() -> Result<(), docgraph::StoreError> {
/// let store = Store::new();
/// let user = store.create_user(NewUser::new("ada", "ada@example.com", "cred"))?;
/// let doc = store.create_document(user.id, NewDocument::new("Notes", "notes.md", "md"))?;
///
/// store.tag_document(doc.id, &["Research", "research", "ML"])?;
/// let aggregate = store.document_with_tags(doc.id).expect("document exists");
/// assert_eq!(aggregate.tags.len(), 2);
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Default)]
pub struct Store {
    tables: RwLock<Tables>,
    ids: IdAllocator,
}

impl Store {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the identity allocator backing this store.
    pub fn ids(&self) -> &IdAllocator {
        &self.ids
    }

    /// Returns the number of rows in each table.
    pub fn counts(&self) -> StoreCounts {
        let tables = self.tables.read();
        StoreCounts {
            users: tables.users.len(),
            documents: tables.documents.len(),
            tags: tables.tags.len(),
            document_tags: tables.document_tags.len(),
            links: tables.links.len(),
            ontologies: tables.ontologies.len(),
            priorities: tables.priorities.len(),
        }
    }
}

fn now() -> OffsetDateTime {
    OffsetDateTime::now_utc()
}
