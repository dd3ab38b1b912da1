mod document;
mod entity_kind;
mod ids;
mod link;
mod ontology;
mod priority;
mod tag;
mod user;

pub use document::{Document, DocumentPatch, DocumentWithTags, NewDocument};
pub use entity_kind::EntityKind;
pub use ids::{DocumentId, DocumentTagId, LinkId, OntologyId, PriorityId, TagId, UserId};
pub use link::{DEFAULT_STRENGTH, LinkUpdate, NewLink, SemanticLink, pair_key};
pub use ontology::{Ontology, OntologyUpdate};
pub use priority::{NewPriority, Priority, PriorityUpdate};
pub use tag::{DocumentTag, Tag, TagUsage};
pub use user::{NewUser, User};

pub(crate) use tag::tag_key;
