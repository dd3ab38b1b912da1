use serde::{Deserialize, Serialize};
use std::fmt;

/// Declares a newtype identifier over `i64`.
///
/// Every entity kind gets its own id type so ids from different tables
/// cannot be mixed up at compile time.
macro_rules! entity_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(i64);

        impl $name {
            /// Creates a new id from its raw value.
            pub fn new(id: i64) -> Self {
                Self(id)
            }

            /// Returns the underlying id value.
            pub fn get(self) -> i64 {
                self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }
    };
}

entity_id! {
    /// Unique identifier for a registered user.
    UserId
}

entity_id! {
    /// Unique identifier for an uploaded document.
    DocumentId
}

entity_id! {
    /// Unique identifier for a tag.
    TagId
}

entity_id! {
    /// Unique identifier for a document/tag join row.
    DocumentTagId
}

entity_id! {
    /// Unique identifier for a semantic link between two documents.
    LinkId
}

entity_id! {
    /// Unique identifier for a user-defined ontology.
    OntologyId
}

entity_id! {
    /// Unique identifier for a priority (task) record.
    PriorityId
}
