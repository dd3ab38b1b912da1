//! Error types for store operations.

use thiserror::Error;

use crate::EntityKind;

/// Errors reported by [`Store`](crate::Store) operations.
///
/// The store never retries or swallows these; they go straight back to the
/// caller.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    /// The operation referenced an id absent from its table.
    #[error("{kind} {id} not found")]
    NotFound { kind: EntityKind, id: i64 },

    /// Creation would violate a uniqueness constraint.
    #[error("{kind} with {field} '{value}' already exists")]
    Conflict {
        kind: EntityKind,
        field: &'static str,
        value: String,
    },

    /// A row was created pointing at an id that does not exist.
    #[error("referenced {kind} {id} does not exist")]
    InvalidReference { kind: EntityKind, id: i64 },

    /// A field value is outside what the store accepts.
    #[error("invalid {kind} {field}: {reason}")]
    InvalidValue {
        kind: EntityKind,
        field: &'static str,
        reason: &'static str,
    },
}

impl StoreError {
    pub(crate) fn not_found(kind: EntityKind, id: i64) -> Self {
        Self::NotFound { kind, id }
    }

    pub(crate) fn invalid_reference(kind: EntityKind, id: i64) -> Self {
        Self::InvalidReference { kind, id }
    }

    /// Returns true for errors caused by the caller's input rather than
    /// by missing data.
    pub fn is_user_error(&self) -> bool {
        matches!(self, Self::Conflict { .. } | Self::InvalidValue { .. })
    }
}

pub type StoreResult<T> = Result<T, StoreError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages_name_kind_and_id() {
        let err = StoreError::not_found(EntityKind::Document, 7);
        assert_eq!(err.to_string(), "document 7 not found");

        let err = StoreError::invalid_reference(EntityKind::Tag, 3);
        assert_eq!(err.to_string(), "referenced tag 3 does not exist");
    }

    #[test]
    fn conflict_message_includes_value() {
        let err = StoreError::Conflict {
            kind: EntityKind::User,
            field: "username",
            value: "ada".to_string(),
        };
        assert_eq!(err.to_string(), "user with username 'ada' already exists");
        assert!(err.is_user_error());
    }
}
