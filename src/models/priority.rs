use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

use super::{PriorityId, UserId};

/// A simple task record owned by a user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Priority {
    pub id: PriorityId,
    pub owner: UserId,
    pub title: String,
    pub description: Option<String>,
    #[serde(with = "time::serde::rfc3339::option")]
    pub due_date: Option<OffsetDateTime>,
    pub completed: bool,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
}

/// Input for creating a priority. New priorities start incomplete.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NewPriority {
    pub title: String,
    pub description: Option<String>,
    pub due_date: Option<OffsetDateTime>,
}

impl NewPriority {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            ..Default::default()
        }
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn due(mut self, due_date: OffsetDateTime) -> Self {
        self.due_date = Some(due_date);
        self
    }
}

/// Update for a priority. `None` leaves a field unchanged; `Some(None)`
/// clears an optional field.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PriorityUpdate {
    pub title: Option<String>,
    pub description: Option<Option<String>>,
    pub due_date: Option<Option<OffsetDateTime>>,
    pub completed: Option<bool>,
}

impl PriorityUpdate {
    pub(crate) fn apply(self, priority: &mut Priority) {
        if let Some(title) = self.title {
            priority.title = title;
        }
        if let Some(description) = self.description {
            priority.description = description;
        }
        if let Some(due_date) = self.due_date {
            priority.due_date = due_date;
        }
        if let Some(completed) = self.completed {
            priority.completed = completed;
        }
    }
}
