use tracing::debug;

use crate::error::{StoreError, StoreResult};
use crate::{EntityKind, NewPriority, Priority, PriorityId, PriorityUpdate, UserId};

use super::{Store, now};

impl Store {
    pub fn create_priority(&self, owner: UserId, priority: NewPriority) -> StoreResult<Priority> {
        let mut tables = self.tables.write();
        if !tables.users.contains(owner) {
            return Err(StoreError::invalid_reference(EntityKind::User, owner.get()));
        }

        let id = PriorityId::new(self.ids.next_id(EntityKind::Priority));
        let priority = Priority {
            id,
            owner,
            title: priority.title,
            description: priority.description,
            due_date: priority.due_date,
            completed: false,
            created_at: now(),
        };
        tables.priorities.put(id, priority.clone());

        debug!(priority_id = %id, owner = %owner, "created priority");
        Ok(priority)
    }

    pub fn get_priority(&self, id: PriorityId) -> Option<Priority> {
        self.tables.read().priorities.get(id).cloned()
    }

    pub fn update_priority(&self, id: PriorityId, update: PriorityUpdate) -> StoreResult<Priority> {
        let mut tables = self.tables.write();
        let priority = tables
            .priorities
            .get_mut(id)
            .ok_or_else(|| StoreError::not_found(EntityKind::Priority, id.get()))?;

        update.apply(priority);
        debug!(priority_id = %id, completed = priority.completed, "updated priority");
        Ok(priority.clone())
    }

    pub fn set_priority_completed(&self, id: PriorityId, completed: bool) -> StoreResult<Priority> {
        self.update_priority(
            id,
            PriorityUpdate {
                completed: Some(completed),
                ..Default::default()
            },
        )
    }

    pub fn delete_priority(&self, id: PriorityId) -> bool {
        self.tables.write().priorities.delete(id)
    }

    /// Returns a user's priorities: open ones first, then by due date
    /// (undated last), then by id.
    pub fn list_user_priorities(&self, owner: UserId) -> Vec<Priority> {
        let mut priorities = self.tables.read().priorities.list_where(|p| p.owner == owner);
        priorities.sort_by(|a, b| {
            a.completed
                .cmp(&b.completed)
                .then_with(|| match (a.due_date, b.due_date) {
                    (Some(x), Some(y)) => x.cmp(&y),
                    (Some(_), None) => std::cmp::Ordering::Less,
                    (None, Some(_)) => std::cmp::Ordering::Greater,
                    (None, None) => std::cmp::Ordering::Equal,
                })
                .then_with(|| a.id.cmp(&b.id))
        });
        priorities
    }
}
