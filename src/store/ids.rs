use std::sync::atomic::{AtomicI64, Ordering};

use crate::EntityKind;

/// Issues identifiers per entity kind.
///
/// Ids start at 1, strictly increase and are never handed out twice, even
/// after the row they named is deleted. Allocation is lock-free.
#[derive(Debug, Default)]
pub struct IdAllocator {
    last: [AtomicI64; EntityKind::COUNT],
}

impl IdAllocator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the next id for `kind`.
    ///
    /// # Examples
    ///
    /// ```
    /// use docgraph::{EntityKind, IdAllocator};
    ///
    /// let ids = IdAllocator::new();
    /// assert_eq!(ids.next_id(EntityKind::Tag), 1);
    /// assert_eq!(ids.next_id(EntityKind::Tag), 2);
    /// assert_eq!(ids.next_id(EntityKind::Document), 1);
    /// ```
    pub fn next_id(&self, kind: EntityKind) -> i64 {
        self.last[kind.slot()].fetch_add(1, Ordering::SeqCst) + 1
    }

    /// Records that `id` is in use so later allocations stay above it.
    ///
    /// Used when rows are restored with their original ids.
    pub fn observe(&self, kind: EntityKind, id: i64) {
        self.last[kind.slot()].fetch_max(id, Ordering::SeqCst);
    }

    /// Returns the most recently issued (or observed) id, 0 if none.
    pub fn last_issued(&self, kind: EntityKind) -> i64 {
        self.last[kind.slot()].load(Ordering::SeqCst)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;
    use std::sync::Arc;
    use std::thread;

    #[test]
    fn counters_are_independent_per_kind() {
        let ids = IdAllocator::new();
        assert_eq!(ids.next_id(EntityKind::User), 1);
        assert_eq!(ids.next_id(EntityKind::User), 2);
        assert_eq!(ids.next_id(EntityKind::Priority), 1);
        assert_eq!(ids.last_issued(EntityKind::User), 2);
        assert_eq!(ids.last_issued(EntityKind::Ontology), 0);
    }

    #[test]
    fn observe_never_moves_counter_backwards() {
        let ids = IdAllocator::new();
        ids.observe(EntityKind::User, 10);
        assert_eq!(ids.next_id(EntityKind::User), 11);

        ids.observe(EntityKind::User, 3);
        assert_eq!(ids.next_id(EntityKind::User), 12);
    }

    #[test]
    fn concurrent_callers_never_share_an_id() {
        let ids = Arc::new(IdAllocator::new());
        let handles: Vec<_> = (0..8)
            .map(|_| {
                let ids = Arc::clone(&ids);
                thread::spawn(move || {
                    (0..500)
                        .map(|_| ids.next_id(EntityKind::SemanticLink))
                        .collect::<Vec<_>>()
                })
            })
            .collect();

        let mut seen = HashSet::new();
        for handle in handles {
            for id in handle.join().unwrap() {
                assert!(seen.insert(id), "id {id} issued twice");
            }
        }
        assert_eq!(seen.len(), 4000);
        assert_eq!(ids.last_issued(EntityKind::SemanticLink), 4000);
    }
}
