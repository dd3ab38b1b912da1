use std::collections::HashMap;
use std::hash::Hash;

/// A keyed collection of one entity kind.
///
/// Lookups, inserts and deletes are O(1) expected; `list_where` and `retain`
/// scan every row. Callers needing an order sort the result themselves.
#[derive(Debug)]
pub(crate) struct Table<I, V> {
    rows: HashMap<I, V>,
}

impl<I, V> Default for Table<I, V> {
    fn default() -> Self {
        Self {
            rows: HashMap::new(),
        }
    }
}

impl<I, V> Table<I, V>
where
    I: Copy + Eq + Hash,
    V: Clone,
{
    pub fn get(&self, id: I) -> Option<&V> {
        self.rows.get(&id)
    }

    pub fn get_mut(&mut self, id: I) -> Option<&mut V> {
        self.rows.get_mut(&id)
    }

    pub fn contains(&self, id: I) -> bool {
        self.rows.contains_key(&id)
    }

    /// Inserts or replaces the row stored under `id`.
    pub fn put(&mut self, id: I, value: V) -> Option<V> {
        self.rows.insert(id, value)
    }

    /// Removes the row under `id`, returning whether one existed.
    pub fn delete(&mut self, id: I) -> bool {
        self.rows.remove(&id).is_some()
    }

    /// Clones out every row matching `predicate`, in no particular order.
    pub fn list_where(&self, predicate: impl Fn(&V) -> bool) -> Vec<V> {
        self.rows.values().filter(|v| predicate(v)).cloned().collect()
    }

    pub fn find(&self, predicate: impl Fn(&V) -> bool) -> Option<&V> {
        self.rows.values().find(|v| predicate(v))
    }

    pub fn values(&self) -> impl Iterator<Item = &V> {
        self.rows.values()
    }

    /// Keeps only rows matching `keep`, returning how many were removed.
    pub fn retain(&mut self, mut keep: impl FnMut(&V) -> bool) -> usize {
        let before = self.rows.len();
        self.rows.retain(|_, v| keep(v));
        before - self.rows.len()
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn put_get_delete() {
        let mut table: Table<u32, &str> = Table::default();

        assert!(table.put(1, "a").is_none());
        assert_eq!(table.put(1, "b"), Some("a"));
        assert_eq!(table.get(1), Some(&"b"));
        assert!(table.contains(1));

        assert!(table.delete(1));
        assert!(!table.delete(1));
        assert_eq!(table.get(1), None);
    }

    #[test]
    fn list_where_filters_rows() {
        let mut table: Table<u32, u32> = Table::default();
        for i in 1..=6 {
            table.put(i, i * 10);
        }

        let mut even = table.list_where(|v| v % 20 == 0);
        even.sort_unstable();
        assert_eq!(even, vec![20, 40, 60]);
    }

    #[test]
    fn retain_reports_removed_count() {
        let mut table: Table<u32, u32> = Table::default();
        for i in 1..=5 {
            table.put(i, i);
        }

        assert_eq!(table.retain(|v| *v > 2), 2);
        assert_eq!(table.len(), 3);
        assert_eq!(table.retain(|_| true), 0);
    }
}
