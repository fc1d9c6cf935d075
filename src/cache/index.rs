//! Cache Index Module
//!
//! Key lookup table mapping each live key to its slot in the recency list.
//! Every insert/remove here is paired with the matching list change inside the
//! same structural critical section.

use std::collections::HashMap;
use std::sync::Arc;

use ahash::RandomState;

use crate::cache::list::EntryId;

// == Cache Index ==
#[derive(Debug, Default)]
pub struct CacheIndex {
    map: HashMap<Arc<str>, EntryId, RandomState>,
}

impl CacheIndex {
    // == Constructor ==
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            map: HashMap::with_capacity_and_hasher(capacity, RandomState::new()),
        }
    }

    // == Lookup ==
    pub fn lookup(&self, key: &str) -> Option<EntryId> {
        self.map.get(key).copied()
    }

    // == Insert ==
    /// Maps `key` to `id`, returning the id it replaced if any.
    pub fn insert(&mut self, key: Arc<str>, id: EntryId) -> Option<EntryId> {
        self.map.insert(key, id)
    }

    // == Remove ==
    pub fn remove(&mut self, key: &str) -> Option<EntryId> {
        self.map.remove(key)
    }

    pub fn len(&self) -> usize {
        self.map.len()
    }

    #[allow(dead_code)]
    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&Arc<str>, &EntryId)> {
        self.map.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::entry::Entry;
    use crate::cache::list::RecencyList;
    use crate::cache::NO_EXPIRY;

    #[test]
    fn test_index_lockstep_with_list() {
        let mut list = RecencyList::new();
        let mut index = CacheIndex::with_capacity(4);

        let key: Arc<str> = Arc::from("alpha");
        let id = list.push_front(Entry::new(key.clone(), 1u8, NO_EXPIRY, 0));
        assert!(index.insert(key, id).is_none());

        assert_eq!(index.lookup("alpha"), Some(id));
        assert_eq!(index.len(), list.len());

        let removed = index.remove("alpha").unwrap();
        list.remove(removed);
        assert!(index.lookup("alpha").is_none());
        assert!(index.is_empty());
        assert!(list.is_empty());
    }

    #[test]
    fn test_lookup_missing() {
        let index = CacheIndex::default();
        assert!(index.lookup("missing").is_none());
    }
}
