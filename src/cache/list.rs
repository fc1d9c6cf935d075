//! Recency List Module
//!
//! Doubly linked list ordering entries from most recently used (head) to least
//! recently used (tail). Nodes live in a slot arena and link to each other by
//! generational ids, so a stale id can never alias a reused slot.

use crate::cache::entry::Entry;

// == Entry Id ==
/// Stable handle to a linked entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct EntryId {
    index: usize,
    generation: u64,
}

#[derive(Debug)]
struct Slot<V> {
    generation: u64,
    entry: Option<Entry<V>>,
}

// == Recency List ==
/// Arena-backed doubly linked list with O(1) structural operations.
#[derive(Debug)]
pub struct RecencyList<V> {
    slots: Vec<Slot<V>>,
    free: Vec<usize>,
    head: Option<EntryId>,
    tail: Option<EntryId>,
    len: usize,
}

impl<V> Default for RecencyList<V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<V> RecencyList<V> {
    // == Constructor ==
    #[allow(dead_code)]
    pub fn new() -> Self {
        Self::with_capacity(0)
    }

    /// Creates an empty list with room for `capacity` entries before reallocating.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            slots: Vec::with_capacity(capacity),
            free: Vec::new(),
            head: None,
            tail: None,
            len: 0,
        }
    }

    pub fn len(&self) -> usize {
        self.len
    }

    #[allow(dead_code)]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Most recently used entry.
    #[allow(dead_code)]
    pub fn head(&self) -> Option<EntryId> {
        self.head
    }

    // == Peek Tail ==
    /// Least recently used entry, or None when the list is empty.
    pub fn peek_tail(&self) -> Option<EntryId> {
        self.tail
    }

    /// Resolves an id, returning None if the entry has since been removed.
    pub fn get(&self, id: EntryId) -> Option<&Entry<V>> {
        self.slots
            .get(id.index)
            .filter(|slot| slot.generation == id.generation)
            .and_then(|slot| slot.entry.as_ref())
    }

    fn get_mut(&mut self, id: EntryId) -> Option<&mut Entry<V>> {
        self.slots
            .get_mut(id.index)
            .filter(|slot| slot.generation == id.generation)
            .and_then(|slot| slot.entry.as_mut())
    }

    pub fn contains(&self, id: EntryId) -> bool {
        self.get(id).is_some()
    }

    // == Push Front ==
    /// Links a new entry in as the head.
    pub fn push_front(&mut self, mut entry: Entry<V>) -> EntryId {
        entry.prev = None;
        entry.next = None;
        let id = self.alloc(entry);
        self.link_front(id);
        self.len += 1;
        id
    }

    // == Remove ==
    /// Unlinks an entry and releases its slot.
    ///
    /// The id must refer to a linked entry; callers resolve it through the key
    /// index first.
    pub fn remove(&mut self, id: EntryId) -> Option<Entry<V>> {
        debug_assert!(self.contains(id), "remove of unlinked entry {:?}", id);
        if !self.contains(id) {
            return None;
        }

        self.unlink(id);
        let slot = &mut self.slots[id.index];
        let entry = slot.entry.take();
        slot.generation = slot.generation.wrapping_add(1);
        self.free.push(id.index);
        self.len -= 1;
        entry
    }

    // == Move To Front ==
    /// Records a fresh access by relinking the entry as head.
    pub fn move_to_front(&mut self, id: EntryId) -> bool {
        debug_assert!(self.contains(id), "move of unlinked entry {:?}", id);
        if !self.contains(id) {
            return false;
        }
        if self.head != Some(id) {
            self.unlink(id);
            self.link_front(id);
        }
        true
    }

    /// Iterates from head (most recent) to tail.
    pub fn iter(&self) -> impl Iterator<Item = &Entry<V>> + '_ {
        let mut cursor = self.head;
        std::iter::from_fn(move || {
            let entry = self.get(cursor?)?;
            cursor = entry.next();
            Some(entry)
        })
    }

    /// Iterates from tail (least recent) to head.
    pub fn iter_rev(&self) -> impl Iterator<Item = &Entry<V>> + '_ {
        let mut cursor = self.tail;
        std::iter::from_fn(move || {
            let entry = self.get(cursor?)?;
            cursor = entry.prev();
            Some(entry)
        })
    }

    // == Check Links ==
    /// Walks the list in both directions and verifies every link and the size counter.
    pub fn check_links(&self) -> Result<(), String> {
        let mut count = 0;
        let mut prev: Option<EntryId> = None;
        let mut cursor = self.head;
        while let Some(id) = cursor {
            let entry = self
                .get(id)
                .ok_or_else(|| format!("dangling link to {:?}", id))?;
            if entry.prev != prev {
                return Err(format!("entry '{}' has a broken prev link", entry.key()));
            }
            count += 1;
            if count > self.len {
                return Err(format!("forward walk exceeds size {}", self.len));
            }
            prev = cursor;
            cursor = entry.next;
        }

        if prev != self.tail {
            return Err("forward walk does not end at tail".to_string());
        }
        if count != self.len {
            return Err(format!("size is {} but {} entries are linked", self.len, count));
        }
        if self.iter_rev().count() != self.len {
            return Err("backward walk does not visit every entry".to_string());
        }
        Ok(())
    }

    fn alloc(&mut self, entry: Entry<V>) -> EntryId {
        if let Some(index) = self.free.pop() {
            let slot = &mut self.slots[index];
            slot.entry = Some(entry);
            EntryId {
                index,
                generation: slot.generation,
            }
        } else {
            self.slots.push(Slot {
                generation: 0,
                entry: Some(entry),
            });
            EntryId {
                index: self.slots.len() - 1,
                generation: 0,
            }
        }
    }

    fn link_front(&mut self, id: EntryId) {
        let old_head = self.head;
        if let Some(entry) = self.get_mut(id) {
            entry.prev = None;
            entry.next = old_head;
        }

        match old_head {
            Some(head) => {
                if let Some(head_entry) = self.get_mut(head) {
                    head_entry.prev = Some(id);
                }
            }
            None => self.tail = Some(id),
        }
        self.head = Some(id);
    }

    fn unlink(&mut self, id: EntryId) {
        let Some(entry) = self.get_mut(id) else {
            return;
        };
        let prev = entry.prev.take();
        let next = entry.next.take();

        match prev {
            Some(prev_id) => {
                if let Some(prev_entry) = self.get_mut(prev_id) {
                    prev_entry.next = next;
                }
            }
            None => self.head = next,
        }
        match next {
            Some(next_id) => {
                if let Some(next_entry) = self.get_mut(next_id) {
                    next_entry.prev = prev;
                }
            }
            None => self.tail = prev,
        }
    }
}
