//! Cache Entry Module
//!
//! Defines a single cached record: its immutable key, its lock-guarded fields
//! and its position links inside the recency list.

use std::sync::Arc;

use parking_lot::Mutex;
use serde::{Deserialize, Serialize};

use crate::cache::list::EntryId;

/// TTL value meaning "never expires".
pub const NO_EXPIRY: i64 = -1;

// == Entry State ==
/// Mutable fields of an entry, guarded by the entry's own lock.
#[derive(Debug, Clone)]
pub struct EntryState<V> {
    /// The stored value
    pub value: V,
    /// Unix seconds at insertion or last update
    pub created_at: i64,
    /// Lifespan in seconds, `NO_EXPIRY` for none
    pub ttl_seconds: i64,
}

impl<V> EntryState<V> {
    pub fn new(value: V, ttl_seconds: i64, created_at: i64) -> Self {
        Self {
            value,
            created_at,
            ttl_seconds,
        }
    }

    // == Is Expired ==
    /// Checks whether the entry is stale at `now`.
    ///
    /// Boundary condition: an entry is stale only once `created_at + ttl_seconds`
    /// is strictly before `now`, so an entry is still live during its last second.
    pub fn is_expired_at(&self, now: i64) -> bool {
        self.ttl_seconds != NO_EXPIRY && self.created_at.saturating_add(self.ttl_seconds) < now
    }
}

/// Shared handle to an entry's locked fields.
///
/// The crawler clones this out of the list so it can read TTL fields without
/// holding the structural lock.
pub type EntryCell<V> = Arc<Mutex<EntryState<V>>>;

// == Entry ==
/// A linked cache entry owned by the recency list.
#[derive(Debug)]
pub struct Entry<V> {
    key: Arc<str>,
    cell: EntryCell<V>,
    pub(crate) prev: Option<EntryId>,
    pub(crate) next: Option<EntryId>,
}

impl<V> Entry<V> {
    // == Constructor ==
    /// Creates an unlinked entry.
    pub fn new(key: Arc<str>, value: V, ttl_seconds: i64, created_at: i64) -> Self {
        Self {
            key,
            cell: Arc::new(Mutex::new(EntryState::new(value, ttl_seconds, created_at))),
            prev: None,
            next: None,
        }
    }

    pub fn key(&self) -> &Arc<str> {
        &self.key
    }

    pub fn cell(&self) -> &EntryCell<V> {
        &self.cell
    }

    /// Neighbor toward the head (more recently used).
    pub fn prev(&self) -> Option<EntryId> {
        self.prev
    }

    /// Neighbor toward the tail (less recently used).
    pub fn next(&self) -> Option<EntryId> {
        self.next
    }

    // == Refresh ==
    /// Replaces value, TTL and timestamp in place under the entry lock.
    pub fn refresh(&self, value: V, ttl_seconds: i64, created_at: i64) {
        let mut state = self.cell.lock();
        state.value = value;
        state.ttl_seconds = ttl_seconds;
        state.created_at = created_at;
    }

    /// Copies the entry out as a replayable record.
    pub fn to_record(&self) -> EntryRecord<V>
    where
        V: Clone,
    {
        let state = self.cell.lock();
        EntryRecord {
            key: self.key.to_string(),
            value: state.value.clone(),
            ttl_seconds: state.ttl_seconds,
            created_at: state.created_at,
        }
    }
}

// == Entry Record ==
/// Detached copy of an entry used for snapshot export and bootstrap replay.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntryRecord<V> {
    pub key: String,
    pub value: V,
    pub ttl_seconds: i64,
    pub created_at: i64,
}

// == Utility Functions ==
/// Returns current Unix timestamp in seconds.
pub fn current_timestamp() -> i64 {
    chrono::Utc::now().timestamp()
}
