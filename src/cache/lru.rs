//! LRU Cache Module
//!
//! Main cache engine composing the recency list and key index behind
//! get/put/delete, with synchronous tail eviction on overflow.
//!
//! # Locking
//! A reader/writer lock guards the list and index together (head, tail, size
//! and the key mapping). Each entry additionally carries its own mutex over
//! value, TTL and timestamp. The structural lock is always taken first; the
//! crawler reads entry fields with only the entry mutex held.

use std::sync::Arc;

use parking_lot::RwLock;
use tracing::debug;

use crate::cache::entry::{current_timestamp, Entry, EntryCell, EntryRecord};
use crate::cache::index::CacheIndex;
use crate::cache::list::{EntryId, RecencyList};
use crate::cache::stats::{CacheStats, StatsSnapshot};
use crate::error::{CacheError, Result};

// == Put Outcome ==
/// What a put did to the cache.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PutOutcome {
    /// A new entry was linked at the head, possibly pushing the tail out.
    Inserted { evicted: Option<String> },
    /// An existing entry was refreshed and moved to the head.
    Updated,
}

/// One position of a tail-to-head walk, copied out of the structural lock.
pub(crate) struct ScanStep<V> {
    pub key: Arc<str>,
    pub cell: EntryCell<V>,
    pub prev: Option<EntryId>,
}

/// List and index, mutated together under the structural lock.
#[derive(Debug)]
struct Shared<V> {
    list: RecencyList<V>,
    index: CacheIndex,
}

impl<V> Shared<V> {
    fn evict_tail(&mut self) -> Option<Arc<str>> {
        let tail = self.list.peek_tail()?;
        let entry = self.list.remove(tail)?;
        self.index.remove(entry.key());
        Some(entry.key().clone())
    }
}

// == LRU Cache ==
/// Bounded, thread-safe LRU cache with per-entry TTL metadata.
///
/// TTL is not checked on the read path: a stale entry stays readable until
/// the crawler sweeps it.
#[derive(Debug)]
pub struct LruCache<V> {
    shared: RwLock<Shared<V>>,
    capacity: usize,
    stats: CacheStats,
}

impl<V: Clone> LruCache<V> {
    // == Constructor ==
    /// Creates an empty cache holding at most `capacity` entries.
    ///
    /// # Arguments
    /// * `capacity` - Maximum number of entries, at least 1
    pub fn new(capacity: usize) -> Result<Self> {
        if capacity == 0 {
            return Err(CacheError::InvalidConfig(
                "cache capacity must be at least 1".to_string(),
            ));
        }

        Ok(Self {
            shared: RwLock::new(Shared {
                list: RecencyList::with_capacity(capacity),
                index: CacheIndex::with_capacity(capacity),
            }),
            capacity,
            stats: CacheStats::new(),
        })
    }

    // == From Records ==
    /// Rebuilds a cache by replaying records in order.
    ///
    /// The last record replayed ends up most recently used, so the output of
    /// [`LruCache::snapshot`] replays into the same recency order.
    ///
    /// # Arguments
    /// * `capacity` - Maximum number of entries, at least 1
    /// * `records` - Entries to replay, least recently used first
    ///
    /// # Returns
    /// The rebuilt cache, or `InvalidConfig` for a zero capacity. Records past
    /// the capacity push out the earliest ones.
    pub fn from_records<I>(capacity: usize, records: I) -> Result<Self>
    where
        I: IntoIterator<Item = EntryRecord<V>>,
    {
        let cache = Self::new(capacity)?;
        for record in records {
            cache.restore(record);
        }
        debug!(entries = cache.len(), "cache rebuilt from records");
        Ok(cache)
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn len(&self) -> usize {
        self.shared.read().list.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Checks membership without touching recency.
    pub fn contains(&self, key: &str) -> bool {
        self.shared.read().index.lookup(key).is_some()
    }

    // == Get ==
    /// Returns the value for `key` and marks it most recently used.
    pub fn get(&self, key: &str) -> Option<V> {
        let mut shared = self.shared.write();
        let value = shared.index.lookup(key).and_then(|id| {
            shared.list.move_to_front(id);
            shared.list.get(id).map(|entry| entry.cell().lock().value.clone())
        });
        drop(shared);

        match value {
            Some(_) => self.stats.record_hit(),
            None => self.stats.record_miss(),
        }
        value
    }

    // == Peek ==
    /// Returns the value for `key` without changing recency or statistics.
    pub fn peek(&self, key: &str) -> Option<V> {
        let shared = self.shared.read();
        let id = shared.index.lookup(key)?;
        let value = shared.list.get(id)?.cell().lock().value.clone();
        Some(value)
    }

    // == Put ==
    /// Inserts or refreshes `key`, stamping it with the current time.
    pub fn put(&self, key: &str, value: V, ttl_seconds: i64) -> PutOutcome {
        self.put_at(key, value, ttl_seconds, current_timestamp())
    }

    /// Inserts or refreshes `key` with an explicit creation timestamp.
    ///
    /// On overflow exactly one entry, the tail, is evicted before returning.
    ///
    /// # Arguments
    /// * `key` - The key to store
    /// * `value` - The value to store
    /// * `ttl_seconds` - Lifetime in seconds, or `NO_EXPIRY`
    /// * `created_at` - Unix time in seconds the TTL counts from
    ///
    /// # Returns
    /// `Updated` when the key was already present, otherwise `Inserted` with
    /// the evicted key if the insert overflowed the cache.
    pub fn put_at(&self, key: &str, value: V, ttl_seconds: i64, created_at: i64) -> PutOutcome {
        let mut guard = self.shared.write();
        let shared = &mut *guard;

        if let Some(id) = shared.index.lookup(key) {
            if let Some(entry) = shared.list.get(id) {
                entry.refresh(value, ttl_seconds, created_at);
            }
            shared.list.move_to_front(id);
            return PutOutcome::Updated;
        }

        let key: Arc<str> = Arc::from(key);
        let id = shared
            .list
            .push_front(Entry::new(key.clone(), value, ttl_seconds, created_at));
        shared.index.insert(key, id);
        self.stats.record_insert();

        let evicted = if shared.list.len() > self.capacity {
            shared.evict_tail()
        } else {
            None
        };
        drop(guard);

        if let Some(evicted_key) = &evicted {
            self.stats.record_eviction();
            debug!(key = %evicted_key, "evicted least recently used entry");
        }
        PutOutcome::Inserted {
            evicted: evicted.map(|k| k.to_string()),
        }
    }

    /// Replays one record through the put path.
    pub fn restore(&self, record: EntryRecord<V>) -> PutOutcome {
        self.put_at(
            &record.key,
            record.value,
            record.ttl_seconds,
            record.created_at,
        )
    }

    // == Delete ==
    /// Removes `key`, returning whether an entry was present.
    ///
    /// Deleting an absent key is a successful no-op.
    pub fn delete(&self, key: &str) -> bool {
        let mut guard = self.shared.write();
        let shared = &mut *guard;

        let Some(id) = shared.index.lookup(key) else {
            return false;
        };
        let Some(cell) = shared.list.get(id).map(|entry| entry.cell().clone()) else {
            debug_assert!(false, "index points at unlinked entry '{}'", key);
            shared.index.remove(key);
            return false;
        };

        let _held = cell.lock();
        shared.index.remove(key);
        shared.list.remove(id);
        true
    }

    // == Stats ==
    pub fn stats(&self) -> StatsSnapshot {
        self.stats.snapshot(self.len())
    }

    pub(crate) fn counters(&self) -> &CacheStats {
        &self.stats
    }

    // == Snapshot ==
    /// Exports every live entry, least recently used first.
    pub fn snapshot(&self) -> Vec<EntryRecord<V>> {
        let shared = self.shared.read();
        shared.list.iter_rev().map(Entry::to_record).collect()
    }

    /// Keys from most to least recently used.
    pub fn keys(&self) -> Vec<String> {
        let shared = self.shared.read();
        shared.list.iter().map(|entry| entry.key().to_string()).collect()
    }

    // == Verify Integrity ==
    /// Checks list links, index/list agreement and the capacity bound.
    pub fn verify_integrity(&self) -> Result<()> {
        let shared = self.shared.read();
        shared.list.check_links().map_err(CacheError::Corrupted)?;

        if shared.index.len() != shared.list.len() {
            return Err(CacheError::Corrupted(format!(
                "index holds {} keys but list holds {} entries",
                shared.index.len(),
                shared.list.len()
            )));
        }
        for (key, id) in shared.index.iter() {
            match shared.list.get(*id) {
                Some(entry) if entry.key() == key => {}
                _ => {
                    return Err(CacheError::Corrupted(format!(
                        "key '{}' is indexed but not linked",
                        key
                    )))
                }
            }
        }
        if shared.list.len() > self.capacity {
            return Err(CacheError::Corrupted(format!(
                "{} entries exceed capacity {}",
                shared.list.len(),
                self.capacity
            )));
        }
        Ok(())
    }

    // == Crawler Support ==
    pub(crate) fn scan_start(&self) -> Option<EntryId> {
        self.shared.read().list.peek_tail()
    }

    /// Copies out the entry at `id`, or None if it was removed since the id was read.
    pub(crate) fn scan_step(&self, id: EntryId) -> Option<ScanStep<V>> {
        let shared = self.shared.read();
        let entry = shared.list.get(id)?;
        Some(ScanStep {
            key: entry.key().clone(),
            cell: entry.cell().clone(),
            prev: entry.prev(),
        })
    }
}
