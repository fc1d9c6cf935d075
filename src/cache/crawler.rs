//! Crawler Module
//!
//! Mark-and-sweep TTL reclamation. A cycle walks the recency list from tail to
//! head collecting stale keys, then deletes each one through the normal delete
//! path. No lock is held between the two phases.

use std::collections::HashSet;
use std::sync::Arc;

use serde::Serialize;
use tracing::{debug, info};

use crate::cache::entry::current_timestamp;
use crate::cache::list::EntryId;
use crate::cache::LruCache;

// == Crawl Report ==
/// Work done by one crawl cycle.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct CrawlReport {
    /// Entries visited by the mark walk
    pub scanned: usize,
    /// Keys found stale
    pub marked: usize,
    /// Entries actually removed by the sweep
    pub swept: usize,
}

/// Outcome of a mark walk.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MarkedKeys {
    /// Entries visited
    pub scanned: usize,
    /// Stale keys in walk order, each listed once
    pub keys: Vec<String>,
}

// == Crawler ==
/// Background TTL sweeper bound to one cache.
#[derive(Debug)]
pub struct Crawler<V> {
    cache: Arc<LruCache<V>>,
}

impl<V> Clone for Crawler<V> {
    fn clone(&self) -> Self {
        Self {
            cache: Arc::clone(&self.cache),
        }
    }
}

impl<V: Clone> Crawler<V> {
    pub fn new(cache: Arc<LruCache<V>>) -> Self {
        Self { cache }
    }

    pub fn cache(&self) -> &Arc<LruCache<V>> {
        &self.cache
    }

    // == Crawl ==
    /// Runs one full mark-then-sweep cycle against the current time.
    pub fn crawl(&self) -> CrawlReport {
        self.crawl_at(current_timestamp())
    }

    /// Runs one cycle treating `now` as the current Unix time in seconds.
    pub fn crawl_at(&self, now: i64) -> CrawlReport {
        let marked = self.mark(now);
        let report = CrawlReport {
            scanned: marked.scanned,
            marked: marked.keys.len(),
            swept: self.sweep(&marked.keys),
        };

        if report.swept > 0 {
            info!(
                scanned = report.scanned,
                swept = report.swept,
                "crawler removed expired entries"
            );
        } else {
            debug!(scanned = report.scanned, "crawler found no expired entries");
        }
        report
    }

    // == Mark ==
    /// Walks tail to head and collects the keys of stale entries.
    ///
    /// Each step holds the structural lock only long enough to copy out one
    /// entry, then reads the TTL fields under that entry's own lock. When the
    /// entry under the cursor is removed concurrently, the walk resumes from
    /// the current `prev` of the last entry it visited, or from the tail if
    /// that entry is gone as well.
    ///
    /// # Arguments
    /// * `now` - Unix time in seconds to test expiry against
    ///
    /// # Returns
    /// The number of entries visited and the stale keys. The walk ends at the
    /// head, after `capacity` visits, or after `capacity` resumptions.
    pub fn mark(&self, now: i64) -> MarkedKeys {
        let budget = self.cache.capacity();
        let mut marked = MarkedKeys::default();
        let mut seen: HashSet<Arc<str>, ahash::RandomState> = HashSet::default();
        let mut last: Option<EntryId> = None;
        let mut resumes = 0;
        let mut cursor = self.cache.scan_start();

        while let Some(id) = cursor {
            if marked.scanned == budget {
                break;
            }
            let Some(step) = self.cache.scan_step(id) else {
                if resumes == budget {
                    debug!("crawl cursor kept disappearing, ending walk early");
                    break;
                }
                resumes += 1;
                cursor = match last.and_then(|visited| self.cache.scan_step(visited)) {
                    Some(visited) => visited.prev,
                    None => {
                        last = None;
                        self.cache.scan_start()
                    }
                };
                continue;
            };
            marked.scanned += 1;

            // A restart from the tail can visit an entry twice
            if step.cell.lock().is_expired_at(now) && seen.insert(step.key.clone()) {
                marked.keys.push(step.key.to_string());
            }
            last = Some(id);
            cursor = step.prev;
        }

        marked
    }

    // == Sweep ==
    /// Deletes every marked key and returns how many were still present.
    pub fn sweep(&self, keys: &[String]) -> usize {
        let swept = keys.iter().filter(|key| self.cache.delete(key)).count();
        self.cache.counters().record_expirations(swept as u64);
        swept
    }
}
