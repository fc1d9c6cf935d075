//! Cache Module
//!
//! Concurrent LRU cache engine with per-entry TTL metadata and a
//! mark-and-sweep crawler that reclaims expired entries.

mod crawler;
mod entry;
mod index;
mod list;
mod lru;
mod stats;


// Re-export public types
pub use crawler::{CrawlReport, Crawler, MarkedKeys};
pub use entry::{EntryRecord, NO_EXPIRY};
pub use lru::{LruCache, PutOutcome};
pub use stats::StatsSnapshot;

// == Public Constants ==
/// Maximum allowed key length in bytes
pub const MAX_KEY_LENGTH: usize = 256;

/// Maximum allowed value size in bytes
pub const MAX_VALUE_SIZE: usize = 1024 * 1024; // 1 MB
