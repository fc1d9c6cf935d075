//! Cache Node - in-memory key/value cache node
//!
//! Bounded LRU cache with per-entry TTL, swept by a background mark-and-sweep
//! crawler, served over a small HTTP API.

pub mod api;
pub mod cache;
pub mod config;
pub mod error;
pub mod models;
pub mod tasks;

pub use api::AppState;
pub use cache::{Crawler, LruCache};
pub use config::Config;
pub use tasks::{spawn_crawler_task, CrawlerHandle};
