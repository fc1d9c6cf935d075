//! Background Tasks Module
//!
//! Contains background tasks that run periodically during node operation.
//!
//! # Tasks
//! - TTL Crawler: runs mark-and-sweep cycles at the configured interval

mod crawl;

pub use crawl::{spawn_crawler_task, CrawlerHandle};
