//! API Handlers
//!
//! HTTP request handlers for each cache node endpoint. The cache engine locks
//! internally, so handlers call straight into it.

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    Json,
};

use crate::cache::{LruCache, NO_EXPIRY};
use crate::config::Config;
use crate::error::{CacheError, Result};
use crate::models::{
    DeleteResponse, GetResponse, HealthResponse, SetRequest, SetResponse, SnapshotResponse,
    StatsResponse,
};

/// Application state shared across all handlers.
#[derive(Clone)]
pub struct AppState {
    /// Process-wide cache instance
    pub cache: Arc<LruCache<String>>,
    /// TTL applied when a SET omits one
    pub default_ttl: i64,
}

impl AppState {
    /// Creates a new AppState around an existing cache, with no default expiry.
    pub fn new(cache: Arc<LruCache<String>>) -> Self {
        Self {
            cache,
            default_ttl: NO_EXPIRY,
        }
    }

    /// Creates a new AppState with an empty cache sized from the Config.
    pub fn from_config(config: &Config) -> Result<Self> {
        let cache = LruCache::new(config.max_entries)?;
        Ok(Self {
            cache: Arc::new(cache),
            default_ttl: config.default_ttl,
        })
    }
}

/// Handler for PUT /set
///
/// Stores a key-value pair, reporting whether it was an update and what was evicted.
pub async fn set_handler(
    State(state): State<AppState>,
    Json(req): Json<SetRequest>,
) -> Result<Json<SetResponse>> {
    if let Some(error_msg) = req.validate() {
        return Err(CacheError::InvalidRequest(error_msg));
    }

    let ttl = req.ttl.unwrap_or(state.default_ttl);
    let outcome = state.cache.put(&req.key, req.value, ttl);

    Ok(Json(SetResponse::new(req.key, outcome)))
}

/// Handler for GET /get/:key
pub async fn get_handler(
    State(state): State<AppState>,
    Path(key): Path<String>,
) -> Result<Json<GetResponse>> {
    let value = state
        .cache
        .get(&key)
        .ok_or_else(|| CacheError::NotFound(key.clone()))?;

    Ok(Json(GetResponse::new(key, value)))
}

/// Handler for DELETE /del/:key
///
/// Idempotent: a missing key still answers 200.
pub async fn delete_handler(
    State(state): State<AppState>,
    Path(key): Path<String>,
) -> Json<DeleteResponse> {
    let deleted = state.cache.delete(&key);
    Json(DeleteResponse::new(key, deleted))
}

/// Handler for GET /stats
pub async fn stats_handler(State(state): State<AppState>) -> Json<StatsResponse> {
    Json(StatsResponse::new(
        state.cache.stats(),
        state.cache.capacity(),
    ))
}

/// Handler for GET /snapshot
///
/// Exports every live entry for an external persistence collaborator.
pub async fn snapshot_handler(State(state): State<AppState>) -> Json<SnapshotResponse> {
    Json(SnapshotResponse::new(state.cache.snapshot()))
}

/// Handler for GET /health
pub async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse::healthy())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio_test::{assert_err, assert_ok};

    fn test_state() -> AppState {
        AppState::new(Arc::new(LruCache::new(100).unwrap()))
    }

    #[tokio::test]
    async fn test_set_and_get_handler() {
        let state = test_state();

        let req = SetRequest {
            key: "test_key".to_string(),
            value: "test_value".to_string(),
            ttl: None,
        };
        assert_ok!(set_handler(State(state.clone()), Json(req)).await);

        let response = assert_ok!(get_handler(State(state), Path("test_key".to_string())).await);
        assert_eq!(response.value, "test_value");
    }

    #[tokio::test]
    async fn test_set_applies_default_ttl() {
        let mut state = test_state();
        state.default_ttl = 300;

        let req = SetRequest {
            key: "k".to_string(),
            value: "v".to_string(),
            ttl: None,
        };
        set_handler(State(state.clone()), Json(req)).await.unwrap();

        let record = state.cache.snapshot().pop().unwrap();
        assert_eq!(record.ttl_seconds, 300);
    }

    #[tokio::test]
    async fn test_get_nonexistent_key() {
        let state = test_state();

        let result = get_handler(State(state), Path("nonexistent".to_string())).await;
        assert!(matches!(result, Err(CacheError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_delete_handler_idempotent() {
        let state = test_state();
        state.cache.put("to_delete", "value".to_string(), NO_EXPIRY);

        let first = delete_handler(State(state.clone()), Path("to_delete".to_string())).await;
        assert!(first.deleted);

        let second = delete_handler(State(state.clone()), Path("to_delete".to_string())).await;
        assert!(!second.deleted);

        assert_err!(get_handler(State(state), Path("to_delete".to_string())).await);
    }

    #[tokio::test]
    async fn test_stats_handler() {
        let state = test_state();

        let response = stats_handler(State(state)).await;
        assert_eq!(response.hits, 0);
        assert_eq!(response.misses, 0);
        assert_eq!(response.capacity, 100);
    }

    #[tokio::test]
    async fn test_snapshot_handler() {
        let state = test_state();
        state.cache.put("a", "1".to_string(), NO_EXPIRY);
        state.cache.put("b", "2".to_string(), 60);

        let response = snapshot_handler(State(state)).await;
        assert_eq!(response.count, 2);
        assert_eq!(response.entries[0].key, "a");
        assert_eq!(response.entries[1].ttl_seconds, 60);
    }

    #[tokio::test]
    async fn test_health_handler() {
        let response = health_handler().await;
        assert_eq!(response.status, "healthy");
    }

    #[tokio::test]
    async fn test_set_invalid_request() {
        let state = test_state();

        let req = SetRequest {
            key: "".to_string(),
            value: "value".to_string(),
            ttl: None,
        };
        let result = set_handler(State(state), Json(req)).await;
        assert!(matches!(result, Err(CacheError::InvalidRequest(_))));
    }
}
