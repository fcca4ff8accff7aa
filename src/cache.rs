//! In-memory cache for computed estimation results
//!
//! Estimation runs are deterministic for a given request, so the serve path
//! caches completed result sequences keyed by the full request shape. The
//! cache is shared across request handlers behind an async `RwLock`; writers
//! only hold the lock long enough to insert.

use crate::types::{DateRange, EstimationResult, GroupDimension, TimeGranularity};
use std::collections::HashMap;
use tokio::sync::RwLock;
use tracing::debug;

/// Full request shape identifying one cached result sequence
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CacheKey {
    pub range: DateRange,
    pub granularity: TimeGranularity,
    pub group_by: Option<GroupDimension>,
}

/// Shared cache of completed estimation runs
#[derive(Default)]
pub struct EstimateCache {
    entries: RwLock<HashMap<CacheKey, Vec<EstimationResult>>>,
}

impl EstimateCache {
    /// Create an empty cache
    pub fn new() -> Self {
        Self::default()
    }

    /// Look up a cached result sequence for a request
    pub async fn get(&self, key: &CacheKey) -> Option<Vec<EstimationResult>> {
        let entries = self.entries.read().await;
        let hit = entries.get(key).cloned();
        if hit.is_some() {
            debug!("Cache hit for {:?}", key);
        }
        hit
    }

    /// Store a completed result sequence
    pub async fn put(&self, key: CacheKey, results: Vec<EstimationResult>) {
        let mut entries = self.entries.write().await;
        entries.insert(key, results);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn key(granularity: TimeGranularity) -> CacheKey {
        CacheKey {
            range: DateRange::new(
                NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
                NaiveDate::from_ymd_opt(2024, 1, 31).unwrap(),
            ),
            granularity,
            group_by: None,
        }
    }

    #[tokio::test]
    async fn test_get_put_roundtrip() {
        let cache = EstimateCache::new();
        let key = key(TimeGranularity::Day);

        assert!(cache.get(&key).await.is_none());
        cache.put(key, vec![]).await;
        assert_eq!(cache.get(&key).await, Some(vec![]));
    }

    #[tokio::test]
    async fn test_distinct_requests_distinct_entries() {
        let cache = EstimateCache::new();
        cache.put(key(TimeGranularity::Day), vec![]).await;

        assert!(cache.get(&key(TimeGranularity::Month)).await.is_none());

        let mut grouped = key(TimeGranularity::Day);
        grouped.group_by = Some(GroupDimension::Service);
        assert!(cache.get(&grouped).await.is_none());
    }

    #[tokio::test]
    async fn test_put_overwrites_existing_entry() {
        let cache = EstimateCache::new();
        let key = key(TimeGranularity::Day);

        let stale = vec![EstimationResult {
            timestamp: NaiveDate::from_ymd_opt(2024, 1, 15).unwrap(),
            group: None,
            service_estimates: vec![],
        }];
        cache.put(key, stale).await;
        cache.put(key, vec![]).await;

        assert_eq!(cache.get(&key).await, Some(vec![]));
    }
}
