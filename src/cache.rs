//! In-memory caching using moka
//!
//! The rate table changes rarely (admin edits) but is read on every price
//! calculation, so it is cached with a short TTL and invalidated on writes.

use moka::future::Cache;
use serde::Serialize;
use std::sync::Arc;
use std::time::Duration;
use tracing::info;

use crate::pricing::calculators::RateTable;

const RATES_KEY: &str = "rates";

/// Application cache holding the active rate table snapshot
#[derive(Clone)]
pub struct AppCache {
    /// Rate table snapshot (single entry under RATES_KEY)
    rates: Cache<String, Arc<RateTable>>,
}

impl AppCache {
    /// Create a new cache instance with configured TTLs
    pub fn new() -> Self {
        Self {
            // Rate table: 1 entry, 60s TTL. A rate edit mid-window is
            // picked up at the latest one minute later; writes invalidate
            // immediately.
            rates: Cache::builder()
                .max_capacity(1)
                .time_to_live(Duration::from_secs(60))
                .build(),
        }
    }

    pub async fn get_rates(&self) -> Option<Arc<RateTable>> {
        self.rates.get(RATES_KEY).await
    }

    pub async fn set_rates(&self, table: RateTable) -> Arc<RateTable> {
        let table = Arc::new(table);
        self.rates
            .insert(RATES_KEY.to_string(), Arc::clone(&table))
            .await;
        table
    }

    /// Drop the cached rate table after an admin write
    pub async fn invalidate_rates(&self) {
        self.rates.invalidate(RATES_KEY).await;
        info!("Rate table cache invalidated");
    }

    /// Get cache statistics for startup and diagnostic logging
    pub fn stats(&self) -> CacheStats {
        CacheStats {
            rates_cached: self.rates.entry_count() > 0,
        }
    }
}

impl Default for AppCache {
    fn default() -> Self {
        Self::new()
    }
}

/// Cache statistics, logged after the startup warm-up
#[derive(Debug, Clone, Serialize)]
pub struct CacheStats {
    pub rates_cached: bool,
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    use crate::pricing::calculators::{DayType, TimeSlot};

    #[tokio::test]
    async fn test_rate_cache_roundtrip_and_stats() {
        let cache = AppCache::new();
        assert!(cache.get_rates().await.is_none());
        assert!(!cache.stats().rates_cached);

        let mut table = RateTable::new();
        table.set(DayType::Weekday, TimeSlot::Day, dec!(90));
        cache.set_rates(table.clone()).await;

        assert_eq!(*cache.get_rates().await.unwrap(), table);
        cache.rates.run_pending_tasks().await;
        assert!(cache.stats().rates_cached);
    }

    #[tokio::test]
    async fn test_invalidate_drops_the_snapshot() {
        let cache = AppCache::new();
        cache.set_rates(RateTable::defaults()).await;
        assert!(cache.get_rates().await.is_some());

        cache.invalidate_rates().await;
        assert!(cache.get_rates().await.is_none());
    }
}
