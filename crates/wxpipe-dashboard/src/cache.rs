//! Per-process cache of the full `weather_data` load.
//!
//! Switching cities only re-runs the filter; the table is reloaded once the
//! cached copy is older than the configured TTL.

use std::sync::Arc;
use std::time::{Duration, Instant};

use parking_lot::Mutex;
use wxpipe_core::WeatherRecord;

#[derive(Debug)]
struct CachedRecords {
    loaded_at: Instant,
    records: Arc<Vec<WeatherRecord>>,
}

#[derive(Debug)]
pub struct RecordCache {
    ttl: Duration,
    entry: Mutex<Option<CachedRecords>>,
}

impl RecordCache {
    /// A zero `ttl` disables caching.
    pub fn new(ttl: Duration) -> Self {
        Self {
            ttl,
            entry: Mutex::new(None),
        }
    }

    pub fn is_enabled(&self) -> bool {
        !self.ttl.is_zero()
    }

    /// The cached records, if present and younger than the TTL.
    pub fn get(&self) -> Option<Arc<Vec<WeatherRecord>>> {
        if !self.is_enabled() {
            return None;
        }

        self.entry
            .lock()
            .as_ref()
            .filter(|e| e.loaded_at.elapsed() < self.ttl)
            .map(|e| e.records.clone())
    }

    /// Remember a fresh load and hand it back shared.
    pub fn put(&self, records: Vec<WeatherRecord>) -> Arc<Vec<WeatherRecord>> {
        let records = Arc::new(records);
        if self.is_enabled() {
            *self.entry.lock() = Some(CachedRecords {
                loaded_at: Instant::now(),
                records: records.clone(),
            });
        }
        records
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn one() -> Vec<WeatherRecord> {
        vec![WeatherRecord::from_row((1, "Berlin".into(), 1.0, 0.5, "mist".into()))]
    }

    #[test]
    fn test_hit_within_ttl() {
        let cache = RecordCache::new(Duration::from_secs(60));
        assert!(cache.get().is_none());

        cache.put(one());
        assert_eq!(cache.get().map(|r| r.len()), Some(1));
    }

    #[test]
    fn test_expires_after_ttl() {
        let cache = RecordCache::new(Duration::from_millis(20));
        cache.put(one());
        std::thread::sleep(Duration::from_millis(40));
        assert!(cache.get().is_none());
    }

    #[test]
    fn test_zero_ttl_never_caches() {
        let cache = RecordCache::new(Duration::ZERO);
        let shared = cache.put(one());
        assert_eq!(shared.len(), 1);
        assert!(cache.get().is_none());
    }
}
