use std::sync::Arc;
use std::time::Duration;

use wxpipe_core::{Config, DatabaseConfig, DatabaseError, WeatherRecord};

use crate::cache::RecordCache;

/// Shared dashboard state: where to read records from and the cached load.
#[derive(Debug)]
pub struct DashboardState {
    database: DatabaseConfig,
    cache: RecordCache,
}

impl DashboardState {
    pub fn new(database: DatabaseConfig, cache_ttl: Duration) -> Self {
        Self {
            database,
            cache: RecordCache::new(cache_ttl),
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(
            config.database.clone(),
            Duration::from_secs(config.dashboard.cache_seconds),
        )
    }

    /// All records, from the cache when fresh, otherwise from the database.
    ///
    /// The blocking load runs on the blocking pool and is abandoned after
    /// `query_timeout_secs`.
    pub async fn records(&self) -> Result<Arc<Vec<WeatherRecord>>, DatabaseError> {
        if let Some(records) = self.cache.get() {
            tracing::debug!("Serving {} cached records", records.len());
            return Ok(records);
        }

        let database = self.database.clone();
        let timeout_secs = database.query_timeout_secs;
        let task = tokio::task::spawn_blocking(move || wxpipe_store::load_all_records(&database));

        let records = match tokio::time::timeout(Duration::from_secs(timeout_secs), task).await {
            Err(_) => return Err(DatabaseError::Timeout(timeout_secs)),
            Ok(Err(e)) => {
                return Err(DatabaseError::QueryFailed(format!("load task failed: {}", e)))
            }
            Ok(Ok(result)) => result?,
        };

        tracing::info!("Loaded {} records from {}", records.len(), self.database.connection);
        Ok(self.cache.put(records))
    }
}
