//! SQLite-backed `weather_data` table.
//!
//! `WeatherStore` owns a single connection; dropping the store closes it.
//! Readers go through `open_read_only`, which never creates a file or a
//! table. Only `open` (the ingestion writer) creates the schema. Rows use the column order `date, city, temp, feels, description`, the
//! same order as `WeatherRecord` fields.

use std::path::Path;
use std::time::Duration;

use rusqlite::{params, Connection, ErrorCode, OpenFlags};
use wxpipe_core::error::RusqliteErrorExt;
use wxpipe_core::{DatabaseConfig, DatabaseError, WeatherRecord};

const SELECT_ALL: &str = "SELECT date, city, temp, feels, description FROM weather_data";

pub struct WeatherStore {
    conn: Connection,
    query_timeout_secs: u64,
}

impl WeatherStore {
    /// Open the database named by `config.connection` for writing, creating
    /// the file and the schema if needed.
    pub fn open(config: &DatabaseConfig) -> Result<Self, DatabaseError> {
        let opened = if config.connection == ":memory:" {
            Connection::open_in_memory()
        } else {
            Connection::open(Path::new(&config.connection))
        };
        let conn = opened.map_err(|e| DatabaseError::ConnectionFailed(e.to_string()))?;

        conn.busy_timeout(Duration::from_secs(config.query_timeout_secs))
            .map_err(RusqliteErrorExt::into_database_error)?;

        let store = Self {
            conn,
            query_timeout_secs: config.query_timeout_secs,
        };
        store.init_schema()?;
        tracing::debug!("Opened weather store at {}", config.connection);
        Ok(store)
    }

    /// Open an existing database without write access.
    ///
    /// A missing file is a `ConnectionFailed`; a missing `weather_data` table
    /// surfaces as `QueryFailed` on the first read.
    pub fn open_read_only(config: &DatabaseConfig) -> Result<Self, DatabaseError> {
        let conn = Connection::open_with_flags(
            Path::new(&config.connection),
            OpenFlags::SQLITE_OPEN_READ_ONLY,
        )
        .map_err(|e| DatabaseError::ConnectionFailed(format!("{}: {}", config.connection, e)))?;

        conn.busy_timeout(Duration::from_secs(config.query_timeout_secs))
            .map_err(RusqliteErrorExt::into_database_error)?;

        tracing::debug!("Opened weather store read-only at {}", config.connection);
        Ok(Self {
            conn,
            query_timeout_secs: config.query_timeout_secs,
        })
    }

    /// Create an in-memory store (for testing).
    pub fn in_memory() -> Result<Self, DatabaseError> {
        let conn =
            Connection::open_in_memory().map_err(|e| DatabaseError::ConnectionFailed(e.to_string()))?;
        let store = Self {
            conn,
            query_timeout_secs: DatabaseConfig::default().query_timeout_secs,
        };
        store.init_schema()?;
        Ok(store)
    }

    fn init_schema(&self) -> Result<(), DatabaseError> {
        self.conn
            .execute_batch(
                r#"
                CREATE TABLE IF NOT EXISTS weather_data (
                    date INTEGER NOT NULL,
                    city TEXT NOT NULL,
                    temp REAL NOT NULL,
                    feels REAL NOT NULL,
                    description TEXT NOT NULL
                );
                "#,
            )
            .map_err(RusqliteErrorExt::into_database_error)
    }

    /// A lock held past the busy timeout is reported as a query timeout.
    fn read_error(&self, err: rusqlite::Error) -> DatabaseError {
        match &err {
            rusqlite::Error::SqliteFailure(e, _) if e.code == ErrorCode::DatabaseBusy => {
                DatabaseError::Timeout(self.query_timeout_secs)
            }
            _ => err.into_database_error(),
        }
    }

    fn row_to_record(row: &rusqlite::Row) -> rusqlite::Result<WeatherRecord> {
        Ok(WeatherRecord::from_row((
            row.get(0)?,
            row.get(1)?,
            row.get(2)?,
            row.get(3)?,
            row.get(4)?,
        )))
    }

    /// Every row of `weather_data`, in storage order, with no limit.
    pub fn load_all_records(&self) -> Result<Vec<WeatherRecord>, DatabaseError> {
        let mut stmt = self
            .conn
            .prepare(SELECT_ALL)
            .map_err(|e| self.read_error(e))?;

        let rows = stmt
            .query_map([], Self::row_to_record)
            .map_err(|e| self.read_error(e))?;

        rows.collect::<Result<Vec<_>, _>>()
            .map_err(|e| self.read_error(e))
    }

    pub fn insert_record(&self, record: &WeatherRecord) -> Result<(), DatabaseError> {
        self.conn
            .execute(
                "INSERT INTO weather_data (date, city, temp, feels, description)
                 VALUES (?1, ?2, ?3, ?4, ?5)",
                params![
                    record.timestamp,
                    record.city,
                    record.temperature,
                    record.feels_like,
                    record.description,
                ],
            )
            .map_err(RusqliteErrorExt::into_database_error)?;
        Ok(())
    }

    pub fn count(&self) -> Result<usize, DatabaseError> {
        let count: i64 = self
            .conn
            .query_row("SELECT COUNT(*) FROM weather_data", [], |row| row.get(0))
            .map_err(RusqliteErrorExt::into_database_error)?;
        Ok(count as usize)
    }
}

/// Open the configured database read-only, read every record, and close the connection.
pub fn load_all_records(config: &DatabaseConfig) -> Result<Vec<WeatherRecord>, DatabaseError> {
    let store = WeatherStore::open_read_only(config)?;
    let records = store.load_all_records()?;
    tracing::debug!("Loaded {} weather records", records.len());
    Ok(records)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(ts: i64, city: &str, temp: f64) -> WeatherRecord {
        WeatherRecord {
            timestamp: ts,
            city: city.to_string(),
            temperature: temp,
            feels_like: temp - 2.5,
            description: "light rain".to_string(),
        }
    }

    #[test]
    fn test_empty_table() {
        let store = WeatherStore::in_memory().unwrap();
        assert!(store.load_all_records().unwrap().is_empty());
        assert_eq!(store.count().unwrap(), 0);
    }

    #[test]
    fn test_insert_then_load_preserves_values_and_order() {
        let store = WeatherStore::in_memory().unwrap();
        let records = vec![
            record(1_700_000_000, "Berlin", 5.2),
            record(1_700_000_060, "Tokyo", 14.75),
            record(1_700_000_120, "Berlin", -0.1),
        ];
        for r in &records {
            store.insert_record(r).unwrap();
        }

        assert_eq!(store.load_all_records().unwrap(), records);
        assert_eq!(store.count().unwrap(), 3);
    }

    #[test]
    fn test_schema_init_is_idempotent() {
        let store = WeatherStore::in_memory().unwrap();
        store.insert_record(&record(1, "Sydney", 22.0)).unwrap();
        store.init_schema().unwrap();
        assert_eq!(store.count().unwrap(), 1);
    }

    #[test]
    fn test_memory_connection_string_for_writer() {
        let config = DatabaseConfig {
            connection: ":memory:".to_string(),
            query_timeout_secs: 1,
        };
        let store = WeatherStore::open(&config).unwrap();
        assert!(store.load_all_records().unwrap().is_empty());
    }

    #[test]
    fn test_read_of_missing_file_fails_without_creating_it() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("wether.db");
        let config = DatabaseConfig {
            connection: path.to_string_lossy().into_owned(),
            query_timeout_secs: 1,
        };

        let err = load_all_records(&config).unwrap_err();
        assert!(matches!(err, DatabaseError::ConnectionFailed(_)), "got {:?}", err);
        assert!(!path.exists());
    }

    #[test]
    fn test_read_without_weather_table_is_query_failure() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("other.db");
        Connection::open(&path)
            .unwrap()
            .execute_batch("CREATE TABLE readings (x INTEGER);")
            .unwrap();
        let config = DatabaseConfig {
            connection: path.to_string_lossy().into_owned(),
            query_timeout_secs: 1,
        };

        let err = load_all_records(&config).unwrap_err();
        assert!(matches!(err, DatabaseError::QueryFailed(ref m) if m.contains("weather_data")), "got {:?}", err);

        let tables: i64 = Connection::open(&path)
            .unwrap()
            .query_row(
                "SELECT COUNT(*) FROM sqlite_master WHERE name = 'weather_data'",
                [],
                |row| row.get(0),
            )
            .unwrap();
        assert_eq!(tables, 0);
    }

    #[test]
    fn test_unopenable_path_is_connection_failure() {
        let dir = tempfile::tempdir().unwrap();
        let config = DatabaseConfig {
            connection: dir
                .path()
                .join("missing-dir")
                .join("weather.db")
                .to_string_lossy()
                .into_owned(),
            query_timeout_secs: 1,
        };

        let err = load_all_records(&config).unwrap_err();
        assert!(matches!(err, DatabaseError::ConnectionFailed(_)), "got {:?}", err);
    }
}
