pub mod config;
pub mod error;
pub mod record;
pub mod table;

pub use config::{
    Config, DashboardConfig, DatabaseConfig, ValidationResult, WeatherApiConfig, CITY_OPTIONS,
};
pub use error::{AppError, ConfigError, DatabaseError, FetchError};
pub use record::{filter_by_city, WeatherRecord, WeatherRow, COLUMNS};
pub use table::RecordTable;

use anyhow::Result;

/// Initialize tracing for a wxpipe binary.
///
/// Logs go to stderr so stdout stays reserved for record output.
pub fn init() -> Result<()> {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .try_init()
        .map_err(|e| anyhow::anyhow!("Failed to install tracing subscriber: {}", e))?;

    tracing::debug!("wxpipe core initialized");
    Ok(())
}
