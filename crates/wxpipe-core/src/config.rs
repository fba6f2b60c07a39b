use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use url::Url;

use crate::error::ConfigError;

/// Cities offered by the dashboard selection control.
pub const CITY_OPTIONS: [&str; 3] = ["Berlin", "Sydney", "Tokyo"];

/// Environment variable holding the weather API key
pub const ENV_API_KEY: &str = "WEATHER_APIKEY";
/// Environment variable holding the database connection string
pub const ENV_DB_CONN: &str = "DBCONN";

/// Configuration validation errors
#[derive(Debug, Clone)]
pub struct ConfigValidationError {
    pub field: String,
    pub message: String,
}

impl std::fmt::Display for ConfigValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

/// Result of config validation
#[derive(Debug, Clone, Default)]
pub struct ValidationResult {
    pub errors: Vec<ConfigValidationError>,
    pub warnings: Vec<ConfigValidationError>,
}

impl ValidationResult {
    /// Returns true if there are no errors (warnings are OK)
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn add_error(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.errors.push(ConfigValidationError {
            field: field.into(),
            message: message.into(),
        });
    }

    pub fn add_warning(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.warnings.push(ConfigValidationError {
            field: field.into(),
            message: message.into(),
        });
    }

    /// Get a single line summarizing all errors
    pub fn error_summary(&self) -> String {
        self.errors
            .iter()
            .map(|e| e.to_string())
            .collect::<Vec<_>>()
            .join("; ")
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Weather API settings (fetcher)
    #[serde(default)]
    pub weather: WeatherApiConfig,

    /// Relational store settings (dashboard, fetcher with --store)
    #[serde(default)]
    pub database: DatabaseConfig,

    /// Dashboard server settings
    #[serde(default)]
    pub dashboard: DashboardConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WeatherApiConfig {
    /// OpenWeatherMap API key. Usually supplied through WEATHER_APIKEY.
    #[serde(default)]
    pub api_key: String,

    /// Current-weather endpoint
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// City fetched when no city is given on the command line
    #[serde(default = "default_city")]
    pub city: String,

    /// HTTP request timeout in seconds
    #[serde(default = "default_http_timeout")]
    pub timeout_secs: u64,
}

fn default_base_url() -> String {
    "http://api.openweathermap.org/data/2.5/weather".to_string()
}

fn default_city() -> String {
    "Berlin".to_string()
}

fn default_http_timeout() -> u64 {
    10
}

impl Default for WeatherApiConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            base_url: default_base_url(),
            city: default_city(),
            timeout_secs: default_http_timeout(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    /// SQLite connection string: a file path or `:memory:`. Usually supplied through DBCONN.
    #[serde(default = "default_connection")]
    pub connection: String,

    /// Upper bound for a single query, in seconds
    #[serde(default = "default_query_timeout")]
    pub query_timeout_secs: u64,
}

fn default_connection() -> String {
    "weather.db".to_string()
}

fn default_query_timeout() -> u64 {
    5
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            connection: default_connection(),
            query_timeout_secs: default_query_timeout(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DashboardConfig {
    /// Address the dashboard listens on
    #[serde(default = "default_bind")]
    pub bind: String,

    /// How long a full table load is reused, in seconds (0 disables caching)
    #[serde(default = "default_cache_seconds")]
    pub cache_seconds: u64,
}

fn default_bind() -> String {
    "127.0.0.1:8501".to_string()
}

fn default_cache_seconds() -> u64 {
    60
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            bind: default_bind(),
            cache_seconds: default_cache_seconds(),
        }
    }
}

impl DashboardConfig {
    pub fn socket_addr(&self) -> Result<SocketAddr> {
        self.bind
            .parse()
            .with_context(|| format!("Invalid dashboard bind address: {}", self.bind))
    }
}

impl Config {
    /// Load configuration from the default location, creating it if it doesn't exist
    pub fn load() -> Result<Self> {
        let config_path = Self::config_path()?;
        Self::load_from(&config_path)
    }

    /// Load configuration from `path`, writing defaults there if the file is missing
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            tracing::info!("No config at {}, writing defaults", path.display());
            let config = Self::default();
            config.save_to(path)?;
            return Ok(config);
        }

        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;

        Ok(Self::from_toml(&contents)?)
    }

    pub fn from_toml(contents: &str) -> Result<Self, ConfigError> {
        toml::from_str(contents).map_err(|e| ConfigError::ParseError(e.to_string()))
    }

    /// Apply WEATHER_APIKEY and DBCONN from the process environment
    pub fn apply_env(&mut self) {
        self.apply_env_with(|key| std::env::var(key).ok());
    }

    /// Apply environment overrides using `lookup` to resolve variable names
    pub fn apply_env_with<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(key) = lookup(ENV_API_KEY).filter(|k| !k.is_empty()) {
            self.weather.api_key = key;
        }
        if let Some(conn) = lookup(ENV_DB_CONN).filter(|c| !c.is_empty()) {
            self.database.connection = conn;
        }
    }

    /// Validate and bail on errors; warnings are logged.
    pub fn ensure_valid(&self) -> Result<ValidationResult, ConfigError> {
        let validation = self.validate();

        if !validation.is_valid() {
            return Err(ConfigError::Invalid(validation.error_summary()));
        }

        for warning in &validation.warnings {
            tracing::warn!("Config warning: {}", warning);
        }

        Ok(validation)
    }

    pub fn validate(&self) -> ValidationResult {
        let mut result = ValidationResult::default();

        self.validate_url(&self.weather.base_url, "weather.base_url", &mut result);

        if self.weather.api_key.is_empty() {
            result.add_warning(
                "weather.api_key",
                format!("No API key configured (set {}); requests will be rejected", ENV_API_KEY),
            );
        }

        if self.weather.city.trim().is_empty() {
            result.add_error("weather.city", "City must not be empty");
        } else if !CITY_OPTIONS.contains(&self.weather.city.as_str()) {
            result.add_warning(
                "weather.city",
                format!(
                    "'{}' is not one of the dashboard cities {:?}; its rows will not be selectable",
                    self.weather.city, CITY_OPTIONS
                ),
            );
        }

        if self.weather.timeout_secs == 0 {
            result.add_error("weather.timeout_secs", "Timeout must be greater than 0");
        }

        if self.database.connection.trim().is_empty() {
            result.add_error("database.connection", "Connection string must not be empty");
        }

        if self.database.query_timeout_secs == 0 {
            result.add_error("database.query_timeout_secs", "Timeout must be greater than 0");
        }

        if self.dashboard.bind.parse::<SocketAddr>().is_err() {
            result.add_error(
                "dashboard.bind",
                format!("Not a socket address: {}", self.dashboard.bind),
            );
        }

        result
    }

    fn validate_url(&self, url_str: &str, field_name: &str, result: &mut ValidationResult) {
        match Url::parse(url_str) {
            Ok(url) => {
                if url.scheme() != "http" && url.scheme() != "https" {
                    result.add_error(
                        field_name,
                        format!("URL must use http or https scheme, got: {}", url.scheme()),
                    );
                }

                if url.host().is_none() {
                    result.add_error(field_name, "URL must have a host");
                }
            }
            Err(e) => {
                result.add_error(field_name, format!("Invalid URL: {}", e));
            }
        }
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).context("Failed to create config directory")?;
        }

        let contents = toml::to_string_pretty(self).context("Failed to serialize config")?;

        std::fs::write(path, contents).context("Failed to write config file")?;

        Ok(())
    }

    /// Get the path to the default configuration file
    pub fn config_path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .context("Failed to get config directory")?
            .join("wxpipe");

        Ok(config_dir.join("config.toml"))
    }
}
