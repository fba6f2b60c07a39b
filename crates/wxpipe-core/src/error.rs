//! Centralized error types for wxpipe.
//!
//! This module provides a typed error hierarchy that:
//! - Classifies upstream weather API failures instead of swallowing them
//! - Provides user-friendly messages suitable for the dashboard and CLI
//! - Preserves full error context for logging

use thiserror::Error;

/// Top-level application error type.
///
/// Use `user_message()` to get a message suitable for display.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Fetch error: {0}")]
    Fetch(#[from] FetchError),

    #[error("Database error: {0}")]
    Database(#[from] DatabaseError),

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),
}

impl AppError {
    pub fn user_message(&self) -> &'static str {
        match self {
            AppError::Fetch(e) => e.user_message(),
            AppError::Database(e) => e.user_message(),
            AppError::Config(e) => e.user_message(),
        }
    }
}

/// Failures of the current-weather fetch.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("Request timed out")]
    Timeout,

    #[error("Connection failed: {0}")]
    Connection(String),

    #[error("Unauthorized - API key missing or invalid")]
    Unauthorized,

    #[error("City not found: {0}")]
    CityNotFound(String),

    #[error("Weather API error: {status} - {message}")]
    Status { status: u16, message: String },

    #[error("Malformed payload: {0}")]
    MalformedPayload(String),

    #[error("Response contained no weather conditions")]
    EmptyConditions,
}

impl FetchError {
    pub fn user_message(&self) -> &'static str {
        match self {
            FetchError::Timeout => "The weather service did not answer in time.",
            FetchError::Connection(_) => {
                "Unable to reach the weather service. Check your internet connection."
            }
            FetchError::Unauthorized => "Weather API key is missing or invalid. Check WEATHER_APIKEY.",
            FetchError::CityNotFound(_) => "The weather service does not know this city.",
            FetchError::Status { status, .. } if *status >= 500 => {
                "The weather service is experiencing issues. Please try again later."
            }
            FetchError::Status { .. } => "The weather request was rejected.",
            FetchError::MalformedPayload(_) | FetchError::EmptyConditions => {
                "The weather service returned an unexpected response."
            }
        }
    }

    /// HTTP status behind this error, if the upstream answered at all.
    pub fn status(&self) -> Option<u16> {
        match self {
            FetchError::Unauthorized => Some(401),
            FetchError::CityNotFound(_) => Some(404),
            FetchError::Status { status, .. } => Some(*status),
            _ => None,
        }
    }
}

/// Database/storage errors.
#[derive(Debug, Error)]
pub enum DatabaseError {
    #[error("Database connection failed: {0}")]
    ConnectionFailed(String),

    #[error("Query failed: {0}")]
    QueryFailed(String),

    #[error("Data corruption detected: {0}")]
    Corruption(String),

    #[error("Query timed out after {0} seconds")]
    Timeout(u64),
}

impl DatabaseError {
    pub fn user_message(&self) -> &'static str {
        match self {
            DatabaseError::ConnectionFailed(_) => {
                "Unable to connect to the weather database. Check DBCONN."
            }
            DatabaseError::QueryFailed(_) => "Loading weather data failed. Please try again.",
            DatabaseError::Corruption(_) => "The weather database appears to be corrupted.",
            DatabaseError::Timeout(_) => "The weather database did not answer in time.",
        }
    }
}

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid configuration: {0}")]
    Invalid(String),

    #[error("Configuration parse error: {0}")]
    ParseError(String),
}

impl ConfigError {
    pub fn user_message(&self) -> &'static str {
        match self {
            ConfigError::Invalid(_) => "Invalid configuration. Check your settings.",
            ConfigError::ParseError(_) => "Configuration file is malformed. Check your settings.",
        }
    }
}

/// Extension trait for converting reqwest errors to our error types.
pub trait ReqwestErrorExt {
    fn into_fetch_error(self) -> FetchError;
}

impl ReqwestErrorExt for reqwest::Error {
    fn into_fetch_error(self) -> FetchError {
        if self.is_timeout() {
            FetchError::Timeout
        } else if self.is_decode() {
            FetchError::MalformedPayload(self.to_string())
        } else if let Some(status) = self.status() {
            FetchError::Status {
                status: status.as_u16(),
                message: self.to_string(),
            }
        } else {
            FetchError::Connection(self.to_string())
        }
    }
}

/// Extension trait for converting rusqlite errors to our error types.
pub trait RusqliteErrorExt {
    fn into_database_error(self) -> DatabaseError;
}

impl RusqliteErrorExt for rusqlite::Error {
    fn into_database_error(self) -> DatabaseError {
        match &self {
            rusqlite::Error::SqliteFailure(err, _)
                if err.code == rusqlite::ErrorCode::DatabaseCorrupt
                    || err.code == rusqlite::ErrorCode::NotADatabase =>
            {
                DatabaseError::Corruption(self.to_string())
            }
            rusqlite::Error::SqliteFailure(err, _)
                if err.code == rusqlite::ErrorCode::CannotOpen =>
            {
                DatabaseError::ConnectionFailed(self.to_string())
            }
            rusqlite::Error::SqliteFailure(_, Some(msg)) if msg.contains("corrupt") => {
                DatabaseError::Corruption(self.to_string())
            }
            _ => DatabaseError::QueryFailed(self.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_app_error_conversion() {
        let app_err: AppError = FetchError::Unauthorized.into();
        assert!(matches!(app_err, AppError::Fetch(FetchError::Unauthorized)));
    }

    #[test]
    fn test_user_message_propagation() {
        let app_err = AppError::Database(DatabaseError::ConnectionFailed("x".into()));
        assert_eq!(
            app_err.user_message(),
            "Unable to connect to the weather database. Check DBCONN."
        );
    }

    #[test]
    fn test_config_error_conversion() {
        let app_err: AppError = ConfigError::Invalid("weather.city: City must not be empty".into()).into();
        assert!(matches!(app_err, AppError::Config(ConfigError::Invalid(_))));
        assert_eq!(app_err.user_message(), "Invalid configuration. Check your settings.");
    }

    #[test]
    fn test_server_status_gets_retry_later_message() {
        let err = FetchError::Status {
            status: 503,
            message: "unavailable".into(),
        };
        assert!(err.user_message().contains("try again later"));
        assert_eq!(err.status(), Some(503));
    }

    #[test]
    fn test_status_of_transport_errors_is_none() {
        assert_eq!(FetchError::Timeout.status(), None);
        assert_eq!(FetchError::EmptyConditions.status(), None);
        assert_eq!(FetchError::Unauthorized.status(), Some(401));
    }

    #[test]
    fn test_not_a_database_maps_to_corruption() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("garbage.db");
        std::fs::write(&path, vec![b'x'; 4096]).unwrap();

        let conn = rusqlite::Connection::open(&path).unwrap();
        let err = conn
            .query_row("SELECT COUNT(*) FROM sqlite_master", [], |row| row.get::<_, i64>(0))
            .unwrap_err();

        assert!(matches!(err.into_database_error(), DatabaseError::Corruption(_)));
    }
}
