//! The weather record shared by the fetcher and the dashboard.

use serde::{Deserialize, Serialize};

/// Column names of the `weather_data` table, in record field order.
pub const COLUMNS: [&str; 5] = ["date", "city", "temp", "feels", "description"];

/// Ordered tuple view of a record: `(date, city, temp, feels, description)`.
pub type WeatherRow = (i64, String, f64, f64, String);

/// A single current-weather observation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeatherRecord {
    /// Observation time in seconds since the Unix epoch
    pub timestamp: i64,
    /// City name as reported by the API
    pub city: String,
    /// Temperature in degrees Celsius
    pub temperature: f64,
    /// Feels-like temperature in degrees Celsius
    pub feels_like: f64,
    /// Weather condition label, e.g. "clear sky"
    pub description: String,
}

impl WeatherRecord {
    pub fn into_row(self) -> WeatherRow {
        (
            self.timestamp,
            self.city,
            self.temperature,
            self.feels_like,
            self.description,
        )
    }

    pub fn from_row(row: WeatherRow) -> Self {
        let (timestamp, city, temperature, feels_like, description) = row;
        Self {
            timestamp,
            city,
            temperature,
            feels_like,
            description,
        }
    }

    /// Render the record as a JSON array in column order.
    pub fn to_json_row(&self) -> serde_json::Result<String> {
        serde_json::to_string(&self.clone().into_row())
    }
}

/// Keep only the records whose city equals `city` exactly.
///
/// Matching is case-sensitive with no normalization, so "berlin" does not
/// select rows stored as "Berlin". A city with no rows yields an empty vector.
pub fn filter_by_city(records: &[WeatherRecord], city: &str) -> Vec<WeatherRecord> {
    records.iter().filter(|r| r.city == city).cloned().collect()
}
