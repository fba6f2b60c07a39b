//! Tabular projection of weather records for display.

use chrono::DateTime;
use serde::Serialize;

use crate::record::{WeatherRecord, COLUMNS};

/// Records projected into display strings under the `weather_data` column names.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RecordTable {
    pub columns: [&'static str; 5],
    pub rows: Vec<[String; 5]>,
}

impl RecordTable {
    pub fn from_records(records: &[WeatherRecord]) -> Self {
        let rows = records
            .iter()
            .map(|r| {
                [
                    format_timestamp(r.timestamp),
                    r.city.clone(),
                    format!("{:.2}", r.temperature),
                    format!("{:.2}", r.feels_like),
                    r.description.clone(),
                ]
            })
            .collect();

        Self {
            columns: COLUMNS,
            rows,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }
}

/// Format epoch seconds as UTC `YYYY-MM-DD HH:MM:SS`; out-of-range values print raw.
fn format_timestamp(ts: i64) -> String {
    DateTime::from_timestamp(ts, 0)
        .map(|dt| dt.format("%Y-%m-%d %H:%M:%S").to_string())
        .unwrap_or_else(|| ts.to_string())
}
