use serde::Deserialize;
use wxpipe_core::{FetchError, WeatherRecord};

/// Subset of the OpenWeatherMap current-weather response the record needs.
///
/// Every field is required: a missing key fails deserialization instead of
/// defaulting.
#[derive(Debug, Deserialize)]
pub struct CurrentWeatherResponse {
    pub dt: i64,
    pub name: String,
    pub main: MainReadings,
    pub weather: Vec<Condition>,
}

#[derive(Debug, Deserialize)]
pub struct MainReadings {
    pub temp: f64,
    pub feels_like: f64,
}

#[derive(Debug, Deserialize)]
pub struct Condition {
    pub description: String,
}

impl TryFrom<CurrentWeatherResponse> for WeatherRecord {
    type Error = FetchError;

    fn try_from(resp: CurrentWeatherResponse) -> Result<Self, Self::Error> {
        let description = resp
            .weather
            .into_iter()
            .next()
            .map(|c| c.description)
            .ok_or(FetchError::EmptyConditions)?;

        Ok(WeatherRecord {
            timestamp: resp.dt,
            city: resp.name,
            temperature: resp.main.temp,
            feels_like: resp.main.feels_like,
            description,
        })
    }
}

/// Parse a 200 response body into a record.
pub fn parse_record(body: &str) -> Result<WeatherRecord, FetchError> {
    let resp: CurrentWeatherResponse =
        serde_json::from_str(body).map_err(|e| FetchError::MalformedPayload(e.to_string()))?;
    WeatherRecord::try_from(resp)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_full_payload_ignores_extra_fields() {
        let body = r#"{
            "coord": {"lon": 13.41, "lat": 52.52},
            "weather": [
                {"id": 800, "main": "Clear", "description": "clear sky", "icon": "01n"},
                {"id": 701, "main": "Mist", "description": "mist", "icon": "50n"}
            ],
            "main": {"temp": 5.2, "feels_like": 2.1, "pressure": 1012, "humidity": 81},
            "dt": 1700000000,
            "name": "Berlin",
            "cod": 200
        }"#;

        let record = parse_record(body).unwrap();
        assert_eq!(record.timestamp, 1_700_000_000);
        assert_eq!(record.city, "Berlin");
        assert_eq!(record.temperature, 5.2);
        assert_eq!(record.feels_like, 2.1);
        assert_eq!(record.description, "clear sky");
    }

    #[test]
    fn test_missing_feels_like_is_malformed() {
        let body = r#"{"dt":1,"name":"Berlin","main":{"temp":5.2},"weather":[{"description":"x"}]}"#;
        assert!(matches!(parse_record(body), Err(FetchError::MalformedPayload(_))));
    }

    #[test]
    fn test_empty_weather_list() {
        let body = r#"{"dt":1,"name":"Berlin","main":{"temp":5.2,"feels_like":2.1},"weather":[]}"#;
        assert!(matches!(parse_record(body), Err(FetchError::EmptyConditions)));
    }

    #[test]
    fn test_non_json_body() {
        assert!(matches!(parse_record("<html>"), Err(FetchError::MalformedPayload(_))));
    }
}
