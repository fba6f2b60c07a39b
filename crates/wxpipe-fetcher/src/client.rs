//! OpenWeatherMap current-weather client.

use std::time::Duration;

use reqwest::{Client, StatusCode};
use tracing::instrument;
use wxpipe_core::error::ReqwestErrorExt;
use wxpipe_core::{FetchError, WeatherApiConfig, WeatherRecord};

use crate::models::parse_record;

const USER_AGENT: &str = concat!("wxpipe/", env!("CARGO_PKG_VERSION"));

#[derive(Debug, Clone)]
pub struct WeatherClient {
    client: Client,
    base_url: String,
    api_key: String,
}

impl WeatherClient {
    pub fn new(config: &WeatherApiConfig) -> Result<Self, FetchError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .user_agent(USER_AGENT)
            .build()
            .map_err(ReqwestErrorExt::into_fetch_error)?;

        Ok(Self {
            client,
            base_url: config.base_url.clone(),
            api_key: config.api_key.clone(),
        })
    }

    /// Fetch the current weather for `city` as a single record.
    ///
    /// Only HTTP 200 counts as success; every other outcome is a classified
    /// `FetchError`. No retries are attempted.
    #[instrument(skip(self), level = "info")]
    pub async fn fetch_current_weather(&self, city: &str) -> Result<WeatherRecord, FetchError> {
        let response = self
            .client
            .get(&self.base_url)
            .query(&[
                ("units", "metric"),
                ("appid", self.api_key.as_str()),
                ("q", city),
            ])
            .send()
            .await
            .map_err(ReqwestErrorExt::into_fetch_error)?;

        let status = response.status();
        tracing::debug!("Weather API responded with {}", status);

        if status != StatusCode::OK {
            let text = response.text().await.unwrap_or_default();
            return Err(classify_status(status, city, text));
        }

        let body = response
            .text()
            .await
            .map_err(ReqwestErrorExt::into_fetch_error)?;
        let record = parse_record(&body)?;

        tracing::info!(
            "Fetched {}: {:.1}°C (feels {:.1}°C), {}",
            record.city,
            record.temperature,
            record.feels_like,
            record.description
        );
        Ok(record)
    }
}

fn classify_status(status: StatusCode, city: &str, body: String) -> FetchError {
    match status {
        StatusCode::UNAUTHORIZED => FetchError::Unauthorized,
        StatusCode::NOT_FOUND => FetchError::CityNotFound(city.to_string()),
        _ => FetchError::Status {
            status: status.as_u16(),
            message: body,
        },
    }
}

/// Build a client from `config` and fetch `city` once.
pub async fn fetch_current_weather(
    config: &WeatherApiConfig,
    city: &str,
) -> Result<WeatherRecord, FetchError> {
    WeatherClient::new(config)?.fetch_current_weather(city).await
}
