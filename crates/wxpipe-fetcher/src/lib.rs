//! Current-weather fetcher for wxpipe
//!
//! Queries the OpenWeatherMap current-weather endpoint for one city and
//! turns the response into a `WeatherRecord`.

pub mod client;
pub mod models;

pub use client::{fetch_current_weather, WeatherClient};
pub use wxpipe_core::{FetchError, WeatherRecord};
