//! warp routes for the dashboard.
//!
//! - `GET /?city=<name>` renders the HTML page
//! - `GET /api/records?city=<name>` returns the filtered records as JSON

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use warp::http::StatusCode;
use warp::{Filter, Rejection, Reply};
use wxpipe_core::{filter_by_city, RecordTable, WeatherRecord, CITY_OPTIONS};

use crate::render::{render_page, PageBody};
use crate::state::DashboardState;

#[derive(Debug, Default, Deserialize)]
pub struct CityQuery {
    pub city: Option<String>,
}

#[derive(Debug, Serialize)]
struct RecordsResponse<'a> {
    city: &'a str,
    records: Vec<WeatherRecord>,
}

#[derive(Debug, Serialize)]
struct ErrorResponse<'a> {
    error: &'a str,
    detail: String,
}

/// Resolve the requested city against the closed selection set.
///
/// No value selects the first option; an unknown value is returned as `Err`.
pub fn resolve_city(requested: Option<&str>) -> Result<&'static str, String> {
    match requested.map(str::trim).filter(|c| !c.is_empty()) {
        None => Ok(CITY_OPTIONS[0]),
        Some(city) => CITY_OPTIONS
            .iter()
            .copied()
            .find(|option| *option == city)
            .ok_or_else(|| city.to_string()),
    }
}

fn with_state(
    state: Arc<DashboardState>,
) -> impl Filter<Extract = (Arc<DashboardState>,), Error = std::convert::Infallible> + Clone {
    warp::any().map(move || state.clone())
}

pub fn routes(
    state: Arc<DashboardState>,
) -> impl Filter<Extract = (impl Reply,), Error = Rejection> + Clone {
    let page = warp::get()
        .and(warp::path::end())
        .and(warp::query::<CityQuery>())
        .and(with_state(state.clone()))
        .and_then(dashboard_page);

    let api = warp::get()
        .and(warp::path!("api" / "records"))
        .and(warp::query::<CityQuery>())
        .and(with_state(state))
        .and_then(records_api);

    page.or(api).with(warp::trace::request())
}

async fn dashboard_page(
    query: CityQuery,
    state: Arc<DashboardState>,
) -> Result<impl Reply, Rejection> {
    let (selected, body, status) = match resolve_city(query.city.as_deref()) {
        Err(unknown) => {
            tracing::warn!("Rejected unknown city selection: {}", unknown);
            let message = format!(
                "Unknown city '{}'. Choose one of {}.",
                unknown,
                CITY_OPTIONS.join(", ")
            );
            (CITY_OPTIONS[0], PageBody::Error(message), StatusCode::BAD_REQUEST)
        }
        Ok(city) => match state.records().await {
            Ok(records) => {
                let filtered = filter_by_city(&records, city);
                tracing::debug!("{} of {} records match {}", filtered.len(), records.len(), city);
                (
                    city,
                    PageBody::Table(RecordTable::from_records(&filtered)),
                    StatusCode::OK,
                )
            }
            Err(e) => {
                tracing::error!("Loading weather data failed: {}", e);
                (
                    city,
                    PageBody::Error(e.user_message().to_string()),
                    StatusCode::OK,
                )
            }
        },
    };

    Ok(warp::reply::with_status(
        warp::reply::html(render_page(selected, &body)),
        status,
    ))
}

async fn records_api(
    query: CityQuery,
    state: Arc<DashboardState>,
) -> Result<impl Reply, Rejection> {
    let city = match resolve_city(query.city.as_deref()) {
        Ok(city) => city,
        Err(unknown) => {
            let body = ErrorResponse {
                error: "unknown city",
                detail: unknown,
            };
            return Ok(warp::reply::with_status(
                warp::reply::json(&body),
                StatusCode::BAD_REQUEST,
            ));
        }
    };

    match state.records().await {
        Ok(records) => {
            let body = RecordsResponse {
                city,
                records: filter_by_city(&records, city),
            };
            Ok(warp::reply::with_status(
                warp::reply::json(&body),
                StatusCode::OK,
            ))
        }
        Err(e) => {
            tracing::error!("Loading weather data failed: {}", e);
            let body = ErrorResponse {
                error: e.user_message(),
                detail: e.to_string(),
            };
            Ok(warp::reply::with_status(
                warp::reply::json(&body),
                StatusCode::SERVICE_UNAVAILABLE,
            ))
        }
    }
}
