//! URL templates for the air pollution endpoints.

use crate::models::{Coordinates, HistoricalPollutionQuery, PollutionQuery};

pub const DEFAULT_BASE_URL: &str = "https://api.openweathermap.org/data/2.5";

/// The three air pollution endpoints, relative to the API base URL.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Endpoint {
    Current,
    Forecast,
    Historical,
}

impl Endpoint {
    pub fn path(self) -> &'static str {
        match self {
            Endpoint::Current => "/air_pollution",
            Endpoint::Forecast => "/air_pollution/forecast",
            Endpoint::Historical => "/air_pollution/history",
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Endpoint::Current => "current",
            Endpoint::Forecast => "forecast",
            Endpoint::Historical => "historical",
        }
    }
}

/// Renders a coordinate as the shortest decimal text that parses back to the
/// same `f64`, without exponent notation (`0.0` -> `0`, `10.5` -> `10.5`).
pub fn format_coordinate(value: f64) -> String {
    // f64's Display is already shortest round-trip and never uses exponents.
    format!("{}", value)
}

fn location_url(
    base_url: &str,
    endpoint: Endpoint,
    api_key: &str,
    location: &Coordinates,
) -> String {
    format!(
        "{}{}?appid={}&lat={}&lon={}",
        base_url.trim_end_matches('/'),
        endpoint.path(),
        api_key,
        format_coordinate(location.latitude),
        format_coordinate(location.longitude),
    )
}

pub fn current_url(base_url: &str, api_key: &str, query: &PollutionQuery) -> String {
    location_url(base_url, Endpoint::Current, api_key, &query.location)
}

pub fn forecast_url(base_url: &str, api_key: &str, query: &PollutionQuery) -> String {
    location_url(base_url, Endpoint::Forecast, api_key, &query.location)
}

pub fn historical_url(base_url: &str, api_key: &str, query: &HistoricalPollutionQuery) -> String {
    format!(
        "{}&start={}&end={}",
        location_url(base_url, Endpoint::Historical, api_key, &query.location),
        query.start,
        query.end,
    )
}

/// Replaces the `appid` value so URLs can be logged.
pub fn redact_key(url: &str) -> String {
    match url.find("appid=") {
        Some(pos) => {
            let value_start = pos + "appid=".len();
            let value_end = url[value_start..]
                .find('&')
                .map_or(url.len(), |offset| value_start + offset);
            format!("{}***{}", &url[..value_start], &url[value_end..])
        },
        None => url.to_string(),
    }
}
