//! Provides a client for the OpenWeatherMap air pollution API.
//!
//! This module defines `PollutionClient`, the builder that validates its
//! configuration, and the three lookups: current, forecast and historical.

use super::endpoints::{self, Endpoint, DEFAULT_BASE_URL};
use super::transport::{default_http_client, HttpGet, HttpResponse};
use crate::error::{PollutionError, Result};
use crate::models::{HistoricalPollutionQuery, PollutionQuery, PollutionResult};
use serde::Deserialize;
use std::fmt;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, error, info, warn};

/// Longest slice of a raw error body carried in `UnexpectedStatus`.
const MAX_ERROR_BODY_CHARS: usize = 200;

/// A single construction-time setting, applied through `PollutionClientBuilder::option`.
pub enum ClientOption {
    /// Replaces the transport.
    HttpClient(Arc<dyn HttpGet>),
    /// Replaces the API base URL (e.g. to point at a mock server).
    BaseUrl(String),
    /// Request timeout for the default transport. Ignored when a transport is injected.
    Timeout(Duration),
}

impl fmt::Debug for ClientOption {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ClientOption::HttpClient(_) => f.write_str("HttpClient(..)"),
            ClientOption::BaseUrl(url) => f.debug_tuple("BaseUrl").field(url).finish(),
            ClientOption::Timeout(t) => f.debug_tuple("Timeout").field(t).finish(),
        }
    }
}

/// Collects the client configuration and validates it once in `build`.
///
/// Setters never fail directly. The first invalid setting is remembered and
/// returned by `build`, so no client is produced from a bad configuration.
pub struct PollutionClientBuilder {
    api_key: String,
    http_client: Option<Arc<dyn HttpGet>>,
    base_url: String,
    timeout: Option<Duration>,
    error: Option<PollutionError>,
}

impl PollutionClientBuilder {
    fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            http_client: None,
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout: None,
            error: None,
        }
    }

    fn fail(mut self, err: PollutionError) -> Self {
        if self.error.is_none() {
            self.error = Some(err);
        }
        self
    }

    /// Applies an option. `None` is rejected with `InvalidOption`.
    pub fn option(self, option: Option<ClientOption>) -> Self {
        match option {
            None => self.fail(PollutionError::InvalidOption),
            Some(ClientOption::HttpClient(client)) => self.with_http_client(Some(client)),
            Some(ClientOption::BaseUrl(url)) => self.base_url(url),
            Some(ClientOption::Timeout(timeout)) => self.timeout(timeout),
        }
    }

    /// Replaces the transport. `None` is rejected with `InvalidHttpClient`.
    pub fn with_http_client(mut self, client: Option<Arc<dyn HttpGet>>) -> Self {
        match client {
            Some(client) => {
                self.http_client = Some(client);
                self
            },
            None => self.fail(PollutionError::InvalidHttpClient),
        }
    }

    pub fn http_client(self, client: impl HttpGet + 'static) -> Self {
        self.with_http_client(Some(Arc::new(client)))
    }

    pub fn base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Validates the configuration and creates the client.
    ///
    /// # Errors
    ///
    /// `InvalidKey` for an empty key, otherwise the first option error recorded.
    pub fn build(self) -> Result<PollutionClient> {
        if self.api_key.is_empty() {
            return Err(PollutionError::InvalidKey);
        }
        if let Some(err) = self.error {
            return Err(err);
        }

        let http: Arc<dyn HttpGet> = match self.http_client {
            Some(client) => {
                if self.timeout.is_some() {
                    warn!("Timeout is ignored when a custom HTTP client is supplied");
                }
                client
            },
            None => Arc::new(default_http_client(self.timeout)?),
        };

        debug!("Created pollution client for {}", self.base_url);
        Ok(PollutionClient {
            api_key: self.api_key,
            base_url: self.base_url,
            http,
        })
    }
}

/// An asynchronous client for the air pollution API.
///
/// Each lookup returns its own `PollutionResult`; the client holds no response
/// state, so it can be cloned or shared between tasks freely.
#[derive(Clone)]
pub struct PollutionClient {
    api_key: String,
    base_url: String,
    http: Arc<dyn HttpGet>,
}

impl fmt::Debug for PollutionClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PollutionClient")
            .field("api_key", &"***")
            .field("base_url", &self.base_url)
            .finish_non_exhaustive()
    }
}

impl PollutionClient {
    /// Creates a client with the default transport and base URL.
    pub fn new(api_key: impl Into<String>) -> Result<Self> {
        Self::builder(api_key).build()
    }

    pub fn builder(api_key: impl Into<String>) -> PollutionClientBuilder {
        PollutionClientBuilder::new(api_key)
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Fetches current air pollution for a location.
    pub async fn current(&self, query: &PollutionQuery) -> Result<PollutionResult> {
        let url = endpoints::current_url(&self.base_url, &self.api_key, query);
        self.fetch(Endpoint::Current, &url).await
    }

    /// Fetches the hourly air pollution forecast for a location.
    pub async fn forecast(&self, query: &PollutionQuery) -> Result<PollutionResult> {
        let url = endpoints::forecast_url(&self.base_url, &self.api_key, query);
        self.fetch(Endpoint::Forecast, &url).await
    }

    /// Fetches historical air pollution for a location between `start` and `end` (unix seconds).
    pub async fn historical(&self, query: &HistoricalPollutionQuery) -> Result<PollutionResult> {
        let url = endpoints::historical_url(&self.base_url, &self.api_key, query);
        self.fetch(Endpoint::Historical, &url).await
    }

    async fn fetch(&self, endpoint: Endpoint, url: &str) -> Result<PollutionResult> {
        let loggable_url = endpoints::redact_key(url);
        info!("Fetching {} air pollution from {}", endpoint.name(), loggable_url);

        let response = self.http.get(url).await.map_err(|e| {
            error!("Request to {} failed: {}", loggable_url, e);
            e
        })?;

        if response.status == reqwest::StatusCode::UNAUTHORIZED.as_u16() {
            warn!("Received 401 from {}. Check the API key.", loggable_url);
            return Err(PollutionError::InvalidKey);
        }

        if !response.is_success() {
            let message = error_message(&response);
            error!(
                "API request to {} failed with status {}: {}",
                loggable_url, response.status, message
            );
            return Err(PollutionError::UnexpectedStatus {
                status: response.status,
                message,
            });
        }

        let result: PollutionResult = serde_json::from_slice(&response.body).map_err(|e| {
            error!("Error parsing {} response JSON: {}", endpoint.name(), e);
            PollutionError::from(e)
        })?;

        debug!(
            "Received {} {} entries for lat={} lon={}",
            result.entries.len(),
            endpoint.name(),
            result.location.latitude,
            result.location.longitude
        );

        Ok(result)
    }
}

/// Error body the API sends alongside non-success statuses.
#[derive(Deserialize)]
struct ApiErrorBody {
    message: Option<String>,
}

fn error_message(response: &HttpResponse) -> String {
    if let Ok(ApiErrorBody {
        message: Some(message),
    }) = serde_json::from_slice(&response.body)
    {
        return message;
    }
    String::from_utf8_lossy(&response.body)
        .chars()
        .take(MAX_ERROR_BODY_CHARS)
        .collect()
}
