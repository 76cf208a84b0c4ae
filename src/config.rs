//! Environment-driven client configuration.
//!
//! Values are read from the process environment after loading a `.env` file
//! (if one exists), mirroring how the CLI is usually run.

use crate::api::{PollutionClient, DEFAULT_BASE_URL};
use crate::error::{PollutionError, Result};
use std::env::{self, VarError};
use std::time::Duration;
use tracing::{debug, error};

pub const API_KEY_VAR: &str = "OWM_API_KEY";
pub const BASE_URL_VAR: &str = "OWM_BASE_URL";
pub const TIMEOUT_VAR: &str = "OWM_TIMEOUT_SECS";

/// Settings needed to build a `PollutionClient`.
#[derive(Debug, Clone, PartialEq)]
pub struct ClientConfig {
    pub api_key: String,
    pub base_url: String,
    pub timeout: Option<Duration>,
}

impl ClientConfig {
    /// Loads `.env` and reads `OWM_API_KEY`, `OWM_BASE_URL` and `OWM_TIMEOUT_SECS`.
    ///
    /// # Errors
    ///
    /// `Env` when the API key is missing or any variable is not valid unicode,
    /// `Config` when the timeout is not a positive whole number of seconds.
    pub fn from_env() -> Result<Self> {
        dotenv::dotenv().ok();

        let api_key = env::var(API_KEY_VAR).map_err(|e| {
            error!("{} environment variable not set: {}", API_KEY_VAR, e);
            PollutionError::Env(e)
        })?;

        let base_url = optional_var(BASE_URL_VAR)?.unwrap_or_else(|| DEFAULT_BASE_URL.to_string());

        let timeout = match optional_var(TIMEOUT_VAR)? {
            Some(raw) => Some(parse_timeout(&raw)?),
            None => None,
        };

        debug!("Loaded client configuration (base URL {})", base_url);
        Ok(Self {
            api_key,
            base_url,
            timeout,
        })
    }

    /// Builds a client from this configuration. The usual construction checks apply.
    pub fn into_client(self) -> Result<PollutionClient> {
        let mut builder = PollutionClient::builder(self.api_key).base_url(self.base_url);
        if let Some(timeout) = self.timeout {
            builder = builder.timeout(timeout);
        }
        builder.build()
    }
}

/// `None` when the variable is unset. A value that is not valid unicode is an error.
fn optional_var(name: &str) -> Result<Option<String>> {
    match env::var(name) {
        Ok(value) => Ok(Some(value)),
        Err(VarError::NotPresent) => Ok(None),
        Err(e) => {
            error!("{} environment variable is not valid unicode", name);
            Err(PollutionError::Env(e))
        },
    }
}

fn parse_timeout(raw: &str) -> Result<Duration> {
    match raw.trim().parse::<u64>() {
        Ok(secs) if secs > 0 => Ok(Duration::from_secs(secs)),
        _ => Err(PollutionError::Config(format!(
            "{} must be a positive number of seconds, got {:?}",
            TIMEOUT_VAR, raw
        ))),
    }
}
