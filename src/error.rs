//! Defines the crate's primary error type `PollutionError` and a convenience `Result` alias.
//!
//! Uses the `thiserror` crate for ergonomic error definition and provides `From`
//! implementations to convert common external errors into `PollutionError` variants.
//! Errors that do not implement `Clone` are wrapped in `Arc` to allow `PollutionError`
//! to be cloneable.

use std::sync::Arc;
use thiserror::Error;

/// The primary error enumeration for the pollution client and its CLI.
#[derive(Error, Debug, Clone)]
pub enum PollutionError {
    /// The API key is empty, or the API rejected it with `401 Unauthorized`.
    #[error("invalid API key")]
    InvalidKey,

    /// A `None` option was handed to the client builder.
    #[error("invalid option")]
    InvalidOption,

    /// A `None` HTTP client was handed to the client builder.
    #[error("invalid http client")]
    InvalidHttpClient,

    /// Transport failure from the `reqwest` backed HTTP client.
    #[error("HTTP Error: {0}")]
    Http(Arc<reqwest::Error>),

    /// Transport failure reported by a custom `HttpGet` implementation.
    #[error("Transport Error: {0}")]
    Transport(String),

    /// Error during JSON decoding (`serde_json`). Wrapped in Arc as serde_json::Error is not Clone.
    #[error("JSON Parsing Error: {0}")]
    JsonParse(Arc<serde_json::Error>),

    /// The API answered with a non-success status other than 401.
    #[error("API returned status {status}: {message}")]
    UnexpectedStatus { status: u16, message: String },

    /// Invalid configuration value (e.g. an unparsable timeout).
    #[error("Configuration Error: {0}")]
    Config(String),

    /// Error related to accessing environment variables.
    #[error("Environment Error: {0}")]
    Env(#[from] std::env::VarError),

    /// Error related to standard I/O operations.
    #[error("I/O Error: {0}")]
    Io(Arc<std::io::Error>),

    /// Error specific to CLI logic or argument handling.
    #[error("CLI Error: {0}")]
    Cli(String),

    /// Error originating from user interaction prompts (`dialoguer`).
    #[error("Dialoguer Error: {0}")]
    Dialoguer(Arc<dialoguer::Error>),

    /// Error related to progress bar style templating (`indicatif`).
    #[error("Progress Style Template Error: {0}")]
    Template(Arc<indicatif::style::TemplateError>),
}

/// A specialized `Result` type using the crate's `PollutionError`.
pub type Result<T> = std::result::Result<T, PollutionError>;

// --- From implementations ---

impl From<reqwest::Error> for PollutionError {
    fn from(err: reqwest::Error) -> Self {
        PollutionError::Http(Arc::new(err))
    }
}

impl From<serde_json::Error> for PollutionError {
    fn from(err: serde_json::Error) -> Self {
        PollutionError::JsonParse(Arc::new(err))
    }
}

impl From<std::io::Error> for PollutionError {
    fn from(err: std::io::Error) -> Self {
        PollutionError::Io(Arc::new(err))
    }
}

impl From<dialoguer::Error> for PollutionError {
    fn from(err: dialoguer::Error) -> Self {
        PollutionError::Dialoguer(Arc::new(err))
    }
}

impl From<indicatif::style::TemplateError> for PollutionError {
    fn from(err: indicatif::style::TemplateError) -> Self {
        PollutionError::Template(Arc::new(err))
    }
}
