//! Client for the OpenWeatherMap air pollution API.
//!
//! `PollutionClient` offers three lookups by coordinates: current pollution,
//! the hourly forecast, and history over a unix-seconds range. Each returns a
//! freshly decoded `PollutionResult`.
//!
//! ```no_run
//! use owm_pollution::{PollutionClient, PollutionQuery};
//!
//! # async fn run() -> owm_pollution::Result<()> {
//! let client = PollutionClient::new("your-api-key")?;
//! let result = client.current(&PollutionQuery::new(52.37, 4.89)).await?;
//! for entry in &result.entries {
//!     println!("{}: AQI {} ({})", entry.timestamp, entry.air_quality_index, entry.level());
//! }
//! # Ok(())
//! # }
//! ```

pub mod api;
pub mod cli;
pub mod config;
pub mod error;
pub mod models;

pub use api::{ClientOption, HttpGet, HttpResponse, PollutionClient, PollutionClientBuilder};
pub use config::ClientConfig;
pub use error::{PollutionError, Result};
pub use models::*;
