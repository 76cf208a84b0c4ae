use super::render;
use crate::api::PollutionClient;
use crate::config::ClientConfig;
use crate::error::{PollutionError, Result};
use crate::models::{Coordinates, HistoricalPollutionQuery, PollutionQuery, PollutionResult};
use clap::{Args, Parser, Subcommand};
use indicatif::{ProgressBar, ProgressStyle};
use std::path::PathBuf;
use std::time::Duration;
use tracing::info;

/// CLI tool for OpenWeatherMap air pollution lookups
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Print results as pretty JSON instead of a table
    #[arg(long, global = true)]
    pub json: bool,

    /// Emit log lines as JSON
    #[arg(long, global = true)]
    pub json_logs: bool,

    /// Also append logs to this file
    #[arg(long, global = true)]
    pub log_file: Option<PathBuf>,

    /// Runs the interactive menu when omitted
    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Current air pollution at a location
    Current(LocationArgs),

    /// Hourly air pollution forecast for a location
    Forecast(LocationArgs),

    /// Historical air pollution at a location
    Historical(HistoricalArgs),
}

#[derive(Args, Debug, Clone)]
pub struct LocationArgs {
    /// Latitude in decimal degrees (-90 to 90)
    #[arg(long, allow_negative_numbers = true)]
    pub lat: f64,

    /// Longitude in decimal degrees (-180 to 180)
    #[arg(long, allow_negative_numbers = true)]
    pub lon: f64,
}

#[derive(Args, Debug, Clone)]
pub struct HistoricalArgs {
    #[command(flatten)]
    pub location: LocationArgs,

    /// Start of the range (unix seconds, UTC)
    #[arg(long)]
    pub start: i64,

    /// End of the range (unix seconds, UTC)
    #[arg(long)]
    pub end: i64,
}

impl LocationArgs {
    fn coordinates(&self) -> Result<Coordinates> {
        validate_location(self.lat, self.lon)?;
        Ok(Coordinates::new(self.lat, self.lon))
    }
}

/// How results are written to stdout.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Table,
    Json,
}

/// CLI application
pub struct App {
    client: PollutionClient,
    output: OutputFormat,
}

impl App {
    /// Create the application from environment configuration.
    pub fn new(output: OutputFormat) -> Result<Self> {
        let client = ClientConfig::from_env()?.into_client()?;
        Ok(Self::with_client(client, output))
    }

    pub fn with_client(client: PollutionClient, output: OutputFormat) -> Self {
        Self { client, output }
    }

    /// Fetch and print the result of one command.
    pub async fn run_command(&self, command: Commands) -> Result<()> {
        let (title, result) = self.execute(command).await?;
        match self.output {
            OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&result)?),
            OutputFormat::Table => render::print_result(&title, &result),
        }
        Ok(())
    }

    /// Validates the arguments, performs the lookup and returns a title for the output.
    pub async fn execute(&self, command: Commands) -> Result<(String, PollutionResult)> {
        match command {
            Commands::Current(args) => {
                let query = PollutionQuery {
                    location: args.coordinates()?,
                };
                let fetch = self.client.current(&query);
                let result = with_spinner("Fetching current air pollution...", fetch).await?;
                let title = format!("Current air pollution at {}", describe(&query.location));
                Ok((title, result))
            },
            Commands::Forecast(args) => {
                let query = PollutionQuery {
                    location: args.coordinates()?,
                };
                let fetch = self.client.forecast(&query);
                let result = with_spinner("Fetching air pollution forecast...", fetch).await?;
                let title = format!("Air pollution forecast for {}", describe(&query.location));
                Ok((title, result))
            },
            Commands::Historical(args) => {
                validate_range(args.start, args.end)?;
                let query = HistoricalPollutionQuery::new(
                    args.location.coordinates()?,
                    args.start,
                    args.end,
                );
                let fetch = self.client.historical(&query);
                let result = with_spinner("Fetching historical air pollution...", fetch).await?;
                let title = format!("Historical air pollution at {}", describe(&query.location));
                Ok((title, result))
            },
        }
    }
}

async fn with_spinner<F>(message: &'static str, fut: F) -> Result<PollutionResult>
where
    F: std::future::Future<Output = Result<PollutionResult>>,
{
    let spinner = ProgressBar::new_spinner();
    spinner.set_style(ProgressStyle::with_template("{spinner:.green} {msg}")?);
    spinner.set_message(message);
    spinner.enable_steady_tick(Duration::from_millis(100));

    let result = fut.await;
    spinner.finish_and_clear();

    if let Ok(result) = &result {
        info!("Lookup returned {} entries", result.entries.len());
    }
    result
}

fn describe(location: &Coordinates) -> String {
    format!("lat {}, lon {}", location.latitude, location.longitude)
}

/// Rejects coordinates outside the valid latitude/longitude ranges.
pub fn validate_location(lat: f64, lon: f64) -> Result<()> {
    if !(-90.0..=90.0).contains(&lat) {
        return Err(PollutionError::Cli(format!(
            "Latitude must be between -90 and 90, got {}",
            lat
        )));
    }
    if !(-180.0..=180.0).contains(&lon) {
        return Err(PollutionError::Cli(format!(
            "Longitude must be between -180 and 180, got {}",
            lon
        )));
    }
    Ok(())
}

/// Rejects time ranges that end before they start.
pub fn validate_range(start: i64, end: i64) -> Result<()> {
    if start > end {
        return Err(PollutionError::Cli(format!(
            "Start ({}) must not be after end ({})",
            start, end
        )));
    }
    Ok(())
}
