//! Interactive menu shown when the binary runs without a subcommand.

use super::{App, Commands, HistoricalArgs, LocationArgs};
use crate::error::Result;
use chrono::{Duration, Utc};
use colored::*;
use dialoguer::{theme::ColorfulTheme, Input, Select};
use tracing::error;

const MENU: [&str; 4] = [
    "Current Air Pollution",
    "Air Pollution Forecast",
    "Historical Air Pollution",
    "Exit",
];

/// Prompts for a latitude/longitude pair.
pub fn prompt_location() -> Result<LocationArgs> {
    let theme = ColorfulTheme::default();
    let lat: f64 = Input::with_theme(&theme)
        .with_prompt("Latitude")
        .default(0.0)
        .validate_with(|v: &f64| in_range(*v, 90.0, "Latitude"))
        .interact_text()?;
    let lon: f64 = Input::with_theme(&theme)
        .with_prompt("Longitude")
        .default(10.0)
        .validate_with(|v: &f64| in_range(*v, 180.0, "Longitude"))
        .interact_text()?;
    Ok(LocationArgs { lat, lon })
}

/// Prompts for a unix-seconds range, defaulting to the last 24 hours.
pub fn prompt_range() -> Result<(i64, i64)> {
    let theme = ColorfulTheme::default();
    let now = Utc::now();
    let start: i64 = Input::with_theme(&theme)
        .with_prompt("Start (unix seconds, UTC)")
        .default((now - Duration::days(1)).timestamp())
        .interact_text()?;
    let end: i64 = Input::with_theme(&theme)
        .with_prompt("End (unix seconds, UTC)")
        .default(now.timestamp())
        .validate_with(move |v: &i64| {
            if *v >= start {
                Ok(())
            } else {
                Err("End must not be before start")
            }
        })
        .interact_text()?;
    Ok((start, end))
}

fn in_range(value: f64, limit: f64, name: &str) -> std::result::Result<(), String> {
    if (-limit..=limit).contains(&value) {
        Ok(())
    } else {
        Err(format!("{} must be between -{} and {}", name, limit, limit))
    }
}

/// Runs the menu loop until the user picks Exit or cancels.
pub async fn run_menu(app: &App) -> Result<()> {
    println!("{}", "Welcome to the Air Pollution CLI!".cyan().bold());

    loop {
        let selection = Select::with_theme(&ColorfulTheme::default())
            .with_prompt("What would you like to look up?")
            .items(&MENU)
            .default(0)
            .interact_opt()? // None on Esc/Ctrl+C
            .unwrap_or(MENU.len() - 1);

        println!("\n---\n");

        let command = match selection {
            0 | 1 => match prompt_location() {
                Ok(location) if selection == 0 => Commands::Current(location),
                Ok(location) => Commands::Forecast(location),
                Err(e) => {
                    println!("{} {}", "Failed to get location:".red(), e);
                    continue;
                },
            },
            2 => {
                let location = match prompt_location() {
                    Ok(l) => l,
                    Err(e) => {
                        println!("{} {}", "Failed to get location:".red(), e);
                        continue;
                    },
                };
                let (start, end) = match prompt_range() {
                    Ok(r) => r,
                    Err(e) => {
                        println!("{} {}", "Failed to get time range:".red(), e);
                        continue;
                    },
                };
                Commands::Historical(HistoricalArgs {
                    location,
                    start,
                    end,
                })
            },
            _ => {
                println!("{}", "Exiting application. Goodbye!".green());
                break;
            },
        };

        if let Err(e) = app.run_command(command).await {
            error!("Command execution failed: {:?}", e);
            println!("{} {}", "Error executing command:".red(), e.to_string().red());
        }

        println!("\n---\n");
    }

    Ok(())
}
