//! Table output for pollution results.

use crate::models::{AqiLevel, Components, PollutionResult};
use colored::*;
use comfy_table::{presets::UTF8_FULL, Cell, Color, ContentArrangement, Table};

/// Builds a table with one row per entry, in API order.
pub fn build_table(result: &PollutionResult) -> Table {
    let mut header = vec!["Time (UTC)".to_string(), "AQI".to_string(), "Level".to_string()];
    header.extend(Components::NAMES.iter().map(|name| format!("{} µg/m³", name)));

    let mut table = Table::new();
    table.load_preset(UTF8_FULL).set_header(header);

    for entry in &result.entries {
        let time = entry
            .observed_at()
            .map(|t| t.format("%Y-%m-%d %H:%M").to_string())
            .unwrap_or_else(|| entry.timestamp.to_string());
        let level = entry.level();

        let mut row = vec![
            Cell::new(time),
            Cell::new(entry.air_quality_index),
            Cell::new(level).fg(level_color(level)),
        ];
        row.extend(
            entry
                .components
                .named()
                .iter()
                .map(|(_, value)| Cell::new(format!("{:.2}", value))),
        );
        table.add_row(row);
    }

    table
}

pub fn level_color(level: AqiLevel) -> Color {
    match level {
        AqiLevel::Good => Color::Green,
        AqiLevel::Fair => Color::DarkGreen,
        AqiLevel::Moderate => Color::Yellow,
        AqiLevel::Poor => Color::Red,
        AqiLevel::VeryPoor => Color::Magenta,
        AqiLevel::Unknown => Color::Grey,
    }
}

fn colored_level(level: AqiLevel) -> ColoredString {
    let text = level.to_string();
    match level {
        AqiLevel::Good | AqiLevel::Fair => text.green(),
        AqiLevel::Moderate => text.yellow(),
        AqiLevel::Poor | AqiLevel::VeryPoor => text.red().bold(),
        AqiLevel::Unknown => text.dimmed(),
    }
}

pub fn print_result(title: &str, result: &PollutionResult) {
    println!("{}", title.cyan().bold());

    if result.entries.is_empty() {
        println!("{}", "No pollution data returned for this location.".yellow());
        return;
    }

    let mut table = build_table(result);
    table.set_content_arrangement(ContentArrangement::Dynamic);
    println!("{}", table);

    if let Some(worst) = result.worst_entry() {
        println!(
            "{} {} (AQI {}) across {} entries",
            "Worst level:".bold(),
            colored_level(worst.level()),
            worst.air_quality_index,
            result.entries.len()
        );
    }
}
