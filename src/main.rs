use anyhow::Context;
use clap::Parser;
use colored::*;
use owm_pollution::cli::{self, App, Cli, OutputFormat};
use std::path::Path;
use tracing::{error, info};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Cli::parse();

    // Keep the guard alive so buffered file logs are flushed on exit
    let _guard = init_logging(&args)?;

    info!("Initializing air pollution client...");

    let output = if args.json {
        OutputFormat::Json
    } else {
        OutputFormat::Table
    };

    let app = match App::new(output) {
        Ok(app) => {
            info!("Application initialized successfully.");
            app
        },
        Err(e) => {
            error!("Failed to initialize application: {:?}", e);
            eprintln!(
                "{}",
                "Error: Failed to initialize application. Is OWM_API_KEY set?".red()
            );
            return Err(e.into());
        },
    };

    match args.command {
        Some(command) => app
            .run_command(command)
            .await
            .context("Air pollution lookup failed")?,
        None => cli::run_menu(&app).await?,
    }

    Ok(())
}

fn init_logging(args: &Cli) -> anyhow::Result<Option<WorkerGuard>> {
    let (file_layer, guard) = match &args.log_file {
        Some(path) => {
            let dir = path
                .parent()
                .filter(|p| !p.as_os_str().is_empty())
                .unwrap_or_else(|| Path::new("."));
            let file_name = path
                .file_name()
                .with_context(|| format!("--log-file {} does not name a file", path.display()))?;
            let (writer, guard) =
                tracing_appender::non_blocking(tracing_appender::rolling::never(dir, file_name));
            (
                Some(fmt::layer().with_ansi(false).with_writer(writer)),
                Some(guard),
            )
        },
        None => (None, None),
    };

    let registry = tracing_subscriber::registry()
        .with(EnvFilter::from_default_env())
        .with(file_layer);

    // Logs go to stderr so `--json` output on stdout stays machine readable
    if args.json_logs {
        registry
            .with(fmt::layer().json().with_writer(std::io::stderr))
            .init();
    } else {
        registry.with(fmt::layer().with_writer(std::io::stderr)).init();
    }

    Ok(guard)
}
