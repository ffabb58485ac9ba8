// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Strava ETL command line.
//!
//! Extracts cycling activities from Strava (or a recent raw cache) and
//! writes the summary and path CSVs the dashboard reads.

use anyhow::Context;
use clap::Parser;
use std::path::PathBuf;
use std::process::ExitCode;
use strava_etl::{
    config::Config,
    services::{Pipeline, RunOptions},
    PipelineError,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[derive(Parser, Debug)]
#[command(
    author,
    version,
    about = "Extract Strava cycling activities into CSV tables",
    after_help = "Examples:\n  strava-etl                     # reuse cache if < 24h old\n  \
                  strava-etl --force             # ignore the cache\n  \
                  strava-etl --months 6          # last 6 months\n  \
                  strava-etl --start-date 2025-01-01"
)]
struct Cli {
    /// Force re-extraction (ignore the cache)
    #[arg(short, long)]
    force: bool,

    /// Number of months to extract (30 days each)
    #[arg(short, long, value_parser = clap::value_parser!(u32).range(1..))]
    months: Option<u32>,

    /// Absolute start date (YYYY-MM-DD); overrides --months
    #[arg(long, value_name = "YYYY-MM-DD")]
    start_date: Option<String>,

    /// Stop after extraction, skip transformation
    #[arg(short, long)]
    extract_only: bool,

    /// Cache validity in hours
    #[arg(long)]
    cache_hours: Option<u64>,

    /// Directory for the raw cache and CSV outputs
    #[arg(long)]
    output_dir: Option<PathBuf>,

    /// Fail instead of prompting for an authorization code
    #[arg(long)]
    non_interactive: bool,

    /// Debug logging
    #[arg(short, long)]
    verbose: bool,

    /// Emit logs as JSON lines
    #[arg(long)]
    log_json: bool,
}

impl Cli {
    fn apply(&self, config: &mut Config) {
        if let Some(hours) = self.cache_hours {
            config.cache_hours = hours;
        }
        if let Some(dir) = &self.output_dir {
            config.output_dir = dir.clone();
        }
        if self.non_interactive {
            config.non_interactive = true;
        }
    }

    fn run_options(&self) -> RunOptions {
        RunOptions {
            force: self.force,
            months_back: self.months,
            start_date: self.start_date.clone(),
            extract_only: self.extract_only,
        }
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose, cli.log_json);

    match run(&cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!(error = %format!("{:#}", e), "strava-etl failed");
            let auth_failure = e
                .downcast_ref::<PipelineError>()
                .is_some_and(PipelineError::is_auth_error);
            if auth_failure {
                ExitCode::from(2)
            } else {
                ExitCode::FAILURE
            }
        }
    }
}

async fn run(cli: &Cli) -> anyhow::Result<()> {
    let mut config = Config::from_env().context("Failed to load configuration")?;
    cli.apply(&mut config);
    config.check().context("Invalid configuration")?;

    tracing::info!(
        output_dir = %config.output_dir.display(),
        cache_hours = config.cache_hours,
        months_back = cli.months.unwrap_or(config.months_back),
        "Configuration loaded"
    );

    let pipeline = Pipeline::from_config(config);
    let output = pipeline.run(&cli.run_options()).await?;

    println!("Raw activities: {}", output.raw_file.display());
    if let Some(summary) = &output.summary_file {
        println!("Summary CSV:    {}", summary.display());
    }
    if let Some(paths) = &output.paths_file {
        println!("Paths CSV:      {}", paths.display());
    } else if output.summary_file.is_some() {
        println!("Paths CSV:      (no GPS data)");
    }
    println!(
        "{} cycling activities ({})",
        output.activity_count, output.source
    );
    Ok(())
}

/// Initialize logging on stderr; stdout carries the artifact paths.
fn init_logging(verbose: bool, json: bool) {
    let default_level = if verbose { "strava_etl=debug" } else { "strava_etl=info" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    let json_layer = json.then(|| {
        tracing_subscriber::fmt::layer()
            .json()
            .with_target(false)
            .with_current_span(true)
            .flatten_event(true)
            .with_writer(std::io::stderr)
    });
    let text_layer = (!json).then(|| {
        tracing_subscriber::fmt::layer()
            .with_target(false)
            .with_writer(std::io::stderr)
    });

    tracing_subscriber::registry()
        .with(filter)
        .with(json_layer)
        .with(text_layer)
        .init();
}
