//! CLI entry point for the feed checker.
//!
//! Checks a list of transit feed URLs against the Transitland and
//! TransitFeeds registries and reports which URLs neither one lists.

mod logging;

use anyhow::Result;
use clap::Parser;
use feed_checker::check::check;
use feed_checker::config::RegistryConfig;
use feed_checker::infra::transitfeeds::TransitFeedsClient;
use feed_checker::infra::transitland::TransitlandClient;
use feed_checker::input::InputSource;
use feed_checker::report::{Summary, save_json};
use feed_checker::services::registry_api::RegistryApi;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::{info, warn};

#[derive(Parser)]
#[command(name = "feed_checker")]
#[command(
    about = "Check which transit feed URLs are listed by Transitland and TransitFeeds",
    long_about = None
)]
struct Cli {
    /// A yml file containing urls
    #[arg(value_name = "MANIFEST", default_value = "agencies.yml")]
    yml_file: PathBuf,

    /// A csv file (one url per line)
    #[arg(long)]
    csv_file: Option<PathBuf>,

    /// URL to check instead of a file
    #[arg(long)]
    url: Option<String>,

    /// Path to a file to save output to
    #[arg(long)]
    output: Option<PathBuf>,

    /// Print every missing url instead of the found count
    #[arg(long, default_value_t = false)]
    verbose: bool,

    /// Exit with status 1 when any url is missing from both registries
    #[arg(long, default_value_t = false)]
    fail_on_missing: bool,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<ExitCode> {
    dotenvy::dotenv().ok(); // Load .env file

    let _log_guard = logging::init()?;

    let cli = Cli::parse();

    let source = InputSource::select(
        cli.url.as_deref(),
        cli.csv_file.as_deref(),
        &cli.yml_file,
    );

    let config = RegistryConfig::from_env()?;
    let transitland = TransitlandClient::from_config(&config)?;
    let transitfeeds = TransitFeedsClient::from_config(&config)?;
    let registries: [&dyn RegistryApi; 2] = [&transitland, &transitfeeds];

    let results = check(&source, &registries).await?;

    let summary = Summary::from_results(&results);
    summary.write_to(&mut std::io::stdout().lock(), cli.verbose)?;
    info!(
        total = summary.total,
        matched = summary.matched,
        missing = summary.missing.len(),
        "Check complete"
    );

    if let Some(output) = &cli.output {
        save_json(output, &results)?;
        println!("Results saved to {}", output.display());
    }

    if cli.fail_on_missing && summary.has_missing() {
        warn!(missing = summary.missing.len(), "Some urls are missing from both registries");
        return Ok(ExitCode::FAILURE);
    }

    Ok(ExitCode::SUCCESS)
}
