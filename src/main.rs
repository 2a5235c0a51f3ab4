use anyhow::{Context, Result};
use clap::Parser;
use listingviz::{runtime, AnalysisConfig};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "listingviz")]
#[command(about = "Chart the New York Airbnb listings dataset", long_about = None)]
struct Args {
    /// Listings CSV file
    #[arg(default_value = "new_york_data.csv")]
    input: PathBuf,

    /// Directory the PNG charts are written to
    #[arg(short, long, default_value = "charts")]
    output_dir: PathBuf,

    /// Optional JSON file overriding analysis parameters
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn init_tracing(verbose: u8) {
    let default_level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_tracing(args.verbose);

    let config = match &args.config {
        Some(path) => AnalysisConfig::load(path)?,
        None => AnalysisConfig::default(),
    };

    let analysis = runtime::run(&args.input, &args.output_dir, &config)
        .context("Failed to chart listings")?;

    println!("{}", analysis.summary());

    Ok(())
}
