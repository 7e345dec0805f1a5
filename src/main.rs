use anyhow::{Context, Result, bail};
use clap::Parser;
use indicatif::{ProgressBar, ProgressStyle};
use std::path::PathBuf;
use std::time::{Duration, Instant};

use poi_harvest::api::HttpTransport;
use poi_harvest::config::{Directory, FileConfig};
use poi_harvest::domain::ScoreTier;
use poi_harvest::output::write_json;
use poi_harvest::pipeline::{Acquisition, CategoryState, Progress, SystemClock};

/// Fetch points of interest from OpenStreetMap and score their accessibility
///
/// Examples:
///   # Restaurants, shops and services across central Paris
///   poi-harvest business
///
///   # Tourist attractions with a custom output file and verbose logs
///   poi-harvest tourist -o attractions.json -v
///
///   # Use a config file (bounding box, Overpass mirrors)
///   poi-harvest transport --config my-settings.toml
#[derive(Parser, Debug)]
#[command(name = "poi-harvest")]
#[command(version, about, long_about = None)]
struct Args {
    /// Directory to build
    #[arg(required_unless_present = "list")]
    directory: Option<Directory>,

    /// Path to config file (optional, auto-searches poi-harvest.toml if not provided)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Output JSON file path (defaults to {directory}.json)
    #[arg(short = 'o', long)]
    output: Option<PathBuf>,

    /// Pause between categories in milliseconds (overrides config)
    #[arg(long)]
    pause_ms: Option<u64>,

    /// Validate TLS certificates of the Overpass mirrors
    #[arg(long)]
    secure: bool,

    /// List the available directories and exit
    #[arg(long)]
    list: bool,

    /// Increase log verbosity (-v info, -vv debug)
    #[arg(short = 'v', long, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn main() -> Result<()> {
    let args = Args::parse();

    let level = match args.verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level)).init();

    if args.list {
        print_directories();
        return Ok(());
    }

    let Some(directory) = args.directory else {
        bail!("Must provide a directory (see --list)");
    };

    let file_config = match args.config {
        Some(ref path) => Some(FileConfig::from_path(path)?),
        None => FileConfig::load(),
    };

    let bbox = file_config
        .as_ref()
        .and_then(|c| c.bbox)
        .unwrap_or_default();
    let overpass = file_config
        .and_then(|c| c.overpass)
        .unwrap_or_default()
        .with_overrides(args.pause_ms, args.secure);

    let output_path = args
        .output
        .clone()
        .unwrap_or_else(|| PathBuf::from(format!("{}.json", directory.name())));

    let config = directory.config();
    let total = config.categories.len() as u64;
    println!("poi-harvest - {} directory", directory.name());
    println!(
        "  Area: {:.4}..{:.4} N, {:.4}..{:.4} E",
        bbox.south(),
        bbox.north(),
        bbox.west(),
        bbox.east()
    );
    println!(
        "  Categories: {}  Overpass mirrors: {}",
        config.categories.len(),
        overpass.urls.len()
    );
    println!();

    let transport = HttpTransport::new(&overpass).context("Failed to set up Overpass client")?;
    let mut acquisition = Acquisition::new(config, bbox, &overpass, transport, SystemClock::new());

    let start = Instant::now();
    let bar = create_progress_bar(total);
    let harvest = acquisition.run_with(|progress| match progress {
        Progress::Started { category, .. } => bar.set_message(format!("Fetching {category}...")),
        Progress::Finished(report) => {
            match &report.state {
                CategoryState::Succeeded { .. } => bar.println(format!(
                    "  {}: {} records",
                    report.category, report.records
                )),
                CategoryState::ExhaustedEndpoints { attempts } => bar.println(format!(
                    "  {}: failed on all {} endpoints",
                    report.category, attempts
                )),
            }
            bar.inc(1);
        }
    });
    bar.finish_with_message(format!(
        "Fetched {} records [{:.1}s]",
        harvest.records.len(),
        start.elapsed().as_secs_f32()
    ));

    if harvest.is_empty() {
        bail!("No data found, nothing to render. Please try again later.");
    }

    write_json(&output_path, &harvest).context("Failed to write output file")?;

    let count = |tier: ScoreTier| harvest.records.iter().filter(|r| r.tier() == tier).count();
    println!();
    println!(
        "Tiers: {} high, {} medium, {} low",
        count(ScoreTier::High),
        count(ScoreTier::Medium),
        count(ScoreTier::Low)
    );
    let exhausted = harvest.exhausted().count();
    if exhausted > 0 {
        println!("{} categories could not be fetched", exhausted);
    }
    println!("Output: {}", output_path.display());

    Ok(())
}

fn print_directories() {
    for directory in Directory::ALL {
        let config = directory.config();
        println!(
            "{:<12} {}={}",
            directory.name(),
            config.tag_key,
            config.categories.join(",")
        );
    }
}

fn create_progress_bar(len: u64) -> ProgressBar {
    let pb = ProgressBar::new(len);
    pb.set_style(
        ProgressStyle::with_template("{spinner:.green} [{pos}/{len}] {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner())
            .tick_strings(&["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"]),
    );
    pb.enable_steady_tick(Duration::from_millis(80));
    pb
}
