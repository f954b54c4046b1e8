/// poolchem: evaluate one water test from a TOML file.
///
/// Usage:
///   poolchem <reading.toml> [--region arizona|texas|florida] [--date YYYY-MM-DD] [--json]
///
/// The reading file uses the form field names:
///   region = "florida"
///   capacity = 15000
///   ph = 7.6
///   alkalinity = 90
///   calcium = 250
///   temperature = 84
///   cyanuric = 40
///   freechlorine = 2.5

use chrono::NaiveDate;
use clap::Parser;
use std::path::PathBuf;
use std::process;

use poolchem_service::config::EngineConfig;
use poolchem_service::logging::{self, Component, LogLevel};
use poolchem_service::report::render_text;
use poolchem_service::{Engine, RawReading, Region};

// ---------------------------------------------------------------------------
// CLI Arguments
// ---------------------------------------------------------------------------

#[derive(Parser, Debug)]
#[command(name = "poolchem")]
#[command(about = "Pool water balance, dosing and weekly adjustment plan")]
#[command(version)]
struct Args {
    /// TOML file holding one water test
    reading: PathBuf,

    /// Region whose golden numbers apply; overrides `region` in the file
    #[arg(long, value_name = "arizona|texas|florida")]
    region: Option<Region>,

    /// Evaluation date (defaults to today); sets the seasonal chlorine loss
    #[arg(long, value_name = "YYYY-MM-DD")]
    date: Option<NaiveDate>,

    /// Print the full report as JSON instead of text
    #[arg(long)]
    json: bool,

    /// Engine configuration file
    #[arg(long, env = "POOLCHEM_CONFIG")]
    config: Option<PathBuf>,

    /// Minimum log level (debug, info, warn, error)
    #[arg(long, env = "POOLCHEM_LOG_LEVEL")]
    log_level: Option<String>,
}

fn run(args: Args) -> Result<(), Box<dyn std::error::Error>> {
    let config = EngineConfig::resolve(args.config.as_deref(), args.log_level.as_deref())?;

    // Keep stdout clean for JSON consumers.
    let level = if args.json {
        config.log_level()?.max(LogLevel::Warning)
    } else {
        config.log_level()?
    };
    logging::init_logger(level, config.logging.file.as_deref(), config.logging.timestamps);
    let floors = config.florida_floors();
    logging::debug(
        Component::Config,
        None,
        &format!(
            "florida floors: alkalinity {} ppm, calcium {} ppm, CYA {} ppm",
            floors.alkalinity_ppm, floors.calcium_ppm, floors.cya_ppm
        ),
    );

    let text = std::fs::read_to_string(&args.reading)?;
    let raw: RawReading = toml::from_str(&text)?;

    let region = match args.region {
        Some(region) => region,
        None => raw
            .region
            .as_deref()
            .ok_or("no region given (use --region or set region in the reading file)")?
            .parse::<Region>()?,
    };

    let reading = raw.validate().inspect_err(logging::log_input_rejected)?;

    let engine = Engine::from_config(&config);
    let report = match args.date {
        Some(date) => engine.evaluate(&reading, region, date),
        None => engine.evaluate_today(&reading, region),
    };

    if args.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        println!("{}", render_text(&report));
    }
    Ok(())
}

fn main() {
    // Load .env before parsing so it can supply the env-backed options.
    dotenv::dotenv().ok();
    let args = Args::parse();

    if let Err(e) = run(args) {
        eprintln!("Error: {}", e);
        process::exit(1);
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
