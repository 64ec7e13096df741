//! depletion-cli — Common pool depletion estimates from the command line.
//!
//! Loads the staking rewards schedule, validates the policy and validator
//! inputs, and reports how long the common pool lasts under the chosen cap
//! together with the validator's projected monthly earnings.

mod config;
mod report;

use std::fs::File;
use std::io::BufWriter;
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand};
use depletion_core::schedule::RewardSchedule;
use depletion_core::traits::{Clock, DepletionCalculator, FixedClock, SystemClock};
use depletion_core::validation::{EstimateRequest, OUT_OF_BOUNDS_MESSAGE};
use depletion_engine::{DepletionEngine, EarningsProjection};
use tracing::{info, warn};

use crate::config::Config;

/// Estimation of common pool token depletion.
#[derive(Parser)]
#[command(name = "depletion-cli")]
#[command(version, about = "Estimate when the staking rewards common pool runs dry.")]
struct Cli {
    /// Log level (trace, debug, info, warn, error). Overrides DEPLETION_LOG_LEVEL.
    #[arg(long, global = true)]
    log_level: Option<String>,

    /// Log output format ("text" or "json"). Overrides DEPLETION_LOG_FORMAT.
    #[arg(long, global = true)]
    log_format: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Estimate common pool depletion and validator earnings.
    Estimate(EstimateArgs),
    /// Load, resample and summarise the rewards schedule.
    Schedule(ScheduleArgs),
}

#[derive(Args)]
struct EstimateArgs {
    /// Rewards schedule CSV (default: DEPLETION_SCHEDULE_PATH or staking_rewards.csv).
    #[arg(short, long)]
    schedule: Option<PathBuf>,

    /// Estimate as of this date (YYYY-MM-DD) instead of today.
    #[arg(long)]
    today: Option<NaiveDate>,

    /// Final fixed annual rewards, in percent (0-20).
    #[arg(long)]
    cap: Option<f64>,

    /// Tokens left in the common pool.
    #[arg(long)]
    common_pool: Option<f64>,

    /// Total tokens staked network-wide.
    #[arg(long)]
    staked: Option<f64>,

    /// Token price in dollars.
    #[arg(long)]
    price: Option<f64>,

    /// Tokens delegated to the validator.
    #[arg(long)]
    validator_stake: Option<f64>,

    /// Validator commission, in percent (0-100).
    #[arg(long)]
    commission: Option<f64>,

    /// Write the adjusted schedule to this CSV file.
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Print the full result as JSON.
    #[arg(long)]
    json: bool,
}

impl EstimateArgs {
    fn request(&self) -> EstimateRequest {
        EstimateRequest {
            cap_percent: self.cap,
            common_pool_tokens: self.common_pool,
            staked_tokens: self.staked,
            token_price: self.price,
            validator_stake: self.validator_stake,
            commission_percent: self.commission,
        }
    }
}

#[derive(Args)]
struct ScheduleArgs {
    /// Rewards schedule CSV (default: DEPLETION_SCHEDULE_PATH or staking_rewards.csv).
    #[arg(short, long)]
    schedule: Option<PathBuf>,

    /// Write the resampled daily schedule to this CSV file.
    #[arg(short, long)]
    output: Option<PathBuf>,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = Config::from_env()?;

    let level = cli.log_level.as_deref().unwrap_or(&config.log_level);
    let format = cli.log_format.as_deref().unwrap_or(&config.log_format);
    init_logging(level, format);

    match cli.command {
        Commands::Estimate(args) => run_estimate(args, &config),
        Commands::Schedule(args) => run_schedule(args, &config),
    }
}

/// Validate inputs, estimate depletion and report the results.
fn run_estimate(args: EstimateArgs, config: &Config) -> Result<()> {
    let request = args.request().or(config.request);
    let validated = match request.validate() {
        Ok(v) => v,
        Err(e) => {
            warn!("rejected estimate request: {e}");
            bail!("{OUT_OF_BOUNDS_MESSAGE} ({e})");
        }
    };

    let today = match args.today {
        Some(date) => FixedClock(date).today(),
        None => SystemClock.today(),
    };

    let schedule = load_schedule(args.schedule.as_deref().unwrap_or(&config.schedule_path))?;

    let result = DepletionEngine::new()
        .estimate(&schedule, &validated.policy(), today)
        .context("Estimation failed")?;
    let projection = EarningsProjection::from_estimate(&result, &validated.earnings_inputs());
    info!(
        %today,
        epochs = result.epochs_to_depletion,
        years = projection.years_to_depletion,
        "estimate complete"
    );

    if let Some(path) = &args.output {
        write_schedule(&result.adjusted_schedule, path)?;
    }

    if args.json {
        let report = report::json_report(today, &validated, &result, &projection);
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        println!("{}", report::depletion_line(&projection));
        println!("{}", report::earnings_line(&projection));
        if let Some(path) = &args.output {
            println!("Adjusted schedule written to: {}", path.display());
        }
    }
    Ok(())
}

/// Print a summary of the resampled schedule, or write it out.
fn run_schedule(args: ScheduleArgs, config: &Config) -> Result<()> {
    let schedule = load_schedule(args.schedule.as_deref().unwrap_or(&config.schedule_path))?;

    match &args.output {
        Some(path) => {
            write_schedule(&schedule, path)?;
            println!("Resampled schedule written to: {}", path.display());
        }
        None => println!("{}", report::schedule_summary(&schedule)),
    }
    Ok(())
}

fn load_schedule(path: &Path) -> Result<RewardSchedule> {
    let schedule = RewardSchedule::load(path)
        .with_context(|| format!("Failed to load schedule: {}", path.display()))?;
    info!(path = %path.display(), days = schedule.len(), "loaded rewards schedule");
    Ok(schedule)
}

fn write_schedule(schedule: &RewardSchedule, path: &Path) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
    }
    let file = File::create(path)
        .with_context(|| format!("Failed to create file: {}", path.display()))?;
    schedule
        .write_csv(BufWriter::new(file))
        .with_context(|| format!("Failed to write schedule: {}", path.display()))
}

/// Initialize tracing subscriber with the given log level and output format.
///
/// Pass `format = "json"` for structured JSON output. Any other value
/// defaults to human-readable text. Logs go to stderr so stdout stays clean
/// for reports.
fn init_logging(level_str: &str, format: &str) {
    use tracing_subscriber::filter::EnvFilter;
    use tracing_subscriber::fmt;
    use tracing_subscriber::prelude::*;

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(level_str));

    if format == "json" {
        tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer().json().with_writer(std::io::stderr))
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer().with_target(true).with_level(true).with_writer(std::io::stderr))
            .init();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn estimate_flags_map_onto_request() {
        let cli = Cli::parse_from([
            "depletion-cli",
            "estimate",
            "--cap",
            "4.5",
            "--staked",
            "1000",
            "--today",
            "2024-02-29",
        ]);
        let Commands::Estimate(args) = cli.command else {
            panic!("expected estimate subcommand");
        };
        let req = args.request();
        assert_eq!(req.cap_percent, Some(4.5));
        assert_eq!(req.staked_tokens, Some(1000.0));
        assert_eq!(req.token_price, None);
        assert_eq!(args.today, NaiveDate::from_ymd_opt(2024, 2, 29));
    }

    #[test]
    fn write_schedule_creates_parent_dirs() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out").join("adjusted.csv");
        let schedule = RewardSchedule::from_rows(vec![depletion_core::types::RewardScheduleRow::new(
            NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
            2.0,
            0.0002,
        )])
        .unwrap();
        write_schedule(&schedule, &path).unwrap();
        assert_eq!(load_schedule(&path).unwrap(), schedule);
    }
}
