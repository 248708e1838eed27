//! CLI tool to compute street-name statistics from a FANTOIR registry.
//!
//! Usage:
//!   fantoir-scan <FANTOIR file>
//!   fantoir-scan <FANTOIR file> --population PopCommunesINSEE.csv \
//!       --matches-out neruda.csv --frequency-out streets.csv --min-count 5
//!
//! Without output paths, only the city and street counts are printed.

use clap::{Parser, ValueEnum};
use fantoir_scan::{
    DEFAULT_TARGET, PopulationFormat, PopulationPolicy, RunConfig, RunReport, Stage, run,
};
use std::path::PathBuf;
use std::process;
use tracing_subscriber::EnvFilter;

/// Count street names across France and extract the streets matching a name.
#[derive(Parser)]
#[command(name = "fantoir-scan", version)]
struct Cli {
    /// FANTOIR registry file (fixed-width ASCII)
    registry: PathBuf,

    /// Population registry (INSEE code;name;...;...;population)
    #[arg(short, long)]
    population: Option<PathBuf>,

    /// Framing of the population file
    #[arg(long, value_enum, default_value_t = FormatArg::Wrapped)]
    population_format: FormatArg,

    /// Abort on a population row with fewer than 5 fields instead of skipping it
    #[arg(long)]
    strict_population: bool,

    /// Short street name to extract (exact, case-sensitive)
    #[arg(short, long, default_value = DEFAULT_TARGET)]
    target: String,

    /// Drop street names seen fewer than N times from the frequency extract
    #[arg(long, value_name = "N")]
    min_count: Option<u64>,

    /// Write the matching streets to this CSV file
    #[arg(short, long)]
    matches_out: Option<PathBuf>,

    /// Write street-name counts to this CSV file
    #[arg(short, long)]
    frequency_out: Option<PathBuf>,

    /// Leave match city names as "unknown"
    #[arg(long)]
    no_city_names: bool,

    /// Debug logging on stderr (RUST_LOG overrides)
    #[arg(short, long)]
    verbose: bool,
}

#[derive(Clone, Copy, ValueEnum)]
enum FormatArg {
    /// Comma-delimited CSV whose first column is the ';'-joined row
    Wrapped,
    /// One ';'-joined row per line
    Raw,
}

impl Cli {
    fn into_config(self) -> RunConfig {
        let mut config = RunConfig::new(self.registry).with_target(self.target);
        config.population_format = match self.population_format {
            FormatArg::Wrapped => PopulationFormat::Wrapped,
            FormatArg::Raw => PopulationFormat::Raw,
        };
        if self.strict_population {
            config.population_policy = PopulationPolicy::Strict;
        }
        if !self.no_city_names {
            config = config.with_stage(Stage::EnrichCity);
        }
        if let Some(path) = self.population {
            config = config
                .with_population(path)
                .with_stage(Stage::EnrichPopulation);
        }
        if let Some(path) = self.matches_out {
            config = config.with_matches_out(path).with_stage(Stage::WriteMatches);
        }
        if let Some(min) = self.min_count {
            config = config.with_stage(Stage::FilterThreshold { min });
        }
        if let Some(path) = self.frequency_out {
            config = config
                .with_frequency_out(path)
                .with_stage(Stage::WriteFrequency);
        }
        config
    }
}

fn setup_tracing(verbose: bool) {
    let default = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn print_report(report: &RunReport) {
    println!("Number of cities: {}", report.counts.cities);
    println!("Number of streets: {}", report.counts.streets);
    println!("Distinct street names: {}", report.distinct_streets);
    println!("Matches: {}", report.matches);
    for path in &report.written {
        println!("Written: {}", path.display());
    }
}

fn main() {
    let cli = Cli::parse();
    setup_tracing(cli.verbose);

    let config = cli.into_config();
    match run(&config) {
        Ok(report) => print_report(&report),
        Err(e) => {
            eprintln!("Error: {e}");
            process::exit(1);
        }
    }
}
