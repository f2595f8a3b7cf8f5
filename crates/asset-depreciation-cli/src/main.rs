mod commands;
mod input;
mod output;

use clap::{Parser, Subcommand, ValueEnum};
use colored::Colorize;
use std::process;
use tracing_subscriber::EnvFilter;

use commands::depreciation::{BookValueArgs, DisposalArgs, MonthlyArgs, SalvageArgs, ScheduleArgs};
use commands::reporting::{BudgetYearArgs, PopulationArgs};

/// Fixed-asset depreciation and book-value calculations
#[derive(Parser)]
#[command(
    name = "fad",
    version,
    about = "Fixed-asset depreciation and book-value calculations",
    long_about = "A CLI for straight-line depreciation of fixed assets with decimal \
                  precision. Supports salvage resolution, partial-month prorating, \
                  book values, schedules, budget-year reports, population totals \
                  and disposal gain/loss."
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Output format
    #[arg(long, default_value = "json", global = true)]
    output: OutputFormat,

    /// Engine configuration file (YAML or JSON); replaces any config in the input
    #[arg(long, global = true)]
    config: Option<String>,
}

#[derive(Subcommand)]
enum Commands {
    /// Resolve the effective salvage value of an asset
    Salvage(SalvageArgs),
    /// Straight-line monthly depreciation charge
    Monthly(MonthlyArgs),
    /// Book value of an asset at a date
    BookValue(BookValueArgs),
    /// Month-by-month depreciation schedule
    Schedule(ScheduleArgs),
    /// Book value by budget (fiscal) year
    BudgetYear(BudgetYearArgs),
    /// Month-end book value totals across an asset population
    Population(PopulationArgs),
    /// Gain or loss on disposal
    Disposal(DisposalArgs),
    /// Print version information
    Version,
}

#[derive(Debug, Clone, ValueEnum)]
pub enum OutputFormat {
    Json,
    Table,
    Csv,
    Minimal,
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(true)
        .init();
}

fn main() {
    init_tracing();
    let cli = Cli::parse();

    let config = match cli.config.as_deref().map(input::file::read_config).transpose() {
        Ok(cfg) => cfg,
        Err(e) => {
            eprintln!("{}: {}", "error".red().bold(), e);
            process::exit(1);
        }
    };
    if let Some(ref cfg) = config {
        tracing::debug!(?cfg, "loaded engine configuration");
    }
    let cfg = config.as_ref();

    let result: Result<serde_json::Value, Box<dyn std::error::Error>> = match cli.command {
        Commands::Salvage(args) => commands::depreciation::run_salvage(args),
        Commands::Monthly(args) => commands::depreciation::run_monthly(args),
        Commands::BookValue(args) => commands::depreciation::run_book_value(args, cfg),
        Commands::Schedule(args) => commands::depreciation::run_schedule(args, cfg),
        Commands::BudgetYear(args) => commands::reporting::run_budget_year(args, cfg),
        Commands::Population(args) => commands::reporting::run_population(args, cfg),
        Commands::Disposal(args) => commands::depreciation::run_disposal(args, cfg),
        Commands::Version => {
            println!("fad {}", env!("CARGO_PKG_VERSION"));
            return;
        }
    };

    match result {
        Ok(value) => {
            output::format_output(&cli.output, &value);
            process::exit(0);
        }
        Err(e) => {
            eprintln!("{}: {}", "error".red().bold(), e);
            process::exit(1);
        }
    }
}
