use clap::Args;
use serde_json::Value;

use asset_depreciation_core::budget_year::{self, BudgetYearReportInput};
use asset_depreciation_core::population::{self, PopulationInput};
use asset_depreciation_core::EngineConfig;

use super::depreciation::AssetArgs;
use crate::input;

/// Arguments for a budget-year report on one asset
#[derive(Args)]
pub struct BudgetYearArgs {
    #[command(flatten)]
    pub asset: AssetArgs,

    /// Budget year label, e.g. 2020/2021 (repeatable)
    #[arg(long = "year", value_name = "YYYY/YYYY")]
    pub years: Vec<String>,

    /// Path to JSON input file (overrides individual flags)
    #[arg(long)]
    pub input: Option<String>,
}

/// Arguments for monthly totals across an asset population
#[derive(Args)]
pub struct PopulationArgs {
    /// Path to JSON input file with `year` and `assets`
    #[arg(long)]
    pub input: Option<String>,

    /// Calendar year (overrides the year in the input)
    #[arg(long)]
    pub year: Option<i32>,
}

pub fn run_budget_year(
    args: BudgetYearArgs,
    config: Option<&EngineConfig>,
) -> Result<Value, Box<dyn std::error::Error>> {
    let mut report_input: BudgetYearReportInput = if let Some(ref path) = args.input {
        input::file::read_json(path)?
    } else if let Some(data) = input::stdin::read_stdin()? {
        data
    } else {
        if args.years.is_empty() {
            return Err("at least one --year is required (or provide --input)".into());
        }
        BudgetYearReportInput {
            asset: args.asset.to_financials()?,
            budget_years: args.years.clone(),
            config: EngineConfig::default(),
        }
    };
    if let Some(cfg) = config {
        report_input.config = cfg.clone();
    }
    let result = budget_year::budget_year_report(&report_input)?;
    Ok(serde_json::to_value(result)?)
}

pub fn run_population(
    args: PopulationArgs,
    config: Option<&EngineConfig>,
) -> Result<Value, Box<dyn std::error::Error>> {
    let mut pop_input: PopulationInput = if let Some(ref path) = args.input {
        input::file::read_json(path)?
    } else if let Some(data) = input::stdin::read_stdin()? {
        data
    } else {
        return Err("population totals need asset rows: provide --input or pipe JSON".into());
    };
    if let Some(year) = args.year {
        pop_input.year = year;
    }
    if let Some(cfg) = config {
        pop_input.config = cfg.clone();
    }
    let result = population::population_report(&pop_input)?;
    Ok(serde_json::to_value(result)?)
}
