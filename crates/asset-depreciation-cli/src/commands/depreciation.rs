use chrono::NaiveDate;
use clap::{Args, ValueEnum};
use rust_decimal::Decimal;
use serde_json::{json, Value};
use std::time::Instant;

use asset_depreciation_core::depreciation::schedule::{self, ScheduleInput};
use asset_depreciation_core::depreciation::summary::{self, BookValueInput};
use asset_depreciation_core::disposal::{self, DisposalInput};
use asset_depreciation_core::{
    monthly_depreciation, resolve_salvage_value, with_metadata, AssetFinancials,
    DepreciationMethod, EngineConfig,
};

use crate::input;

/// Depreciation method as accepted on the command line
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum MethodArg {
    StraightLine,
    DecliningBalance,
    DoubleDeclining,
    SumOfYearsDigits,
    UnitsOfActivity,
}

impl From<MethodArg> for DepreciationMethod {
    fn from(m: MethodArg) -> Self {
        match m {
            MethodArg::StraightLine => DepreciationMethod::StraightLine,
            MethodArg::DecliningBalance => DepreciationMethod::DecliningBalance,
            MethodArg::DoubleDeclining => DepreciationMethod::DoubleDeclining,
            MethodArg::SumOfYearsDigits => DepreciationMethod::SumOfYearsDigits,
            MethodArg::UnitsOfActivity => DepreciationMethod::UnitsOfActivity,
        }
    }
}

/// Asset attributes shared by the single-asset commands
#[derive(Args)]
pub struct AssetArgs {
    /// Acquisition cost
    #[arg(long)]
    pub unit_price: Option<Decimal>,

    /// Date placed into service (YYYY-MM-DD)
    #[arg(long)]
    pub siv_date: Option<NaiveDate>,

    /// Useful life in years
    #[arg(long, alias = "life")]
    pub useful_life: Option<i32>,

    /// Residual value as a percentage of unit price (e.g. 1 for 1%)
    #[arg(long, alias = "residual")]
    pub residual_pct: Option<Decimal>,

    /// Explicit salvage value (overrides --residual-pct)
    #[arg(long)]
    pub salvage_value: Option<Decimal>,

    /// Depreciation method
    #[arg(long, value_enum, default_value = "straight-line")]
    pub method: MethodArg,
}

impl AssetArgs {
    pub(crate) fn to_financials(&self) -> Result<AssetFinancials, Box<dyn std::error::Error>> {
        Ok(AssetFinancials {
            unit_price: self
                .unit_price
                .ok_or("--unit-price is required (or provide --input)")?,
            siv_date: self
                .siv_date
                .ok_or("--siv-date is required (or provide --input)")?,
            useful_life_years: self
                .useful_life
                .ok_or("--useful-life is required (or provide --input)")?,
            residual_percentage: self.residual_pct,
            salvage_value: self.salvage_value,
            depreciation_method: self.method.into(),
        })
    }
}

/// Arguments for salvage value resolution
#[derive(Args)]
pub struct SalvageArgs {
    /// Acquisition cost
    #[arg(long)]
    pub unit_price: Decimal,

    /// Residual value as a percentage of unit price
    #[arg(long, alias = "residual")]
    pub residual_pct: Option<Decimal>,

    /// Explicit salvage value (wins over the percentage)
    #[arg(long)]
    pub salvage_value: Option<Decimal>,
}

/// Arguments for the straight-line monthly charge
#[derive(Args)]
pub struct MonthlyArgs {
    /// Acquisition cost
    #[arg(long)]
    pub unit_price: Decimal,

    /// Salvage value
    #[arg(long, default_value = "0")]
    pub salvage_value: Decimal,

    /// Useful life in years
    #[arg(long, alias = "life")]
    pub useful_life: i32,
}

/// Arguments for a point-in-time book value
#[derive(Args)]
pub struct BookValueArgs {
    #[command(flatten)]
    pub asset: AssetArgs,

    /// Valuation date (YYYY-MM-DD)
    #[arg(long)]
    pub as_of: Option<NaiveDate>,

    /// Path to JSON input file (overrides individual flags)
    #[arg(long)]
    pub input: Option<String>,
}

/// Arguments for a month-by-month schedule
#[derive(Args)]
pub struct ScheduleArgs {
    #[command(flatten)]
    pub asset: AssetArgs,

    /// First day of the schedule (defaults to the SIV date)
    #[arg(long)]
    pub from: Option<NaiveDate>,

    /// Last day of the schedule (defaults to the fully-depreciated month)
    #[arg(long)]
    pub to: Option<NaiveDate>,

    /// Path to JSON input file (overrides individual flags)
    #[arg(long)]
    pub input: Option<String>,
}

/// Arguments for disposal gain/loss
#[derive(Args)]
pub struct DisposalArgs {
    #[command(flatten)]
    pub asset: AssetArgs,

    /// Disposal date (YYYY-MM-DD)
    #[arg(long)]
    pub disposal_date: Option<NaiveDate>,

    /// Proceeds received
    #[arg(long)]
    pub proceeds: Option<Decimal>,

    /// Path to JSON input file (overrides individual flags)
    #[arg(long)]
    pub input: Option<String>,
}

pub fn run_salvage(args: SalvageArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let start = Instant::now();
    let salvage = resolve_salvage_value(args.unit_price, args.residual_pct, args.salvage_value);
    let mut warnings = Vec::new();
    if salvage > args.unit_price {
        warnings.push(format!(
            "Salvage value {salvage} exceeds unit price {}",
            args.unit_price
        ));
    }
    let output = with_metadata(
        "Explicit salvage override, else unit price x residual percentage",
        &json!({
            "unit_price": args.unit_price,
            "residual_percentage": args.residual_pct,
            "salvage_value": args.salvage_value,
        }),
        warnings,
        start.elapsed().as_micros() as u64,
        json!({
            "salvage_value": salvage,
            "depreciable_amount": args.unit_price - salvage,
        }),
    );
    Ok(serde_json::to_value(output)?)
}

pub fn run_monthly(args: MonthlyArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let start = Instant::now();
    let monthly = monthly_depreciation(args.unit_price, args.salvage_value, args.useful_life)?;
    let output = with_metadata(
        "Straight-line: (unit price - salvage) / (useful life x 12)",
        &json!({
            "unit_price": args.unit_price,
            "salvage_value": args.salvage_value,
            "useful_life_years": args.useful_life,
        }),
        Vec::new(),
        start.elapsed().as_micros() as u64,
        json!({
            "monthly_depreciation": monthly,
            "annual_depreciation": monthly * Decimal::from(12),
        }),
    );
    Ok(serde_json::to_value(output)?)
}

pub fn run_book_value(
    args: BookValueArgs,
    config: Option<&EngineConfig>,
) -> Result<Value, Box<dyn std::error::Error>> {
    let mut bv_input: BookValueInput = if let Some(ref path) = args.input {
        input::file::read_json(path)?
    } else if let Some(data) = input::stdin::read_stdin()? {
        data
    } else {
        BookValueInput {
            asset: args.asset.to_financials()?,
            as_of: args.as_of.ok_or("--as-of is required (or provide --input)")?,
            config: EngineConfig::default(),
        }
    };
    if let Some(cfg) = config {
        bv_input.config = cfg.clone();
    }
    let result = summary::calculate_book_value(&bv_input)?;
    Ok(serde_json::to_value(result)?)
}

pub fn run_schedule(
    args: ScheduleArgs,
    config: Option<&EngineConfig>,
) -> Result<Value, Box<dyn std::error::Error>> {
    let mut sched_input: ScheduleInput = if let Some(ref path) = args.input {
        input::file::read_json(path)?
    } else if let Some(data) = input::stdin::read_stdin()? {
        data
    } else {
        ScheduleInput {
            asset: args.asset.to_financials()?,
            period_start: args.from,
            period_end: args.to,
            config: EngineConfig::default(),
        }
    };
    if let Some(cfg) = config {
        sched_input.config = cfg.clone();
    }
    let result = schedule::depreciation_schedule(&sched_input)?;
    Ok(serde_json::to_value(result)?)
}

pub fn run_disposal(
    args: DisposalArgs,
    config: Option<&EngineConfig>,
) -> Result<Value, Box<dyn std::error::Error>> {
    let mut disp_input: DisposalInput = if let Some(ref path) = args.input {
        input::file::read_json(path)?
    } else if let Some(data) = input::stdin::read_stdin()? {
        data
    } else {
        DisposalInput {
            asset: args.asset.to_financials()?,
            disposal_date: args
                .disposal_date
                .ok_or("--disposal-date is required (or provide --input)")?,
            proceeds: args
                .proceeds
                .ok_or("--proceeds is required (or provide --input)")?,
            config: EngineConfig::default(),
        }
    };
    if let Some(cfg) = config {
        disp_input.config = cfg.clone();
    }
    let result = disposal::calculate_disposal(&disp_input)?;
    Ok(serde_json::to_value(result)?)
}
