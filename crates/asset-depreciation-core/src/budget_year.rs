//! Budget-year (fiscal year) book value reporting.
//!
//! A budget year is labelled `"YYYY/YYYY+1"` and starts on the first day of a
//! configurable month of the first year. With the default July start,
//! `"2020/2021"` runs from 2020-07-01 to 2021-06-30.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::time::Instant;

use crate::asset::AssetFinancials;
use crate::calendar;
use crate::config::{EngineConfig, DEFAULT_FISCAL_YEAR_START_MONTH};
use crate::depreciation::book_value::book_value_for_period;
use crate::error::DepreciationError;
use crate::types::{with_metadata, ComputationOutput, Money};
use crate::DepreciationResult;

/// Month in which every budget year starts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FiscalCalendar {
    start_month: u32,
}

impl FiscalCalendar {
    pub fn new(start_month: u32) -> DepreciationResult<Self> {
        if !(1..=12).contains(&start_month) {
            return Err(DepreciationError::InvalidInput {
                field: "fiscal_year_start_month".into(),
                reason: format!("Fiscal year start month must be between 1 and 12, got {start_month}"),
            });
        }
        Ok(Self { start_month })
    }

    pub fn from_config(config: &EngineConfig) -> DepreciationResult<Self> {
        Self::new(config.fiscal_year_start_month)
    }

    pub fn start_month(&self) -> u32 {
        self.start_month
    }
}

impl Default for FiscalCalendar {
    fn default() -> Self {
        Self {
            start_month: DEFAULT_FISCAL_YEAR_START_MONTH,
        }
    }
}

/// A parsed budget-year label such as `2020/2021`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct BudgetYear {
    start_year: i32,
}

impl BudgetYear {
    pub fn new(start_year: i32) -> Self {
        Self { start_year }
    }

    pub fn parse(label: &str) -> DepreciationResult<Self> {
        let invalid = |reason: String| DepreciationError::InvalidInput {
            field: "budget_year".into(),
            reason,
        };

        let (first, second) = label
            .trim()
            .split_once('/')
            .ok_or_else(|| invalid(format!("'{label}' is not of the form YYYY/YYYY")))?;
        let parse_year = |part: &str| -> DepreciationResult<i32> {
            if part.len() != 4 || !part.bytes().all(|b| b.is_ascii_digit()) {
                return Err(invalid(format!("'{part}' in '{label}' is not a four-digit year")));
            }
            part.parse::<i32>()
                .map_err(|e| invalid(format!("'{part}' in '{label}': {e}")))
        };

        let start_year = parse_year(first)?;
        let end_year = parse_year(second)?;
        if end_year != start_year + 1 {
            return Err(invalid(format!(
                "'{label}' must span consecutive years, e.g. {start_year}/{}",
                start_year + 1
            )));
        }
        Ok(Self { start_year })
    }

    pub fn start_year(&self) -> i32 {
        self.start_year
    }

    /// First and last calendar day of this budget year.
    pub fn bounds(&self, fiscal: &FiscalCalendar) -> DepreciationResult<(NaiveDate, NaiveDate)> {
        let first_idx = calendar::month_index(self.start_year, fiscal.start_month);
        let (end_year, end_month) = calendar::year_month_of_index(first_idx + 11);
        Ok((
            calendar::first_day_of_month(self.start_year, fiscal.start_month)?,
            calendar::last_day_of_month(end_year, end_month)?,
        ))
    }
}

impl fmt::Display for BudgetYear {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.start_year, self.start_year + 1)
    }
}

impl FromStr for BudgetYear {
    type Err = DepreciationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

/// One budget year's position for a single asset.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BudgetYearRow {
    pub budget_year: String,
    pub period_start: NaiveDate,
    pub period_end: NaiveDate,
    pub opening_book_value: Money,
    /// Depreciation charged within the budget year
    pub depreciation: Money,
    /// Cumulative depreciation from the SIV date to the budget-year end
    pub accumulated_depreciation: Money,
    pub closing_book_value: Money,
    /// Depreciable amount not yet expensed (`unit_price - salvage - accumulated`)
    pub remaining_depreciable_amount: Money,
}

/// Closing book value of `asset` for the budget year labelled `label`.
///
/// This is `unit_price - accumulated_depreciation` at the budget-year end,
/// floored at salvage, and always equals [`book_value`] at that date. It
/// still includes the salvage value: for the 3400 / 1% asset entering
/// service on 2021-02-10, `"2020/2021"` closes at 3268.77, not 3234.77.
/// The figure net of salvage is reported as
/// [`BudgetYearRow::remaining_depreciable_amount`].
///
/// [`book_value`]: crate::depreciation::book_value::book_value
pub fn book_value_for_budget_year(
    asset: &AssetFinancials,
    label: &str,
    fiscal: &FiscalCalendar,
) -> DepreciationResult<Money> {
    let year = BudgetYear::parse(label)?;
    Ok(budget_year_row(asset, &year, fiscal)?.closing_book_value)
}

/// Unrounded budget-year position of a single asset.
pub fn budget_year_row(
    asset: &AssetFinancials,
    year: &BudgetYear,
    fiscal: &FiscalCalendar,
) -> DepreciationResult<BudgetYearRow> {
    let (start, end) = year.bounds(fiscal)?;
    let period = book_value_for_period(asset, start, end)?;
    Ok(BudgetYearRow {
        budget_year: year.to_string(),
        period_start: start,
        period_end: end,
        opening_book_value: period.opening_book_value,
        depreciation: period.period_depreciation,
        accumulated_depreciation: period.accumulated_depreciation,
        closing_book_value: period.closing_book_value,
        remaining_depreciable_amount: asset.depreciable_amount() - period.accumulated_depreciation,
    })
}

/// Input for a multi-year budget report on one asset.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BudgetYearReportInput {
    pub asset: AssetFinancials,
    /// Labels such as `"2020/2021"`, reported in the order given
    pub budget_years: Vec<String>,
    #[serde(default)]
    pub config: EngineConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BudgetYearReport {
    pub fiscal_year_start_month: u32,
    pub salvage_value: Money,
    pub depreciable_amount: Money,
    pub rows: Vec<BudgetYearRow>,
}

/// Budget-year rows for every requested label.
pub fn budget_year_report(
    input: &BudgetYearReportInput,
) -> DepreciationResult<ComputationOutput<BudgetYearReport>> {
    let start = Instant::now();
    let mut warnings: Vec<String> = Vec::new();

    input.config.validate()?;
    input.asset.validate()?;
    if input.budget_years.is_empty() {
        return Err(DepreciationError::InvalidInput {
            field: "budget_years".into(),
            reason: "At least one budget year is required".into(),
        });
    }

    let fiscal = FiscalCalendar::from_config(&input.config)?;
    let cfg = &input.config;

    let mut rows = Vec::with_capacity(input.budget_years.len());
    for label in &input.budget_years {
        let year = BudgetYear::parse(label)?;
        let row = budget_year_row(&input.asset, &year, &fiscal)?;
        if row.period_end < input.asset.siv_date {
            warnings.push(format!(
                "Budget year {} ends before the SIV date {}",
                row.budget_year, input.asset.siv_date
            ));
        }
        rows.push(BudgetYearRow {
            opening_book_value: cfg.round(row.opening_book_value),
            depreciation: cfg.round(row.depreciation),
            accumulated_depreciation: cfg.round(row.accumulated_depreciation),
            closing_book_value: cfg.round(row.closing_book_value),
            remaining_depreciable_amount: cfg.round(row.remaining_depreciable_amount),
            ..row
        });
    }
    log::debug!(
        "budget year report: {} rows, fiscal start month {}",
        rows.len(),
        fiscal.start_month()
    );

    let output = BudgetYearReport {
        fiscal_year_start_month: fiscal.start_month(),
        salvage_value: cfg.round(input.asset.resolved_salvage_value()),
        depreciable_amount: cfg.round(input.asset.depreciable_amount()),
        rows,
    };

    let elapsed = start.elapsed().as_micros() as u64;
    Ok(with_metadata(
        "Straight-line depreciation aggregated by budget year",
        input,
        warnings,
        elapsed,
        output,
    ))
}
