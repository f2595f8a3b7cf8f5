//! Month-by-month depreciation schedule for a single asset.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::time::Instant;

use super::book_value::{cumulative_through, fully_depreciated_on};
use super::straight_line::{monthly_depreciation, prorated_month_fraction};
use crate::asset::AssetFinancials;
use crate::calendar::{self, month_index_of};
use crate::config::EngineConfig;
use crate::error::DepreciationError;
use crate::types::{with_metadata, ComputationOutput, Money};
use crate::DepreciationResult;

const MAX_SCHEDULE_MONTHS: i64 = 1200;

/// Input for a depreciation schedule.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScheduleInput {
    pub asset: AssetFinancials,
    /// First day of the schedule; defaults to the SIV date
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub period_start: Option<NaiveDate>,
    /// Last day of the schedule; defaults to the fully-depreciated month end
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub period_end: Option<NaiveDate>,
    #[serde(default)]
    pub config: EngineConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DepreciationSchedule {
    pub salvage_value: Money,
    pub depreciable_amount: Money,
    pub monthly_depreciation: Money,
    /// Depreciation charged across the schedule's rows
    pub total_depreciation: Money,
    pub fully_depreciated_on: NaiveDate,
    pub rows: Vec<ScheduleRow>,
}

/// A single month of the schedule.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScheduleRow {
    pub year: i32,
    pub month: u32,
    pub month_end: NaiveDate,
    /// Share of the month the asset was in service
    pub fraction: Decimal,
    pub depreciation: Money,
    pub accumulated_depreciation: Money,
    pub book_value: Money,
}

/// Build a month-by-month schedule between the requested dates.
///
/// Rows start at the later of `period_start` and the SIV month. Once the
/// depreciable amount is exhausted the remaining rows carry a zero charge.
pub fn depreciation_schedule(
    input: &ScheduleInput,
) -> DepreciationResult<ComputationOutput<DepreciationSchedule>> {
    let start = Instant::now();
    let mut warnings: Vec<String> = Vec::new();

    input.config.validate()?;
    let asset = &input.asset;
    asset.validate()?;

    let fully_on = fully_depreciated_on(asset)?;
    let period_start = input.period_start.unwrap_or(asset.siv_date);
    let period_end = input.period_end.unwrap_or(fully_on);
    if period_end < period_start {
        return Err(DepreciationError::InvalidInput {
            field: "period_end".into(),
            reason: format!("Period end {period_end} is before period start {period_start}"),
        });
    }

    let first = month_index_of(period_start).max(month_index_of(asset.siv_date));
    let last = month_index_of(period_end);
    if last - first + 1 > MAX_SCHEDULE_MONTHS {
        return Err(DepreciationError::InvalidInput {
            field: "period_end".into(),
            reason: format!("Schedules are limited to {MAX_SCHEDULE_MONTHS} months"),
        });
    }
    if last < first {
        warnings.push(format!(
            "Schedule ends before the SIV date {}; no rows produced",
            asset.siv_date
        ));
    }

    let salvage = asset.resolved_salvage_value();
    let cfg = &input.config;

    let mut rows = Vec::new();
    let (first_year, first_month) = calendar::year_month_of_index(first);
    let mut previous = match calendar::first_day_of_month(first_year, first_month)?.pred_opt() {
        Some(day_before) => cumulative_through(asset, day_before)?,
        None => Decimal::ZERO,
    };
    let opening = previous;

    for idx in first..=last {
        let (year, month) = calendar::year_month_of_index(idx);
        let month_end = calendar::last_day_of_month(year, month)?;
        let accumulated = cumulative_through(asset, month_end)?;
        let book_value = (asset.unit_price - accumulated).max(salvage);

        rows.push(ScheduleRow {
            year,
            month,
            month_end,
            fraction: prorated_month_fraction(asset.siv_date, month, year)?,
            depreciation: cfg.round(accumulated - previous),
            accumulated_depreciation: cfg.round(accumulated),
            book_value: cfg.round(book_value),
        });
        previous = accumulated;
    }

    let output = DepreciationSchedule {
        salvage_value: cfg.round(salvage),
        depreciable_amount: cfg.round(asset.depreciable_amount()),
        monthly_depreciation: cfg.round(monthly_depreciation(
            asset.unit_price,
            salvage,
            asset.useful_life_years,
        )?),
        total_depreciation: cfg.round(previous - opening),
        fully_depreciated_on: fully_on,
        rows,
    };

    let elapsed = start.elapsed().as_micros() as u64;
    Ok(with_metadata(
        "Monthly straight-line schedule, capped at depreciable amount",
        input,
        warnings,
        elapsed,
        output,
    ))
}
