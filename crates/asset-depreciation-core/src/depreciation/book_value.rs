//! Accumulated depreciation and book value for a single asset.
//!
//! Two independent guards keep book value inside `[salvage, unit_price]`:
//! accumulated depreciation is capped at the depreciable amount, and book
//! value is floored at the salvage value.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::straight_line;
use crate::asset::AssetFinancials;
use crate::calendar::{self, month_index_of};
use crate::error::DepreciationError;
use crate::types::{DepreciationMethod, Money};
use crate::DepreciationResult;

/// Book value position at the end of a reporting period.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PeriodBookValue {
    pub period_start: NaiveDate,
    pub period_end: NaiveDate,
    /// Book value immediately before the period
    pub opening_book_value: Money,
    /// Depreciation charged inside the period
    pub period_depreciation: Money,
    /// Cumulative depreciation from the SIV date to the period end
    pub accumulated_depreciation: Money,
    /// Book value at the period end
    pub closing_book_value: Money,
}

/// Depreciation charged over the calendar months overlapping
/// `[period_start, period_end]`.
///
/// Measured against the asset's lifetime total, so a window after the asset
/// is fully depreciated charges nothing and consecutive windows never sum
/// past the depreciable amount.
pub fn accumulated_depreciation(
    asset: &AssetFinancials,
    period_start: NaiveDate,
    period_end: NaiveDate,
) -> DepreciationResult<Money> {
    asset.validate()?;
    if period_end < period_start {
        return Err(DepreciationError::InvalidInput {
            field: "period_end".into(),
            reason: format!("Period end {period_end} is before period start {period_start}"),
        });
    }
    let (opening, closing) = cumulative_around(asset, period_start, period_end)?;
    Ok(closing - opening)
}

/// Cumulative depreciation from the SIV month through the month containing
/// `as_of`, capped at the depreciable amount. Zero before the SIV date.
pub fn depreciation_through(
    asset: &AssetFinancials,
    as_of: NaiveDate,
) -> DepreciationResult<Money> {
    asset.validate()?;
    cumulative_through(asset, as_of)
}

/// Book value of `asset` at `as_of`.
pub fn book_value(asset: &AssetFinancials, as_of: NaiveDate) -> DepreciationResult<Money> {
    asset.validate()?;
    book_value_unchecked(asset, as_of)
}

/// Opening/closing book value and in-period charge for `[period_start, period_end]`.
pub fn book_value_for_period(
    asset: &AssetFinancials,
    period_start: NaiveDate,
    period_end: NaiveDate,
) -> DepreciationResult<PeriodBookValue> {
    asset.validate()?;
    if period_end < period_start {
        return Err(DepreciationError::InvalidInput {
            field: "period_end".into(),
            reason: format!("Period end {period_end} is before period start {period_start}"),
        });
    }

    let (opening_accumulated, closing_accumulated) =
        cumulative_around(asset, period_start, period_end)?;

    Ok(PeriodBookValue {
        period_start,
        period_end,
        opening_book_value: floored(asset, opening_accumulated),
        period_depreciation: closing_accumulated - opening_accumulated,
        accumulated_depreciation: closing_accumulated,
        closing_book_value: floored(asset, closing_accumulated),
    })
}

/// Last day of the month at whose end the asset is fully depreciated.
pub fn fully_depreciated_on(asset: &AssetFinancials) -> DepreciationResult<NaiveDate> {
    asset.validate()?;
    ensure_supported(asset.depreciation_method)?;
    let offset =
        straight_line::months_to_full_depreciation(asset.useful_life_years, asset.siv_date)?;
    let (year, month) = calendar::year_month_of_index(month_index_of(asset.siv_date) + offset);
    calendar::last_day_of_month(year, month)
}

/// Book value for an asset that has already been validated.
pub(crate) fn book_value_unchecked(
    asset: &AssetFinancials,
    as_of: NaiveDate,
) -> DepreciationResult<Money> {
    ensure_supported(asset.depreciation_method)?;
    if as_of < asset.siv_date {
        return Ok(asset.unit_price);
    }
    let accumulated = cumulative_through(asset, as_of)?;
    Ok(floored(asset, accumulated))
}

pub(crate) fn cumulative_through(
    asset: &AssetFinancials,
    as_of: NaiveDate,
) -> DepreciationResult<Money> {
    ensure_supported(asset.depreciation_method)?;
    if as_of < asset.siv_date {
        return Ok(Decimal::ZERO);
    }
    let raw = charge_between(
        asset,
        month_index_of(asset.siv_date),
        month_index_of(as_of),
    )?;
    Ok(raw.min(asset.depreciable_amount()))
}

/// Cumulative depreciation just before `period_start` and at `period_end`.
fn cumulative_around(
    asset: &AssetFinancials,
    period_start: NaiveDate,
    period_end: NaiveDate,
) -> DepreciationResult<(Money, Money)> {
    let before = period_start.pred_opt().ok_or_else(|| {
        DepreciationError::DateError(format!("no day precedes {period_start}"))
    })?;
    Ok((
        cumulative_through(asset, before)?,
        cumulative_through(asset, period_end)?,
    ))
}

fn floored(asset: &AssetFinancials, accumulated: Money) -> Money {
    let salvage = asset.resolved_salvage_value();
    (asset.unit_price - accumulated).max(salvage)
}

/// Charge for a month range, dispatched on the asset's method.
fn charge_between(
    asset: &AssetFinancials,
    first_month: i64,
    last_month: i64,
) -> DepreciationResult<Money> {
    match asset.depreciation_method {
        DepreciationMethod::StraightLine => straight_line::charge_for_months(
            asset.depreciable_amount(),
            asset.useful_life_years,
            asset.siv_date,
            first_month,
            last_month,
        ),
        other => Err(DepreciationError::MethodNotImplemented(other.to_string())),
    }
}

fn ensure_supported(method: DepreciationMethod) -> DepreciationResult<()> {
    match method {
        DepreciationMethod::StraightLine => Ok(()),
        DepreciationMethod::DecliningBalance
        | DepreciationMethod::DoubleDeclining
        | DepreciationMethod::SumOfYearsDigits
        | DepreciationMethod::UnitsOfActivity => {
            Err(DepreciationError::MethodNotImplemented(method.to_string()))
        }
    }
}
