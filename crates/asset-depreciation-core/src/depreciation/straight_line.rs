//! Straight-line depreciation with partial-month prorating.
//!
//! The month in which an asset enters service is charged for the days from
//! the SIV date to month end inclusive; every later month is charged in full.
//! Charges over a range of months are computed in closed form from a count of
//! "day units" (full months weighted by the SIV month's length), so a query
//! decades past the SIV date costs the same as one inside the first year and
//! the cumulative charge hits the depreciable amount exactly at the end of the
//! useful life.

use chrono::{Datelike, NaiveDate};
use rust_decimal::Decimal;

use crate::calendar::{self, days_in_month, month_index_of};
use crate::error::DepreciationError;
use crate::types::Money;
use crate::DepreciationResult;

/// Straight-line monthly charge: `(unit_price - salvage) / (years * 12)`.
pub fn monthly_depreciation(
    unit_price: Money,
    salvage_value: Money,
    useful_life_years: i32,
) -> DepreciationResult<Money> {
    let life_months = life_in_months(useful_life_years)?;
    Ok((unit_price - salvage_value) / Decimal::from(life_months))
}

/// Fraction of `target_month`/`target_year` during which the asset is in service.
pub fn prorated_month_fraction(
    siv_date: NaiveDate,
    target_month: u32,
    target_year: i32,
) -> DepreciationResult<Decimal> {
    calendar::validate_month(target_month)?;
    let target = calendar::month_index(target_year, target_month);
    let siv = month_index_of(siv_date);

    if target < siv {
        return Ok(Decimal::ZERO);
    }
    if target > siv {
        return Ok(Decimal::ONE);
    }
    let dim = days_in_month(siv_date.year(), siv_date.month());
    Ok(Decimal::from(siv_month_days(siv_date)) / Decimal::from(dim))
}

/// Charge for the months `first_month..=last_month` (month indices, see
/// [`calendar::month_index`]). Months before the SIV month contribute nothing.
///
/// A range worth at least a whole useful life charges exactly the
/// depreciable amount.
pub(crate) fn charge_for_months(
    depreciable_amount: Money,
    useful_life_years: i32,
    siv_date: NaiveDate,
    first_month: i64,
    last_month: i64,
) -> DepreciationResult<Money> {
    let life_months = life_in_months(useful_life_years)?;
    let siv = month_index_of(siv_date);
    let lo = first_month.max(siv);
    if last_month < lo {
        return Ok(Decimal::ZERO);
    }

    let dim = days_in_month(siv_date.year(), siv_date.month()) as i64;
    let units = if lo == siv {
        siv_month_days(siv_date) as i64 + (last_month - siv) * dim
    } else {
        (last_month - lo + 1) * dim
    };

    let life_units = life_months * dim;
    if units >= life_units {
        return Ok(depreciable_amount);
    }

    // Multiply first unless the product overflows the 96-bit mantissa
    let charge = match depreciable_amount.checked_mul(Decimal::from(units)) {
        Some(product) => product / Decimal::from(life_units),
        None => depreciable_amount / Decimal::from(life_units) * Decimal::from(units),
    };
    Ok(charge)
}

/// Offset, in months from the SIV month, of the month at whose end the
/// cumulative charge first reaches the depreciable amount.
pub(crate) fn months_to_full_depreciation(
    useful_life_years: i32,
    siv_date: NaiveDate,
) -> DepreciationResult<i64> {
    let life_months = life_in_months(useful_life_years)?;
    let dim = days_in_month(siv_date.year(), siv_date.month());
    if siv_month_days(siv_date) == dim {
        Ok(life_months - 1)
    } else {
        Ok(life_months)
    }
}

fn life_in_months(useful_life_years: i32) -> DepreciationResult<i64> {
    if useful_life_years <= 0 {
        return Err(DepreciationError::DivisionByZero {
            context: format!("straight-line charge over a useful life of {useful_life_years} years"),
        });
    }
    Ok(useful_life_years as i64 * 12)
}

/// Days in service during the SIV month, counting the SIV day itself.
fn siv_month_days(siv_date: NaiveDate) -> u32 {
    days_in_month(siv_date.year(), siv_date.month()) - siv_date.day() + 1
}
