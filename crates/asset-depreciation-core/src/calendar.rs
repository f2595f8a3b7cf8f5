//! Calendar helpers shared by the depreciation, budget-year and reporting
//! modules: month arithmetic, month-end dates and asset-row date parsing.

use chrono::{Datelike, NaiveDate};

use crate::error::DepreciationError;
use crate::DepreciationResult;

/// Number of days in a given month/year.
pub fn days_in_month(year: i32, month: u32) -> u32 {
    match month {
        1 | 3 | 5 | 7 | 8 | 10 | 12 => 31,
        4 | 6 | 9 | 11 => 30,
        2 => {
            if is_leap_year(year) {
                29
            } else {
                28
            }
        }
        _ => 30,
    }
}

pub fn is_leap_year(year: i32) -> bool {
    (year % 4 == 0 && year % 100 != 0) || year % 400 == 0
}

/// Absolute month number (`year * 12 + month - 1`), used to count whole
/// months between two dates without walking the calendar.
pub fn month_index(year: i32, month: u32) -> i64 {
    year as i64 * 12 + month as i64 - 1
}

/// Month index of the month containing `date`.
pub fn month_index_of(date: NaiveDate) -> i64 {
    month_index(date.year(), date.month())
}

/// Inverse of [`month_index`]: returns `(year, month)`.
pub fn year_month_of_index(index: i64) -> (i32, u32) {
    let year = index.div_euclid(12) as i32;
    let month = (index.rem_euclid(12) + 1) as u32;
    (year, month)
}

pub fn validate_month(month: u32) -> DepreciationResult<()> {
    if !(1..=12).contains(&month) {
        return Err(DepreciationError::InvalidInput {
            field: "month".into(),
            reason: format!("Month must be between 1 and 12, got {month}"),
        });
    }
    Ok(())
}

pub fn first_day_of_month(year: i32, month: u32) -> DepreciationResult<NaiveDate> {
    validate_month(month)?;
    NaiveDate::from_ymd_opt(year, month, 1)
        .ok_or_else(|| DepreciationError::DateError(format!("{year}-{month:02} is out of range")))
}

pub fn last_day_of_month(year: i32, month: u32) -> DepreciationResult<NaiveDate> {
    validate_month(month)?;
    NaiveDate::from_ymd_opt(year, month, days_in_month(year, month))
        .ok_or_else(|| DepreciationError::DateError(format!("{year}-{month:02} is out of range")))
}

/// Parse a date as it appears on asset rows.
///
/// Accepts `YYYY-MM-DD`, ISO timestamps starting with `YYYY-MM-DD`
/// (e.g. `2021-02-10T00:00:00.000Z`) and `DD/MM/YYYY`.
pub fn parse_date(raw: &str) -> DepreciationResult<NaiveDate> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(DepreciationError::DateError("empty date".into()));
    }

    if let Ok(date) = NaiveDate::parse_from_str(trimmed, "%Y-%m-%d") {
        return Ok(date);
    }
    if trimmed.len() > 10 && trimmed.is_char_boundary(10) {
        let (head, tail) = trimmed.split_at(10);
        if tail.starts_with('T') || tail.starts_with(' ') {
            if let Ok(date) = NaiveDate::parse_from_str(head, "%Y-%m-%d") {
                return Ok(date);
            }
        }
    }
    if let Ok(date) = NaiveDate::parse_from_str(trimmed, "%d/%m/%Y") {
        return Ok(date);
    }

    Err(DepreciationError::DateError(format!(
        "unrecognised date '{trimmed}' (expected YYYY-MM-DD or DD/MM/YYYY)"
    )))
}
