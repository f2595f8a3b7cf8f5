use chrono::NaiveDate;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::time::Instant;

use super::book_value::{book_value_unchecked, cumulative_through, fully_depreciated_on};
use super::straight_line::monthly_depreciation;
use crate::asset::AssetFinancials;
use crate::calendar::month_index_of;
use crate::config::EngineConfig;
use crate::types::{with_metadata, ComputationOutput, Money};
use crate::DepreciationResult;

/// Input for a single-asset book value report.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BookValueInput {
    pub asset: AssetFinancials,
    /// Valuation date
    pub as_of: NaiveDate,
    #[serde(default)]
    pub config: EngineConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BookValueSummary {
    pub as_of: NaiveDate,
    pub unit_price: Money,
    /// Effective salvage value after applying any explicit override
    pub salvage_value: Money,
    pub depreciable_amount: Money,
    pub monthly_depreciation: Money,
    /// Cumulative depreciation from the SIV date through `as_of`
    pub accumulated_depreciation: Money,
    pub book_value: Money,
    /// Month end at which book value first reaches the salvage value
    pub fully_depreciated_on: NaiveDate,
    /// Whether the whole depreciable amount has been charged by `as_of`
    pub is_fully_depreciated: bool,
    /// Calendar months in service, counting the SIV month (0 before service)
    pub months_in_service: i64,
}

/// Book value of one asset at a date, with the figures that produced it.
pub fn calculate_book_value(
    input: &BookValueInput,
) -> DepreciationResult<ComputationOutput<BookValueSummary>> {
    let start = Instant::now();
    let mut warnings: Vec<String> = Vec::new();

    input.config.validate()?;
    let asset = &input.asset;
    asset.validate()?;

    let salvage = asset.resolved_salvage_value();
    if let (Some(explicit), Some(pct)) = (asset.salvage_value, asset.residual_percentage) {
        if pct > Decimal::ZERO && !asset.unit_price.is_zero() {
            let implied = explicit / asset.unit_price * dec!(100);
            if implied != pct {
                warnings.push(format!(
                    "Explicit salvage value {explicit} overrides residual percentage {pct}% \
                     (implies {}%)",
                    implied.round_dp(4)
                ));
            }
        }
    }

    let accumulated = cumulative_through(asset, input.as_of)?;
    let book_value = book_value_unchecked(asset, input.as_of)?;
    let monthly = monthly_depreciation(asset.unit_price, salvage, asset.useful_life_years)?;
    let fully_on = fully_depreciated_on(asset)?;

    if input.as_of < asset.siv_date {
        warnings.push(format!(
            "Valuation date {} precedes SIV date {}; no depreciation charged",
            input.as_of, asset.siv_date
        ));
    }

    let months_in_service = if input.as_of < asset.siv_date {
        0
    } else {
        month_index_of(input.as_of) - month_index_of(asset.siv_date) + 1
    };

    let cfg = &input.config;
    let output = BookValueSummary {
        as_of: input.as_of,
        unit_price: asset.unit_price,
        salvage_value: cfg.round(salvage),
        depreciable_amount: cfg.round(asset.depreciable_amount()),
        monthly_depreciation: cfg.round(monthly),
        accumulated_depreciation: cfg.round(accumulated),
        book_value: cfg.round(book_value),
        fully_depreciated_on: fully_on,
        is_fully_depreciated: accumulated == asset.depreciable_amount(),
        months_in_service,
    };

    let elapsed = start.elapsed().as_micros() as u64;
    Ok(with_metadata(
        "Straight-line depreciation with partial-month prorating",
        input,
        warnings,
        elapsed,
        output,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn input(as_of: NaiveDate) -> BookValueInput {
        BookValueInput {
            asset: AssetFinancials {
                residual_percentage: Some(dec!(1)),
                ..AssetFinancials::straight_line(dec!(3400), date(2021, 2, 10), 10)
            },
            as_of,
            config: EngineConfig::default(),
        }
    }

    #[test]
    fn test_summary_mid_life() {
        let out = calculate_book_value(&input(date(2021, 6, 30))).unwrap();
        let s = &out.result;
        assert_eq!(s.salvage_value, dec!(34));
        assert_eq!(s.depreciable_amount, dec!(3366));
        assert_eq!(s.monthly_depreciation, dec!(28.05));
        assert_eq!(s.accumulated_depreciation, dec!(131.23));
        assert_eq!(s.book_value, dec!(3268.77));
        assert_eq!(s.months_in_service, 5);
        assert!(!s.is_fully_depreciated);
        assert!(out.warnings.is_empty());
    }

    #[test]
    fn test_summary_before_service() {
        let out = calculate_book_value(&input(date(2020, 12, 31))).unwrap();
        assert_eq!(out.result.book_value, dec!(3400));
        assert_eq!(out.result.months_in_service, 0);
        assert_eq!(out.warnings.len(), 1);
    }

    #[test]
    fn test_summary_fully_depreciated() {
        let out = calculate_book_value(&input(date(2035, 1, 1))).unwrap();
        assert!(out.result.is_fully_depreciated);
        assert_eq!(out.result.book_value, dec!(34));
        assert_eq!(out.result.fully_depreciated_on, date(2031, 2, 28));
    }

    #[test]
    fn test_summary_salvage_equal_to_price_is_fully_depreciated() {
        let mut inp = input(date(2021, 6, 30));
        inp.asset.salvage_value = Some(dec!(3400));
        let out = calculate_book_value(&inp).unwrap();
        assert_eq!(out.result.depreciable_amount, dec!(0));
        assert_eq!(out.result.book_value, dec!(3400));
        assert!(out.result.is_fully_depreciated);
        assert!(inp.as_of < out.result.fully_depreciated_on);
    }

    #[test]
    fn test_summary_not_fully_depreciated_before_final_month() {
        let out = calculate_book_value(&input(date(2031, 1, 31))).unwrap();
        assert!(!out.result.is_fully_depreciated);
        let out = calculate_book_value(&input(date(2031, 2, 28))).unwrap();
        assert!(out.result.is_fully_depreciated);
    }

    #[test]
    fn test_summary_warns_on_conflicting_override() {
        let mut inp = input(date(2022, 1, 1));
        inp.asset.unit_price = dec!(2000);
        inp.asset.residual_percentage = Some(dec!(15));
        inp.asset.salvage_value = Some(dec!(500));
        let out = calculate_book_value(&inp).unwrap();
        assert_eq!(out.result.salvage_value, dec!(500));
        assert!(out.warnings.iter().any(|w| w.contains("overrides")));
    }
}
