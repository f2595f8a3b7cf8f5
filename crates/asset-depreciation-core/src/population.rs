//! Month-end book value totals across a population of assets.
//!
//! Used by the monthly trend report. Each asset is valued independently, so a
//! malformed row is logged and skipped without affecting the others.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::time::Instant;

use crate::asset::AssetRecord;
use crate::calendar;
use crate::config::{EngineConfig, InServicePolicy};
use crate::depreciation::book_value::book_value_unchecked;
use crate::types::{with_metadata, ComputationOutput, Money};
use crate::DepreciationResult;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PopulationInput {
    /// Calendar year to report on
    pub year: i32,
    pub assets: Vec<AssetRecord>,
    #[serde(default)]
    pub config: EngineConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PopulationTotals {
    pub year: i32,
    pub in_service_policy: InServicePolicy,
    /// Keyed by month number, 1 through 12
    pub months: BTreeMap<u32, MonthlyTotal>,
    pub assets_valued: usize,
    pub skipped_assets: Vec<SkippedAsset>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MonthlyTotal {
    pub month_end: NaiveDate,
    pub total_book_value: Money,
    /// Assets counted for the month under the configured policy
    pub asset_count: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SkippedAsset {
    pub asset_id: String,
    pub reason: String,
}

struct Aggregate {
    months: BTreeMap<u32, MonthlyTotal>,
    assets_valued: usize,
    skipped: Vec<SkippedAsset>,
}

/// Month-end book value totals for `year`, keyed by month (1-12).
///
/// Assets not yet in service at a month end add nothing to that month.
/// Malformed rows are skipped with a logged warning.
pub fn monthly_book_value_totals(
    assets: &[AssetRecord],
    year: i32,
) -> DepreciationResult<BTreeMap<u32, Money>> {
    let agg = aggregate(assets, year, InServicePolicy::default())?;
    Ok(agg
        .months
        .into_iter()
        .map(|(month, total)| (month, total.total_book_value))
        .collect())
}

/// Monthly totals wrapped in the standard output envelope.
pub fn population_report(
    input: &PopulationInput,
) -> DepreciationResult<ComputationOutput<PopulationTotals>> {
    let start = Instant::now();

    input.config.validate()?;
    let agg = aggregate(&input.assets, input.year, input.config.in_service_policy)?;

    let warnings: Vec<String> = agg
        .skipped
        .iter()
        .map(|s| format!("Skipped asset {}: {}", s.asset_id, s.reason))
        .collect();

    let cfg = &input.config;
    let months = agg
        .months
        .into_iter()
        .map(|(month, total)| {
            (
                month,
                MonthlyTotal {
                    total_book_value: cfg.round(total.total_book_value),
                    ..total
                },
            )
        })
        .collect();

    let output = PopulationTotals {
        year: input.year,
        in_service_policy: input.config.in_service_policy,
        months,
        assets_valued: agg.assets_valued,
        skipped_assets: agg.skipped,
    };

    let elapsed = start.elapsed().as_micros() as u64;
    Ok(with_metadata(
        "Sum of month-end straight-line book values across assets",
        &serde_json::json!({
            "year": input.year,
            "asset_count": input.assets.len(),
            "config": input.config,
        }),
        warnings,
        elapsed,
        output,
    ))
}

fn aggregate(
    assets: &[AssetRecord],
    year: i32,
    policy: InServicePolicy,
) -> DepreciationResult<Aggregate> {
    let mut month_ends = Vec::with_capacity(12);
    for month in 1..=12u32 {
        month_ends.push((month, calendar::last_day_of_month(year, month)?));
    }

    let mut months: BTreeMap<u32, MonthlyTotal> = month_ends
        .iter()
        .map(|&(month, month_end)| {
            (
                month,
                MonthlyTotal {
                    month_end,
                    total_book_value: Decimal::ZERO,
                    asset_count: 0,
                },
            )
        })
        .collect();

    let mut assets_valued = 0;
    let mut skipped = Vec::new();

    for record in assets {
        match value_asset(record, &month_ends) {
            Ok(values) => {
                assets_valued += 1;
                for (month, value) in values {
                    let Some(slot) = months.get_mut(&month) else {
                        continue;
                    };
                    match value {
                        Some(bv) => {
                            slot.total_book_value += bv;
                            slot.asset_count += 1;
                        }
                        None if policy == InServicePolicy::CountNotInServiceAsZero => {
                            slot.asset_count += 1;
                        }
                        None => {}
                    }
                }
            }
            Err(e) => {
                log::warn!("skipping asset {} in monthly totals: {e}", record.asset_id);
                skipped.push(SkippedAsset {
                    asset_id: record.asset_id.clone(),
                    reason: e.to_string(),
                });
            }
        }
    }

    Ok(Aggregate {
        months,
        assets_valued,
        skipped,
    })
}

/// Month-end book values for one asset; `None` where it is not yet in service.
fn value_asset(
    record: &AssetRecord,
    month_ends: &[(u32, NaiveDate)],
) -> DepreciationResult<Vec<(u32, Option<Money>)>> {
    let asset = record.to_financials()?;
    month_ends
        .iter()
        .map(|&(month, month_end)| {
            if asset.siv_date > month_end {
                Ok((month, None))
            } else {
                book_value_unchecked(&asset, month_end).map(|bv| (month, Some(bv)))
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::DepreciationMethod;
    use rust_decimal_macros::dec;

    fn record(id: &str, price: Decimal, siv: &str, years: i32) -> AssetRecord {
        AssetRecord {
            asset_id: id.into(),
            unit_price: price,
            siv_date: siv.into(),
            useful_life_years: years,
            residual_percentage: None,
            salvage_value: None,
            depreciation_method: DepreciationMethod::StraightLine,
        }
    }

    #[test]
    fn test_single_asset_totals() {
        // 1200 over 1 year from 1 Jan: 100 per month
        let totals =
            monthly_book_value_totals(&[record("A", dec!(1200), "2023-01-01", 1)], 2023).unwrap();
        assert_eq!(totals.len(), 12);
        assert_eq!(totals[&1], dec!(1100));
        assert_eq!(totals[&6], dec!(600));
        assert_eq!(totals[&12], dec!(0));
    }

    #[test]
    fn test_not_in_service_contributes_nothing() {
        let assets = [
            record("A", dec!(1200), "2023-01-01", 1),
            record("B", dec!(2400), "2023-07-01", 2),
        ];
        let totals = monthly_book_value_totals(&assets, 2023).unwrap();
        // June: only A (600)
        assert_eq!(totals[&6], dec!(600));
        // July: A at 500 + B at 2400 - 100
        assert_eq!(totals[&7], dec!(2800));
    }

    #[test]
    fn test_malformed_asset_skipped() {
        let assets = [
            record("A", dec!(1200), "2023-01-01", 1),
            record("BAD-DATE", dec!(500), "2023-13-45", 5),
            record("BAD-LIFE", dec!(500), "2023-01-01", 0),
        ];
        let input = PopulationInput {
            year: 2023,
            assets: assets.to_vec(),
            config: EngineConfig::default(),
        };
        let out = population_report(&input).unwrap();
        assert_eq!(out.result.assets_valued, 1);
        assert_eq!(out.result.skipped_assets.len(), 2);
        assert_eq!(out.warnings.len(), 2);
        assert_eq!(out.result.months[&1].total_book_value, dec!(1100));
    }

    #[test]
    fn test_unimplemented_method_is_skipped() {
        let mut bad = record("DDB", dec!(1000), "2023-01-01", 5);
        bad.depreciation_method = DepreciationMethod::DoubleDeclining;
        let totals =
            monthly_book_value_totals(&[record("A", dec!(1200), "2023-01-01", 1), bad], 2023)
                .unwrap();
        assert_eq!(totals[&1], dec!(1100));
    }

    #[test]
    fn test_in_service_policy_affects_count_only() {
        let assets = vec![
            record("A", dec!(1200), "2023-01-01", 1),
            record("B", dec!(2400), "2023-07-01", 2),
        ];
        let exclude = population_report(&PopulationInput {
            year: 2023,
            assets: assets.clone(),
            config: EngineConfig::default(),
        })
        .unwrap();
        let count_zero = population_report(&PopulationInput {
            year: 2023,
            assets,
            config: EngineConfig {
                in_service_policy: InServicePolicy::CountNotInServiceAsZero,
                ..EngineConfig::default()
            },
        })
        .unwrap();

        let march_ex = &exclude.result.months[&3];
        let march_zero = &count_zero.result.months[&3];
        assert_eq!(march_ex.total_book_value, march_zero.total_book_value);
        assert_eq!(march_ex.asset_count, 1);
        assert_eq!(march_zero.asset_count, 2);
    }

    #[test]
    fn test_empty_population() {
        let totals = monthly_book_value_totals(&[], 2023).unwrap();
        assert!(totals.values().all(|v| v.is_zero()));
    }
}
