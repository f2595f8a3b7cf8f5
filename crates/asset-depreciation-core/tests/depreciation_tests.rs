use asset_depreciation_core::depreciation::schedule::{depreciation_schedule, ScheduleInput};
use asset_depreciation_core::{
    accumulated_depreciation, book_value, depreciable_amount, monthly_depreciation,
    prorated_month_fraction, resolve_salvage_value, AssetFinancials, DepreciationError,
    DepreciationMethod, EngineConfig,
};
use chrono::{Datelike, Months, NaiveDate};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

/// A spread of asset shapes: mid-month and first-of-month starts, leap
/// February, explicit and percentage salvage, short and long lives.
fn sample_assets() -> Vec<AssetFinancials> {
    vec![
        AssetFinancials {
            residual_percentage: Some(dec!(1)),
            ..AssetFinancials::straight_line(dec!(3400.00), date(2021, 2, 10), 10)
        },
        AssetFinancials {
            residual_percentage: Some(dec!(15)),
            salvage_value: Some(dec!(500)),
            ..AssetFinancials::straight_line(dec!(2000), date(2019, 11, 30), 4)
        },
        AssetFinancials::straight_line(dec!(999.99), date(2024, 2, 10), 3),
        AssetFinancials {
            residual_percentage: Some(dec!(10)),
            ..AssetFinancials::straight_line(dec!(125000), date(2020, 1, 1), 25)
        },
        AssetFinancials {
            salvage_value: Some(dec!(7)),
            ..AssetFinancials::straight_line(dec!(7), date(2022, 8, 31), 1)
        },
    ]
}

/// Month-ish steps from well before service to well after the useful life.
fn query_dates(asset: &AssetFinancials) -> Vec<NaiveDate> {
    let start = asset.siv_date - chrono::Days::new(400);
    let horizon = (asset.useful_life_years as u32 + 3) * 12 + 14;
    (0..horizon)
        .map(|i| start + Months::new(i))
        .chain([asset.siv_date, asset.siv_date.pred_opt().unwrap()])
        .collect()
}

// ===========================================================================
// Invariants
// ===========================================================================

#[test]
fn test_floor_invariant() {
    for asset in sample_assets() {
        let salvage = asset.resolved_salvage_value();
        for d in query_dates(&asset) {
            let bv = book_value(&asset, d).unwrap();
            assert!(bv >= salvage, "{d}: book value {bv} below salvage {salvage}");
        }
    }
}

#[test]
fn test_ceiling_invariant() {
    for asset in sample_assets() {
        for d in query_dates(&asset) {
            let bv = book_value(&asset, d).unwrap();
            assert!(
                bv <= asset.unit_price,
                "{d}: book value {bv} above unit price {}",
                asset.unit_price
            );
        }
    }
}

#[test]
fn test_monotonic_non_increasing() {
    for asset in sample_assets() {
        let mut dates = query_dates(&asset);
        dates.sort();
        let values: Vec<Decimal> = dates.iter().map(|d| book_value(&asset, *d).unwrap()).collect();
        for (i, pair) in values.windows(2).enumerate() {
            assert!(
                pair[1] <= pair[0],
                "book value rose from {} to {} between {} and {}",
                pair[0],
                pair[1],
                dates[i],
                dates[i + 1]
            );
        }
    }
}

#[test]
fn test_pre_service_is_exact_unit_price() {
    for asset in sample_assets() {
        let day_before = asset.siv_date.pred_opt().unwrap();
        assert_eq!(book_value(&asset, day_before).unwrap(), asset.unit_price);
        assert_eq!(
            book_value(&asset, asset.siv_date - Months::new(30)).unwrap(),
            asset.unit_price
        );
    }
}

#[test]
fn test_saturation_is_exact_salvage() {
    for asset in sample_assets() {
        let salvage = asset.resolved_salvage_value();
        let past_life = asset.siv_date + Months::new(asset.useful_life_years as u32 * 12 + 1);
        assert_eq!(book_value(&asset, past_life).unwrap(), salvage);
        assert_eq!(book_value(&asset, date(2199, 12, 31)).unwrap(), salvage);
    }
}

#[test]
fn test_accumulated_never_exceeds_depreciable_amount() {
    for asset in sample_assets() {
        let acc = accumulated_depreciation(&asset, date(1990, 1, 1), date(2199, 12, 31)).unwrap();
        assert_eq!(acc, asset.depreciable_amount());
    }
}

// ===========================================================================
// Salvage resolution
// ===========================================================================

#[test]
fn test_explicit_override_wins() {
    assert_eq!(
        resolve_salvage_value(dec!(2000), Some(dec!(15)), Some(dec!(500))),
        dec!(500)
    );
}

#[test]
fn test_zero_residual() {
    let salvage = resolve_salvage_value(dec!(3400), None, None);
    assert_eq!(salvage, Decimal::ZERO);
    assert_eq!(depreciable_amount(dec!(3400), salvage), dec!(3400));

    let salvage = resolve_salvage_value(dec!(3400), Some(Decimal::ZERO), None);
    assert_eq!(salvage, Decimal::ZERO);
}

// ===========================================================================
// Prorating
// ===========================================================================

#[test]
fn test_leap_year_february_uses_29_days() {
    let siv = date(2024, 2, 10);
    let fraction = prorated_month_fraction(siv, 2, 2024).unwrap();
    assert_eq!(fraction, dec!(20) / dec!(29));

    // First month's charge for a 10-year asset with no salvage
    let asset = AssetFinancials::straight_line(dec!(1200), siv, 10);
    let bv = book_value(&asset, date(2024, 2, 29)).unwrap();
    let monthly = monthly_depreciation(dec!(1200), Decimal::ZERO, 10).unwrap();
    assert_eq!(monthly, dec!(10));
    let expected = dec!(1200) - dec!(10) * dec!(20) / dec!(29);
    assert!((bv - expected).abs() < dec!(0.0000001), "got {bv}");
}

#[test]
fn test_non_leap_february_uses_28_days() {
    let fraction = prorated_month_fraction(date(2023, 2, 10), 2, 2023).unwrap();
    assert_eq!(fraction, dec!(19) / dec!(28));
}

// ===========================================================================
// Errors
// ===========================================================================

#[test]
fn test_invalid_inputs_fail_fast() {
    let mut zero_life = AssetFinancials::straight_line(dec!(1000), date(2021, 1, 1), 0);
    assert!(matches!(
        book_value(&zero_life, date(2022, 1, 1)),
        Err(DepreciationError::InvalidInput { .. })
    ));
    zero_life.useful_life_years = -2;
    assert!(book_value(&zero_life, date(2022, 1, 1)).is_err());

    let negative = AssetFinancials::straight_line(dec!(-5), date(2021, 1, 1), 5);
    assert!(matches!(
        book_value(&negative, date(2022, 1, 1)),
        Err(DepreciationError::InvalidInput { .. })
    ));

    assert!(matches!(
        monthly_depreciation(dec!(1000), dec!(0), 0),
        Err(DepreciationError::DivisionByZero { .. })
    ));
}

#[test]
fn test_inconsistent_override_surfaces() {
    let asset = AssetFinancials {
        salvage_value: Some(dec!(1500)),
        ..AssetFinancials::straight_line(dec!(1000), date(2021, 1, 1), 5)
    };
    assert!(matches!(
        book_value(&asset, date(2022, 1, 1)),
        Err(DepreciationError::InconsistentOverride { .. })
    ));
}

#[test]
fn test_other_methods_not_implemented() {
    for method in [
        DepreciationMethod::DecliningBalance,
        DepreciationMethod::DoubleDeclining,
        DepreciationMethod::SumOfYearsDigits,
        DepreciationMethod::UnitsOfActivity,
    ] {
        let asset = AssetFinancials {
            depreciation_method: method,
            ..AssetFinancials::straight_line(dec!(1000), date(2021, 1, 1), 5)
        };
        match book_value(&asset, date(2022, 1, 1)) {
            Err(DepreciationError::MethodNotImplemented(name)) => {
                assert_eq!(name, method.to_string())
            }
            other => panic!("{method}: expected MethodNotImplemented, got {other:?}"),
        }
    }
}

// ===========================================================================
// Schedule and capital improvements
// ===========================================================================

#[test]
fn test_schedule_agrees_with_point_book_values() {
    let asset = sample_assets().remove(0);
    let out = depreciation_schedule(&ScheduleInput {
        asset: asset.clone(),
        period_start: None,
        period_end: None,
        config: EngineConfig::default(),
    })
    .unwrap();

    for row in &out.result.rows {
        let bv = book_value(&asset, row.month_end).unwrap();
        assert!(
            (row.book_value - bv).abs() <= dec!(0.005),
            "{}: schedule {} vs point {}",
            row.month_end,
            row.book_value,
            bv
        );
    }
}

#[test]
fn test_capital_improvement_raises_book_value() {
    let asset = AssetFinancials {
        residual_percentage: Some(dec!(10)),
        ..AssetFinancials::straight_line(dec!(10000), date(2020, 1, 1), 5)
    };
    let improved = asset.with_capital_improvement(dec!(2000)).unwrap();
    let as_of = date(2022, 12, 31);

    let before = book_value(&asset, as_of).unwrap();
    let after = book_value(&improved, as_of).unwrap();
    assert!(after > before);
    assert_eq!(improved.resolved_salvage_value(), dec!(1200));
    assert_eq!(
        book_value(&improved, date(2030, 1, 1)).unwrap(),
        dec!(1200)
    );
}

// ===========================================================================
// Large amounts and lifetime caps
// ===========================================================================

#[test]
fn test_large_unit_price_saturates_without_overflow() {
    let price = dec!(100000000000000000000000000);
    let asset = AssetFinancials::straight_line(price, date(2021, 2, 10), 10);

    assert_eq!(book_value(&asset, date(2090, 1, 1)).unwrap(), Decimal::ZERO);
    let mid = book_value(&asset, date(2026, 1, 31)).unwrap();
    assert!(mid > Decimal::ZERO && mid < price, "got {mid}");
}

#[test]
fn test_budget_windows_never_exceed_depreciable_amount() {
    for asset in sample_assets() {
        let first = asset.siv_date.year() - 1;
        let total: Decimal = (first..first + asset.useful_life_years + 5)
            .map(|y| accumulated_depreciation(&asset, date(y, 7, 1), date(y + 1, 6, 30)).unwrap())
            .sum();
        let excess = total - asset.depreciable_amount();
        assert!(excess.abs() < dec!(0.000001), "windows sum to {total}");
    }
}
