//! Salvage (residual) value resolution.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use crate::types::{Money, Percentage};

/// Resolve the effective salvage value of an asset.
///
/// An explicit salvage value always wins, even when it implies a residual
/// percentage different from the one recorded. Otherwise a positive
/// percentage yields `unit_price * pct / 100`, and anything else yields zero.
/// No clamping happens here; `AssetFinancials::validate` rejects overrides
/// above the unit price.
pub fn resolve_salvage_value(
    unit_price: Money,
    residual_percentage: Option<Percentage>,
    explicit_salvage_value: Option<Money>,
) -> Money {
    if let Some(explicit) = explicit_salvage_value {
        return explicit;
    }
    match residual_percentage {
        Some(pct) if pct > Decimal::ZERO => unit_price * (pct / dec!(100)),
        _ => Decimal::ZERO,
    }
}

/// Total amount to expense over the useful life.
pub fn depreciable_amount(unit_price: Money, salvage_value: Money) -> Money {
    unit_price - salvage_value
}
