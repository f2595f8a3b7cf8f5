//! Asset financial snapshot consumed by the engine, and the loosely-typed
//! asset row it is parsed from.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::calendar;
use crate::depreciation::salvage::{depreciable_amount, resolve_salvage_value};
use crate::error::DepreciationError;
use crate::types::{DepreciationMethod, Money, Percentage};
use crate::DepreciationResult;

/// Financial attributes of a single asset.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AssetFinancials {
    /// Acquisition cost
    pub unit_price: Money,
    /// Date the asset was placed into service (store issue voucher date)
    pub siv_date: NaiveDate,
    /// Depreciation horizon in years
    pub useful_life_years: i32,
    /// Residual value as a percentage of unit price (1 = 1%)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub residual_percentage: Option<Percentage>,
    /// Explicit salvage value; takes precedence over the percentage
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub salvage_value: Option<Money>,
    #[serde(default)]
    pub depreciation_method: DepreciationMethod,
}

impl AssetFinancials {
    pub fn straight_line(unit_price: Money, siv_date: NaiveDate, useful_life_years: i32) -> Self {
        Self {
            unit_price,
            siv_date,
            useful_life_years,
            residual_percentage: None,
            salvage_value: None,
            depreciation_method: DepreciationMethod::StraightLine,
        }
    }

    /// Effective salvage value (explicit override, else percentage-derived, else zero).
    pub fn resolved_salvage_value(&self) -> Money {
        resolve_salvage_value(self.unit_price, self.residual_percentage, self.salvage_value)
    }

    pub fn depreciable_amount(&self) -> Money {
        depreciable_amount(self.unit_price, self.resolved_salvage_value())
    }

    pub fn validate(&self) -> DepreciationResult<()> {
        if self.unit_price < Decimal::ZERO {
            return Err(DepreciationError::InvalidInput {
                field: "unit_price".into(),
                reason: "Unit price cannot be negative".into(),
            });
        }
        if self.useful_life_years <= 0 {
            return Err(DepreciationError::InvalidInput {
                field: "useful_life_years".into(),
                reason: format!(
                    "Useful life must be a positive number of years, got {}",
                    self.useful_life_years
                ),
            });
        }
        if let Some(pct) = self.residual_percentage {
            if pct < Decimal::ZERO || pct > dec!(100) {
                return Err(DepreciationError::InvalidInput {
                    field: "residual_percentage".into(),
                    reason: format!("Residual percentage must be between 0 and 100, got {pct}"),
                });
            }
        }
        if let Some(salvage) = self.salvage_value {
            if salvage < Decimal::ZERO {
                return Err(DepreciationError::InvalidInput {
                    field: "salvage_value".into(),
                    reason: "Salvage value cannot be negative".into(),
                });
            }
        }
        let salvage = self.resolved_salvage_value();
        if salvage > self.unit_price {
            return Err(DepreciationError::InconsistentOverride {
                salvage_value: salvage,
                unit_price: self.unit_price,
            });
        }
        Ok(())
    }

    /// Snapshot after a capital improvement raising the acquisition cost.
    ///
    /// A percentage-derived salvage value scales with the new unit price; an
    /// explicit override is kept as recorded.
    pub fn with_capital_improvement(&self, amount: Money) -> DepreciationResult<Self> {
        if amount < Decimal::ZERO {
            return Err(DepreciationError::InvalidInput {
                field: "amount".into(),
                reason: "Capital improvement amount cannot be negative".into(),
            });
        }
        let improved = Self {
            unit_price: self.unit_price + amount,
            ..self.clone()
        };
        improved.validate()?;
        Ok(improved)
    }
}

/// An asset row as delivered by the asset store or a report route.
///
/// Dates arrive as strings, so a malformed row can be reported and skipped
/// without failing deserialization of the whole batch.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AssetRecord {
    pub asset_id: String,
    pub unit_price: Money,
    pub siv_date: String,
    pub useful_life_years: i32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub residual_percentage: Option<Percentage>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub salvage_value: Option<Money>,
    #[serde(default)]
    pub depreciation_method: DepreciationMethod,
}

impl AssetRecord {
    pub fn to_financials(&self) -> DepreciationResult<AssetFinancials> {
        let financials = AssetFinancials {
            unit_price: self.unit_price,
            siv_date: calendar::parse_date(&self.siv_date)?,
            useful_life_years: self.useful_life_years,
            residual_percentage: self.residual_percentage,
            salvage_value: self.salvage_value,
            depreciation_method: self.depreciation_method,
        };
        financials.validate()?;
        Ok(financials)
    }
}
