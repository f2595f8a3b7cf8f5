//! Engine configuration.
//!
//! Every field has a default, so an empty JSON/YAML document (or no config at
//! all) yields a July-start fiscal year, two-decimal report figures and
//! not-in-service assets excluded from monthly counts.

use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};

use crate::error::DepreciationError;
use crate::DepreciationResult;

pub const DEFAULT_FISCAL_YEAR_START_MONTH: u32 = 7;
pub const DEFAULT_DECIMAL_PLACES: u32 = 2;
const MAX_DECIMAL_PLACES: u32 = 10;

/// How assets that are not yet in service are counted in monthly totals.
///
/// The total is the same under both policies (a not-in-service asset adds
/// nothing); only the per-month `asset_count` differs.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InServicePolicy {
    /// Leave the asset out of the month entirely.
    #[default]
    ExcludeNotInService,
    /// Count the asset in the month with a zero contribution.
    CountNotInServiceAsZero,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Calendar month (1-12) in which a budget year starts.
    pub fiscal_year_start_month: u32,
    pub in_service_policy: InServicePolicy,
    /// Decimal places applied to reported figures.
    pub decimal_places: u32,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            fiscal_year_start_month: DEFAULT_FISCAL_YEAR_START_MONTH,
            in_service_policy: InServicePolicy::default(),
            decimal_places: DEFAULT_DECIMAL_PLACES,
        }
    }
}

impl EngineConfig {
    pub fn validate(&self) -> DepreciationResult<()> {
        if !(1..=12).contains(&self.fiscal_year_start_month) {
            return Err(DepreciationError::InvalidInput {
                field: "fiscal_year_start_month".into(),
                reason: format!(
                    "Fiscal year start month must be between 1 and 12, got {}",
                    self.fiscal_year_start_month
                ),
            });
        }
        if self.decimal_places > MAX_DECIMAL_PLACES {
            return Err(DepreciationError::InvalidInput {
                field: "decimal_places".into(),
                reason: format!("At most {MAX_DECIMAL_PLACES} decimal places are supported"),
            });
        }
        Ok(())
    }

    /// Round a reported figure, midpoint away from zero.
    pub fn round(&self, value: Decimal) -> Decimal {
        value.round_dp_with_strategy(self.decimal_places, RoundingStrategy::MidpointAwayFromZero)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_empty_document_uses_defaults() {
        let cfg: EngineConfig = serde_json::from_str("{}").unwrap();
        assert_eq!(cfg, EngineConfig::default());
        assert_eq!(cfg.fiscal_year_start_month, 7);
        assert_eq!(cfg.in_service_policy, InServicePolicy::ExcludeNotInService);
    }

    #[test]
    fn test_partial_document() {
        let cfg: EngineConfig = serde_json::from_str(
            r#"{"fiscal_year_start_month": 4, "in_service_policy": "count_not_in_service_as_zero"}"#,
        )
        .unwrap();
        assert_eq!(cfg.fiscal_year_start_month, 4);
        assert_eq!(cfg.in_service_policy, InServicePolicy::CountNotInServiceAsZero);
        assert_eq!(cfg.decimal_places, 2);
    }

    #[test]
    fn test_validate_rejects_bad_month() {
        let cfg = EngineConfig {
            fiscal_year_start_month: 13,
            ..EngineConfig::default()
        };
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn test_round_midpoint_away_from_zero() {
        let cfg = EngineConfig::default();
        assert_eq!(cfg.round(dec!(3234.765)), dec!(3234.77));
        assert_eq!(cfg.round(dec!(-0.005)), dec!(-0.01));
    }
}
