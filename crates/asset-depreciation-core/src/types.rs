use serde::{Deserialize, Serialize};
use std::fmt;

use rust_decimal::Decimal;

/// All monetary values. Wraps Decimal to prevent accidental f64 usage.
pub type Money = Decimal;

/// Percentages expressed in percentage points (1 = 1%), as stored on asset rows.
pub type Percentage = Decimal;

/// Depreciation method recorded against an asset.
///
/// Only `StraightLine` is computed; the remaining variants exist so asset rows
/// carrying them deserialize cleanly and fail loudly when used.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DepreciationMethod {
    #[default]
    StraightLine,
    DecliningBalance,
    DoubleDeclining,
    SumOfYearsDigits,
    UnitsOfActivity,
}

impl fmt::Display for DepreciationMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            DepreciationMethod::StraightLine => "STRAIGHT_LINE",
            DepreciationMethod::DecliningBalance => "DECLINING_BALANCE",
            DepreciationMethod::DoubleDeclining => "DOUBLE_DECLINING",
            DepreciationMethod::SumOfYearsDigits => "SUM_OF_YEARS_DIGITS",
            DepreciationMethod::UnitsOfActivity => "UNITS_OF_ACTIVITY",
        };
        f.write_str(name)
    }
}

/// Standard computation output envelope
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComputationOutput<T: Serialize> {
    pub result: T,
    pub methodology: String,
    pub assumptions: serde_json::Value,
    pub warnings: Vec<String>,
    pub metadata: ComputationMetadata,
}

/// Metadata for every computation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComputationMetadata {
    pub version: String,
    pub computation_time_us: u64,
    pub precision: String,
}

/// Helper to wrap computation results with metadata
pub fn with_metadata<T: Serialize>(
    methodology: &str,
    assumptions: &impl Serialize,
    warnings: Vec<String>,
    elapsed_us: u64,
    result: T,
) -> ComputationOutput<T> {
    ComputationOutput {
        result,
        methodology: methodology.to_string(),
        assumptions: serde_json::to_value(assumptions).unwrap_or_default(),
        warnings,
        metadata: ComputationMetadata {
            version: env!("CARGO_PKG_VERSION").to_string(),
            computation_time_us: elapsed_us,
            precision: "rust_decimal_128bit".to_string(),
        },
    }
}
