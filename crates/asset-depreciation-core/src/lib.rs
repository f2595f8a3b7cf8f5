pub mod asset;
pub mod calendar;
pub mod config;
pub mod depreciation;
pub mod error;
pub mod types;

#[cfg(feature = "reporting")]
pub mod budget_year;

#[cfg(feature = "reporting")]
pub mod population;

#[cfg(feature = "disposal")]
pub mod disposal;

pub use asset::{AssetFinancials, AssetRecord};
pub use config::{EngineConfig, InServicePolicy};
pub use depreciation::book_value::{
    accumulated_depreciation, book_value, book_value_for_period, depreciation_through,
    fully_depreciated_on, PeriodBookValue,
};
pub use depreciation::salvage::{depreciable_amount, resolve_salvage_value};
pub use depreciation::straight_line::{monthly_depreciation, prorated_month_fraction};
pub use error::DepreciationError;
pub use types::*;

/// Standard result type for all depreciation operations
pub type DepreciationResult<T> = Result<T, DepreciationError>;
