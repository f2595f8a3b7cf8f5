pub mod depreciation;
pub mod reporting;
