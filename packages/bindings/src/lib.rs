use napi::Result as NapiResult;
use napi_derive::napi;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use asset_depreciation_core::budget_year::{self, BudgetYearReportInput};
use asset_depreciation_core::depreciation::schedule::{self, ScheduleInput};
use asset_depreciation_core::depreciation::summary::{self, BookValueInput};
use asset_depreciation_core::disposal::{self, DisposalInput};
use asset_depreciation_core::population::{self, PopulationInput};
use asset_depreciation_core::{monthly_depreciation, resolve_salvage_value};

/// Convert any Display error into a napi::Error.
fn to_napi_error(e: impl std::fmt::Display) -> napi::Error {
    napi::Error::from_reason(e.to_string())
}

// ---------------------------------------------------------------------------
// Single asset
// ---------------------------------------------------------------------------

#[derive(Deserialize)]
struct SalvageRequest {
    unit_price: Decimal,
    #[serde(default)]
    residual_percentage: Option<Decimal>,
    #[serde(default)]
    salvage_value: Option<Decimal>,
}

#[derive(Serialize)]
struct SalvageResponse {
    salvage_value: Decimal,
    depreciable_amount: Decimal,
}

#[napi]
pub fn resolve_salvage(input_json: String) -> NapiResult<String> {
    let req: SalvageRequest = serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let salvage = resolve_salvage_value(req.unit_price, req.residual_percentage, req.salvage_value);
    serde_json::to_string(&SalvageResponse {
        salvage_value: salvage,
        depreciable_amount: req.unit_price - salvage,
    })
    .map_err(to_napi_error)
}

#[derive(Deserialize)]
struct MonthlyRequest {
    unit_price: Decimal,
    #[serde(default)]
    salvage_value: Decimal,
    useful_life_years: i32,
}

#[napi]
pub fn monthly_charge(input_json: String) -> NapiResult<String> {
    let req: MonthlyRequest = serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let monthly = monthly_depreciation(req.unit_price, req.salvage_value, req.useful_life_years)
        .map_err(to_napi_error)?;
    serde_json::to_string(&serde_json::json!({ "monthly_depreciation": monthly }))
        .map_err(to_napi_error)
}

#[napi]
pub fn calculate_book_value(input_json: String) -> NapiResult<String> {
    let input: BookValueInput = serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let output = summary::calculate_book_value(&input).map_err(to_napi_error)?;
    serde_json::to_string(&output).map_err(to_napi_error)
}

#[napi]
pub fn depreciation_schedule(input_json: String) -> NapiResult<String> {
    let input: ScheduleInput = serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let output = schedule::depreciation_schedule(&input).map_err(to_napi_error)?;
    serde_json::to_string(&output).map_err(to_napi_error)
}

#[napi]
pub fn calculate_disposal(input_json: String) -> NapiResult<String> {
    let input: DisposalInput = serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let output = disposal::calculate_disposal(&input).map_err(to_napi_error)?;
    serde_json::to_string(&output).map_err(to_napi_error)
}

// ---------------------------------------------------------------------------
// Reporting
// ---------------------------------------------------------------------------

#[napi]
pub fn budget_year_report(input_json: String) -> NapiResult<String> {
    let input: BudgetYearReportInput =
        serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let output = budget_year::budget_year_report(&input).map_err(to_napi_error)?;
    serde_json::to_string(&output).map_err(to_napi_error)
}

#[napi]
pub fn population_report(input_json: String) -> NapiResult<String> {
    let input: PopulationInput = serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let output = population::population_report(&input).map_err(to_napi_error)?;
    serde_json::to_string(&output).map_err(to_napi_error)
}
