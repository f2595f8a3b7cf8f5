//! Gain or loss on disposal of an asset.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::time::Instant;

use crate::asset::AssetFinancials;
use crate::config::EngineConfig;
use crate::depreciation::book_value::{book_value_unchecked, cumulative_through};
use crate::error::DepreciationError;
use crate::types::{with_metadata, ComputationOutput, Money};
use crate::DepreciationResult;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DisposalInput {
    pub asset: AssetFinancials,
    pub disposal_date: NaiveDate,
    /// Cash or fair value received for the asset
    pub proceeds: Money,
    #[serde(default)]
    pub config: EngineConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DisposalOutput {
    pub disposal_date: NaiveDate,
    pub accumulated_depreciation: Money,
    pub book_value_at_disposal: Money,
    pub proceeds: Money,
    /// Positive for a gain, negative for a loss
    pub gain_loss: Money,
    pub is_gain: bool,
}

/// Compare disposal proceeds against book value at the disposal date.
pub fn calculate_disposal(
    input: &DisposalInput,
) -> DepreciationResult<ComputationOutput<DisposalOutput>> {
    let start = Instant::now();
    let mut warnings: Vec<String> = Vec::new();

    input.config.validate()?;
    input.asset.validate()?;
    if input.proceeds < Decimal::ZERO {
        return Err(DepreciationError::InvalidInput {
            field: "proceeds".into(),
            reason: "Disposal proceeds cannot be negative".into(),
        });
    }
    if input.disposal_date < input.asset.siv_date {
        warnings.push(format!(
            "Disposal date {} precedes SIV date {}; asset was never in service",
            input.disposal_date, input.asset.siv_date
        ));
    }

    let accumulated = cumulative_through(&input.asset, input.disposal_date)?;
    let book_value = book_value_unchecked(&input.asset, input.disposal_date)?;
    let gain_loss = input.proceeds - book_value;

    let cfg = &input.config;
    let output = DisposalOutput {
        disposal_date: input.disposal_date,
        accumulated_depreciation: cfg.round(accumulated),
        book_value_at_disposal: cfg.round(book_value),
        proceeds: input.proceeds,
        gain_loss: cfg.round(gain_loss),
        is_gain: gain_loss > Decimal::ZERO,
    };

    let elapsed = start.elapsed().as_micros() as u64;
    Ok(with_metadata(
        "Disposal gain/loss against straight-line book value",
        input,
        warnings,
        elapsed,
        output,
    ))
}
