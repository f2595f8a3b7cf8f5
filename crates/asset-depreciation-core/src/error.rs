use rust_decimal::Decimal;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum DepreciationError {
    #[error("Invalid input for {field}: {reason}")]
    InvalidInput { field: String, reason: String },

    #[error("Inconsistent override: salvage value {salvage_value} exceeds unit price {unit_price}")]
    InconsistentOverride {
        salvage_value: Decimal,
        unit_price: Decimal,
    },

    #[error("Division by zero in {context}")]
    DivisionByZero { context: String },

    #[error("Date error: {0}")]
    DateError(String),

    #[error("Depreciation method not implemented: {0}")]
    MethodNotImplemented(String),

    #[error("Serialization error: {0}")]
    SerializationError(String),
}

impl From<serde_json::Error> for DepreciationError {
    fn from(e: serde_json::Error) -> Self {
        DepreciationError::SerializationError(e.to_string())
    }
}
