use std::result::Result as StdResult;

use rust_decimal::Decimal;
use thiserror::Error;

use parkbooks_domain::{SourceModule, TransactionType};

/// Unified error type for the accounting services.
#[derive(Debug, Error)]
pub enum CoreError {
    #[error("Validation failed: {0}")]
    Validation(String),
    #[error("Entry out of balance: debits {debits} != credits {credits}")]
    UnbalancedEntry { debits: Decimal, credits: Decimal },
    #[error("Invalid hierarchy: {0}")]
    InvalidHierarchy(String),
    #[error("Invalid transition: {0}")]
    InvalidTransition(String),
    #[error("Not found: {0}")]
    NotFound(String),
    #[error("No classifier rule for {module}/{kind} transactions")]
    UnmappedTransaction {
        module: SourceModule,
        kind: TransactionType,
    },
    #[error("Depreciation failed: {0}")]
    Depreciation(String),
    #[error("Persistence error: {0}")]
    Storage(String),
}

pub type Result<T> = StdResult<T, CoreError>;

impl From<std::io::Error> for CoreError {
    fn from(err: std::io::Error) -> Self {
        CoreError::Storage(err.to_string())
    }
}

impl From<serde_json::Error> for CoreError {
    fn from(err: serde_json::Error) -> Self {
        CoreError::Storage(err.to_string())
    }
}

impl From<parkbooks_config::ConfigError> for CoreError {
    fn from(err: parkbooks_config::ConfigError) -> Self {
        CoreError::Storage(err.to_string())
    }
}
