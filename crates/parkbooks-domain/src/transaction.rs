//! Raw financial events submitted by upstream park modules.

use std::fmt;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Upstream modules allowed to submit transactions. A closed enum so an
/// unmapped source is unrepresentable rather than a runtime string typo.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum SourceModule {
    Assets,
    Concessions,
    HumanResources,
    Events,
}

impl fmt::Display for SourceModule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            SourceModule::Assets => "assets",
            SourceModule::Concessions => "concessions",
            SourceModule::HumanResources => "human_resources",
            SourceModule::Events => "events",
        };
        f.write_str(label)
    }
}

/// Kinds of raw financial events.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum TransactionType {
    Income,
    Expense,
    Transfer,
    Depreciation,
}

impl fmt::Display for TransactionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            TransactionType::Income => "income",
            TransactionType::Expense => "expense",
            TransactionType::Transfer => "transfer",
            TransactionType::Depreciation => "depreciation",
        };
        f.write_str(label)
    }
}

/// Identifies the originating record in its source module. Classification is
/// idempotent per ref: the same ref never yields two journal entries.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct TransactionRef {
    pub module: SourceModule,
    pub source_id: String,
}

impl TransactionRef {
    pub fn new(module: SourceModule, source_id: impl Into<String>) -> Self {
        Self {
            module,
            source_id: source_id.into(),
        }
    }
}

impl fmt::Display for TransactionRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.module, self.source_id)
    }
}

/// A raw financial event awaiting classification into a journal entry.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RawTransaction {
    pub amount: Decimal,
    pub date: NaiveDate,
    pub kind: TransactionType,
    pub source: TransactionRef,
    pub description: String,
}

impl RawTransaction {
    pub fn new(
        amount: Decimal,
        date: NaiveDate,
        kind: TransactionType,
        source: TransactionRef,
        description: impl Into<String>,
    ) -> Self {
        Self {
            amount,
            date,
            kind,
            source,
            description: description.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn source_module_serializes_snake_case() {
        let json = serde_json::to_string(&SourceModule::HumanResources).unwrap();
        assert_eq!(json, "\"human_resources\"");
    }

    #[test]
    fn transaction_ref_display() {
        let source = TransactionRef::new(SourceModule::Events, "evt-42");
        assert_eq!(source.to_string(), "events/evt-42");
    }
}
