//! Domain types for double-entry journal entries.

use std::fmt;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::common::*;
use crate::transaction::TransactionRef;

/// Lifecycle state of a journal entry.
///
/// `Posted` is terminal except for reversal (a new entry); `Void` is terminal.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum EntryStatus {
    Draft,
    Posted,
    Void,
}

impl fmt::Display for EntryStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            EntryStatus::Draft => "Draft",
            EntryStatus::Posted => "Posted",
            EntryStatus::Void => "Void",
        };
        f.write_str(label)
    }
}

/// One line within a journal entry. Exactly one of `debit`/`credit` is
/// non-zero; both are non-negative.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct EntryDetail {
    pub category_id: Uuid,
    pub debit: Decimal,
    pub credit: Decimal,
    #[serde(default)]
    pub sort_order: u32,
}

impl EntryDetail {
    pub fn debit(category_id: Uuid, amount: Decimal) -> Self {
        Self {
            category_id,
            debit: amount,
            credit: Decimal::ZERO,
            sort_order: 0,
        }
    }

    pub fn credit(category_id: Uuid, amount: Decimal) -> Self {
        Self {
            category_id,
            debit: Decimal::ZERO,
            credit: amount,
            sort_order: 0,
        }
    }

    /// Checks the one-sided, non-negative line invariant.
    pub fn is_well_formed(&self) -> bool {
        if self.debit < Decimal::ZERO || self.credit < Decimal::ZERO {
            return false;
        }
        (self.debit.is_zero()) != (self.credit.is_zero())
    }
}

/// One unit of double-entry bookkeeping.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct JournalEntry {
    pub id: Uuid,
    pub entry_number: String,
    pub date: NaiveDate,
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reference: Option<String>,
    pub total_amount: Decimal,
    pub status: EntryStatus,
    /// Weak back-reference to the originating raw transaction, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<TransactionRef>,
    pub lines: Vec<EntryDetail>,
}

impl JournalEntry {
    pub fn draft(
        entry_number: impl Into<String>,
        date: NaiveDate,
        description: impl Into<String>,
        lines: Vec<EntryDetail>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            entry_number: entry_number.into(),
            date,
            description: description.into(),
            reference: None,
            total_amount: Decimal::ZERO,
            status: EntryStatus::Draft,
            source: None,
            lines,
        }
    }

    pub fn with_reference(mut self, reference: impl Into<String>) -> Self {
        self.reference = Some(reference.into());
        self
    }

    pub fn with_source(mut self, source: TransactionRef) -> Self {
        self.source = Some(source);
        self
    }

    pub fn debit_total(&self) -> Decimal {
        self.lines.iter().map(|line| line.debit).sum()
    }

    pub fn credit_total(&self) -> Decimal {
        self.lines.iter().map(|line| line.credit).sum()
    }

    /// Exact decimal comparison; no tolerance.
    pub fn is_balanced(&self) -> bool {
        self.debit_total() == self.credit_total()
    }

    /// Period bucket the entry posts into, derived from its date.
    pub fn period(&self) -> Period {
        Period::from_date(self.date)
    }
}

impl Identifiable for JournalEntry {
    fn id(&self) -> Uuid {
        self.id
    }
}

impl Displayable for JournalEntry {
    fn display_label(&self) -> String {
        format!("{} {}", self.entry_number, self.description)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn sample_date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 5, 10).unwrap()
    }

    #[test]
    fn balanced_when_totals_match_exactly() {
        let a = Uuid::new_v4();
        let b = Uuid::new_v4();
        let entry = JournalEntry::draft(
            "AST-2024-05-0001",
            sample_date(),
            "Test",
            vec![
                EntryDetail::debit(a, dec!(100.50)),
                EntryDetail::credit(b, dec!(100.50)),
            ],
        );
        assert!(entry.is_balanced());
        assert_eq!(entry.debit_total(), dec!(100.50));
    }

    #[test]
    fn unbalanced_by_a_cent() {
        let a = Uuid::new_v4();
        let b = Uuid::new_v4();
        let entry = JournalEntry::draft(
            "AST-2024-05-0002",
            sample_date(),
            "Test",
            vec![
                EntryDetail::debit(a, dec!(100.00)),
                EntryDetail::credit(b, dec!(99.99)),
            ],
        );
        assert!(!entry.is_balanced());
    }

    #[test]
    fn line_invariant_rejects_two_sided_and_negative() {
        let id = Uuid::new_v4();
        assert!(EntryDetail::debit(id, dec!(10)).is_well_formed());
        let two_sided = EntryDetail {
            category_id: id,
            debit: dec!(10),
            credit: dec!(10),
            sort_order: 0,
        };
        assert!(!two_sided.is_well_formed());
        let negative = EntryDetail::debit(id, dec!(-5));
        assert!(!negative.is_well_formed());
        let empty = EntryDetail {
            category_id: id,
            debit: Decimal::ZERO,
            credit: Decimal::ZERO,
            sort_order: 0,
        };
        assert!(!empty.is_well_formed());
    }

    #[test]
    fn period_derived_from_date() {
        let entry = JournalEntry::draft("N", sample_date(), "Test", Vec::new());
        assert_eq!(entry.period().to_string(), "2024-05");
    }
}
