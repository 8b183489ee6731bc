//! The `Book` aggregate: one park's complete accounting state.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::asset::{FixedAsset, MonthlyDepreciation};
use crate::balance::AccountBalance;
use crate::category::Category;
use crate::common::Period;
use crate::journal::JournalEntry;
use crate::transaction::TransactionRef;

/// Flat, arena-style container for categories, entries, balances, and assets.
///
/// Services mutate the book only through `&mut Book`; the single mutable
/// borrow is the transaction boundary, so postings to the same balance row
/// cannot interleave.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Book {
    pub name: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    #[serde(default)]
    pub categories: Vec<Category>,
    #[serde(default)]
    pub entries: Vec<JournalEntry>,
    #[serde(default)]
    pub balances: Vec<AccountBalance>,
    #[serde(default)]
    pub assets: Vec<FixedAsset>,
    #[serde(default)]
    pub depreciation: Vec<MonthlyDepreciation>,
    /// Per-period entry-number counters; never reset, never reused.
    #[serde(default)]
    pub entry_sequences: BTreeMap<Period, u32>,
}

impl Book {
    pub fn new(name: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            name: name.into(),
            created_at: now,
            updated_at: now,
            categories: Vec::new(),
            entries: Vec::new(),
            balances: Vec::new(),
            assets: Vec::new(),
            depreciation: Vec::new(),
            entry_sequences: BTreeMap::new(),
        }
    }

    /// Bumps the modification timestamp after a mutation.
    pub fn touch(&mut self) {
        self.updated_at = Utc::now();
    }

    pub fn category(&self, id: Uuid) -> Option<&Category> {
        self.categories.iter().find(|category| category.id == id)
    }

    pub fn category_mut(&mut self, id: Uuid) -> Option<&mut Category> {
        self.categories.iter_mut().find(|category| category.id == id)
    }

    pub fn category_by_code(&self, code: &str) -> Option<&Category> {
        self.categories.iter().find(|category| category.code == code)
    }

    pub fn entry(&self, id: Uuid) -> Option<&JournalEntry> {
        self.entries.iter().find(|entry| entry.id == id)
    }

    pub fn entry_mut(&mut self, id: Uuid) -> Option<&mut JournalEntry> {
        self.entries.iter_mut().find(|entry| entry.id == id)
    }

    /// Looks up the entry generated for a raw transaction, if any.
    pub fn entry_by_source(&self, source: &TransactionRef) -> Option<&JournalEntry> {
        self.entries
            .iter()
            .find(|entry| entry.source.as_ref() == Some(source))
    }

    pub fn balance(&self, category_id: Uuid, period: Period) -> Option<&AccountBalance> {
        self.balances
            .iter()
            .find(|row| row.category_id == category_id && row.period == period)
    }

    pub fn balance_mut(&mut self, category_id: Uuid, period: Period) -> Option<&mut AccountBalance> {
        self.balances
            .iter_mut()
            .find(|row| row.category_id == category_id && row.period == period)
    }

    pub fn asset(&self, id: Uuid) -> Option<&FixedAsset> {
        self.assets.iter().find(|asset| asset.id == id)
    }

    pub fn asset_mut(&mut self, id: Uuid) -> Option<&mut FixedAsset> {
        self.assets.iter_mut().find(|asset| asset.id == id)
    }

    /// Uniqueness probe for the `(asset, period)` depreciation constraint.
    pub fn depreciation_for(&self, asset_id: Uuid, period: Period) -> Option<&MonthlyDepreciation> {
        self.depreciation
            .iter()
            .find(|row| row.asset_id == asset_id && row.period == period)
    }

    /// True when any entry line references the category.
    pub fn category_has_postings(&self, category_id: Uuid) -> bool {
        self.entries
            .iter()
            .any(|entry| entry.lines.iter().any(|line| line.category_id == category_id))
    }

    /// Allocates the next entry sequence number for a period.
    pub fn next_sequence(&mut self, period: Period) -> u32 {
        let counter = self.entry_sequences.entry(period).or_insert(0);
        *counter += 1;
        *counter
    }
}
