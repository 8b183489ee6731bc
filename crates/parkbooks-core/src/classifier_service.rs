//! The transaction classifier: raw upstream events into balanced entries.

use rust_decimal::Decimal;
use tracing::info;
use uuid::Uuid;

use parkbooks_config::Config;
use parkbooks_domain::{Book, RawTransaction, TransactionType};

use crate::category_service::CategoryService;
use crate::error::{CoreError, Result};
use crate::journal_service::{JournalService, LineInput};

/// Maps raw financial events to categories and posts the resulting
/// two-line journal entry.
pub struct ClassifierService;

impl ClassifierService {
    /// Classifies and posts a raw transaction, returning the entry id.
    ///
    /// Idempotent per source ref: resubmitting the same `(module, source_id)`
    /// returns the existing entry instead of creating a duplicate. Unmapped
    /// `(module, kind)` pairs are an error, never a silent default.
    pub fn submit(book: &mut Book, config: &Config, txn: RawTransaction) -> Result<Uuid> {
        if let Some(existing) = book.entry_by_source(&txn.source) {
            return Ok(existing.id);
        }
        if txn.amount <= Decimal::ZERO {
            return Err(CoreError::Validation(format!(
                "transaction amount must be positive, got {}",
                txn.amount
            )));
        }
        let rule = config
            .rule(txn.source.module, txn.kind)
            .ok_or(CoreError::UnmappedTransaction {
                module: txn.source.module,
                kind: txn.kind,
            })?;
        let category = CategoryService::resolve_for_posting(book, &rule.category)?.id;
        let counter = CategoryService::resolve_for_posting(book, &rule.counter_category)?.id;

        // fixed mirroring policy: income credits the resolved category and
        // debits the cash/receivable side; everything else debits the
        // resolved category (expense, depreciation, transfer destination)
        let lines = match txn.kind {
            TransactionType::Income => vec![
                LineInput::debit(counter, txn.amount),
                LineInput::credit(category, txn.amount),
            ],
            TransactionType::Expense
            | TransactionType::Depreciation
            | TransactionType::Transfer => vec![
                LineInput::debit(category, txn.amount),
                LineInput::credit(counter, txn.amount),
            ],
        };

        let entry_id = JournalService::create_draft(
            book,
            config,
            txn.date,
            txn.description.clone(),
            lines,
            None,
        )?;
        if let Some(entry) = book.entry_mut(entry_id) {
            entry.source = Some(txn.source.clone());
        }
        JournalService::post(book, entry_id)?;
        info!(source = %txn.source, kind = %txn.kind, amount = %txn.amount, "classified transaction");
        Ok(entry_id)
    }
}
