//! The balance ledger: per-category, per-period running balances.

use rust_decimal::Decimal;
use uuid::Uuid;

use parkbooks_domain::{AccountBalance, Book, Period};

use crate::category_service::CategoryService;
use crate::error::{CoreError, Result};

/// The only component allowed to mutate [`AccountBalance`] rows.
pub struct BalanceService;

impl BalanceService {
    /// Applies posting deltas to the `(category, period)` row, creating it
    /// lazily with the prior period's ending carried forward as beginning.
    ///
    /// Callers hold `&mut Book`, so two postings to the same row cannot
    /// interleave.
    pub fn apply_posting(
        book: &mut Book,
        category_id: Uuid,
        period: Period,
        debit: Decimal,
        credit: Decimal,
    ) -> Result<()> {
        let nature = book
            .category(category_id)
            .map(|category| category.nature)
            .ok_or_else(|| CoreError::NotFound(format!("category {category_id}")))?;

        if book.balance(category_id, period).is_none() {
            let beginning = Self::carried_forward(book, category_id, period);
            book.balances
                .push(AccountBalance::opening(category_id, period, beginning));
        }
        let row = book
            .balance_mut(category_id, period)
            .ok_or_else(|| CoreError::Storage(format!("balance row {category_id}/{period}")))?;
        row.apply(nature, debit, credit);
        book.touch();
        Ok(())
    }

    /// Returns the period balance, zeroed when the category saw no activity.
    pub fn balance(book: &Book, category_id: Uuid, period: Period) -> AccountBalance {
        book.balance(category_id, period)
            .cloned()
            .unwrap_or_else(|| AccountBalance::zeroed(category_id, period))
    }

    /// Aggregates the category and all descendants for a period, normalizing
    /// every row into the rollup root's nature before summing.
    pub fn rollup(book: &Book, code: &str, period: Period) -> Result<AccountBalance> {
        let root = CategoryService::resolve(book, code)?;
        let mut aggregate = AccountBalance::zeroed(root.id, period);
        for category in CategoryService::subtree(book, code)? {
            let row = Self::balance(book, category.id, period);
            aggregate.debit_total += row.debit_total;
            aggregate.credit_total += row.credit_total;
            let (beginning, ending) = if category.nature == root.nature {
                (row.beginning, row.ending)
            } else {
                (-row.beginning, -row.ending)
            };
            aggregate.beginning += beginning;
            aggregate.ending += ending;
        }
        Ok(aggregate)
    }

    /// Most recent ending balance strictly before `period`, if any.
    fn carried_forward(book: &Book, category_id: Uuid, period: Period) -> Decimal {
        book.balances
            .iter()
            .filter(|row| row.category_id == category_id && row.period < period)
            .max_by_key(|row| row.period)
            .map(|row| row.ending)
            .unwrap_or(Decimal::ZERO)
    }
}
