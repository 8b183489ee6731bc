//! Per-category, per-period balance aggregates.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::common::{AccountNature, Period};

/// Materialized running balance for one category in one period.
///
/// `ending` always satisfies the nature-dependent formula: debit-normal
/// categories grow with debits, credit-normal with credits.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AccountBalance {
    pub category_id: Uuid,
    pub period: Period,
    pub beginning: Decimal,
    pub debit_total: Decimal,
    pub credit_total: Decimal,
    pub ending: Decimal,
}

impl AccountBalance {
    /// A zeroed row; a category with no activity in a period is valid and
    /// reports zero rather than erroring.
    pub fn zeroed(category_id: Uuid, period: Period) -> Self {
        Self {
            category_id,
            period,
            beginning: Decimal::ZERO,
            debit_total: Decimal::ZERO,
            credit_total: Decimal::ZERO,
            ending: Decimal::ZERO,
        }
    }

    /// Opens a period carrying forward the prior period's ending balance.
    pub fn opening(category_id: Uuid, period: Period, beginning: Decimal) -> Self {
        Self {
            beginning,
            ending: beginning,
            ..Self::zeroed(category_id, period)
        }
    }

    /// Adds posting deltas and recomputes `ending` for the given nature.
    pub fn apply(&mut self, nature: AccountNature, debit: Decimal, credit: Decimal) {
        self.debit_total += debit;
        self.credit_total += credit;
        self.ending = match nature {
            AccountNature::DebitNormal => self.beginning + self.debit_total - self.credit_total,
            AccountNature::CreditNormal => self.beginning - self.debit_total + self.credit_total,
        };
    }
}
