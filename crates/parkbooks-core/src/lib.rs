//! parkbooks-core
//!
//! Services and invariants for the parks accounting engine: the category
//! tree store, balance ledger, journal engine, transaction classifier, and
//! depreciation scheduler. Depends on parkbooks-domain. No CLI, no terminal
//! I/O, no direct storage interactions beyond the [`storage::BookStorage`]
//! trait.

pub mod balance_service;
pub mod category_service;
pub mod classifier_service;
pub mod depreciation_service;
pub mod error;
pub mod journal_service;
pub mod storage;

pub use balance_service::BalanceService;
pub use category_service::{CategoryService, NewCategory};
pub use classifier_service::ClassifierService;
pub use depreciation_service::{BatchReport, DepreciationService};
pub use error::{CoreError, Result};
pub use journal_service::{JournalService, LineInput};

use std::sync::Once;

static INIT_TRACING: Once = Once::new();

/// Initializes the global tracing subscriber with sensible defaults.
pub fn init() {
    INIT_TRACING.call_once(|| {
        use tracing_subscriber::{fmt, EnvFilter};

        let filter =
            EnvFilter::from_default_env().add_directive("parkbooks_core=info".parse().unwrap());

        fmt().with_env_filter(filter).init();
        tracing::info!("parkbooks tracing initialized");
    });
}

#[cfg(test)]
mod tests {
    #[test]
    fn init_does_not_panic() {
        super::init();
        super::init();
    }
}
