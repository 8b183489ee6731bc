//! The fixed-asset depreciation scheduler.

use chrono::NaiveDate;
use rust_decimal::{Decimal, RoundingStrategy};
use tracing::{info, warn};
use uuid::Uuid;

use parkbooks_config::Config;
use parkbooks_domain::{
    AssetStatus, Book, FixedAsset, MonthlyDepreciation, Period, RawTransaction, SourceModule,
    TransactionRef, TransactionType,
};

use crate::classifier_service::ClassifierService;
use crate::error::{CoreError, Result};

/// Outcome of one depreciation sweep. The batch is best-effort: per-asset
/// failures are recorded and skipped, never aborting the whole run.
#[derive(Debug, Clone, Default)]
pub struct BatchReport {
    /// Charges recorded across all assets and periods.
    pub charged: usize,
    /// `(asset, period)` pairs skipped because a charge already existed.
    pub skipped: usize,
    pub failures: Vec<BatchFailure>,
}

/// One asset the sweep could not process.
#[derive(Debug, Clone)]
pub struct BatchFailure {
    pub asset_id: Uuid,
    pub reason: String,
}

/// Computes straight-line monthly charges and feeds them through the
/// classifier as depreciation transactions.
pub struct DepreciationService;

impl DepreciationService {
    /// Registers a depreciable asset after validating its figures.
    pub fn register(
        book: &mut Book,
        name: impl Into<String>,
        acquisition_cost: Decimal,
        acquired_on: NaiveDate,
        useful_life_months: u32,
        residual_value: Decimal,
    ) -> Result<Uuid> {
        if acquisition_cost <= Decimal::ZERO {
            return Err(CoreError::Validation(
                "acquisition cost must be positive".into(),
            ));
        }
        if residual_value < Decimal::ZERO {
            return Err(CoreError::Validation(
                "residual value cannot be negative".into(),
            ));
        }
        if residual_value > acquisition_cost {
            return Err(CoreError::Validation(
                "residual value cannot exceed acquisition cost".into(),
            ));
        }
        if useful_life_months == 0 {
            return Err(CoreError::Validation(
                "useful life must be at least one month".into(),
            ));
        }
        let asset = FixedAsset::new(
            name,
            acquisition_cost,
            acquired_on,
            useful_life_months,
            residual_value,
        );
        let id = asset.id;
        book.assets.push(asset);
        book.touch();
        Ok(id)
    }

    /// Marks an asset as disposed; disposed assets leave the sweep.
    pub fn dispose(book: &mut Book, asset_id: Uuid) -> Result<()> {
        let asset = book
            .asset_mut(asset_id)
            .ok_or_else(|| CoreError::NotFound(format!("asset {asset_id}")))?;
        if asset.status == AssetStatus::Disposed {
            return Err(CoreError::InvalidTransition(format!(
                "asset `{}` is already disposed",
                asset.name
            )));
        }
        asset.status = AssetStatus::Disposed;
        book.touch();
        Ok(())
    }

    /// The standard straight-line monthly charge, rounded half-up to two
    /// decimal places. The last month is trued up by the sweep so
    /// accumulated depreciation lands exactly on cost minus residual.
    pub fn monthly_charge(asset: &FixedAsset) -> Result<Decimal> {
        if asset.useful_life_months == 0 {
            return Err(CoreError::Depreciation(format!(
                "asset `{}` has a zero-month useful life",
                asset.name
            )));
        }
        let quotient = asset.depreciable_base() / Decimal::from(asset.useful_life_months);
        Ok(quotient.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero))
    }

    /// Sweeps every asset through `through` inclusive. Safe to re-run: each
    /// `(asset, period)` pair is charged at most once.
    pub fn run(book: &mut Book, config: &Config, through: Period) -> Result<BatchReport> {
        let asset_ids: Vec<Uuid> = book.assets.iter().map(|asset| asset.id).collect();
        let mut report = BatchReport::default();
        for asset_id in asset_ids {
            match Self::sweep_asset(book, config, asset_id, through) {
                Ok((charged, skipped)) => {
                    report.charged += charged;
                    report.skipped += skipped;
                }
                Err(err) => {
                    warn!(%asset_id, error = %err, "skipping asset in depreciation sweep");
                    report.failures.push(BatchFailure {
                        asset_id,
                        reason: err.to_string(),
                    });
                }
            }
        }
        info!(
            charged = report.charged,
            skipped = report.skipped,
            failures = report.failures.len(),
            %through,
            "depreciation sweep finished"
        );
        Ok(report)
    }

    fn sweep_asset(
        book: &mut Book,
        config: &Config,
        asset_id: Uuid,
        through: Period,
    ) -> Result<(usize, usize)> {
        let snapshot = book
            .asset(asset_id)
            .cloned()
            .ok_or_else(|| CoreError::NotFound(format!("asset {asset_id}")))?;
        if snapshot.status != AssetStatus::Active {
            return Ok((0, 0));
        }
        let standard = Self::monthly_charge(&snapshot)?;
        let mut charged = 0;
        let mut skipped = 0;

        for period in snapshot.first_depreciation_period().through(through) {
            if book.depreciation_for(asset_id, period).is_some() {
                skipped += 1;
                continue;
            }
            let asset = book
                .asset(asset_id)
                .ok_or_else(|| CoreError::NotFound(format!("asset {asset_id}")))?;
            if asset.status != AssetStatus::Active {
                break;
            }
            let remaining = asset.remaining_depreciable();
            if remaining < Decimal::ZERO {
                return Err(CoreError::Depreciation(format!(
                    "asset `{}` net book value {} is below residual {}",
                    asset.name,
                    asset.net_book_value(),
                    asset.residual_value
                )));
            }
            if remaining.is_zero() {
                Self::mark_fully_depreciated(book, asset_id)?;
                break;
            }
            // true-up: the final life month absorbs the rounding remainder,
            // and no charge ever passes the depreciable base
            let months_done = book
                .depreciation
                .iter()
                .filter(|row| row.asset_id == asset_id)
                .count() as u32;
            let charge = if months_done + 1 >= asset.useful_life_months {
                remaining
            } else {
                standard.min(remaining)
            };
            let description = format!("Depreciacion {} {}", asset.name, period);
            let date = NaiveDate::from_ymd_opt(period.year, period.month, 1).ok_or_else(|| {
                CoreError::Depreciation(format!("period {period} has no first day"))
            })?;

            let txn = RawTransaction::new(
                charge,
                date,
                TransactionType::Depreciation,
                TransactionRef::new(SourceModule::Assets, format!("{asset_id}:{period}")),
                description,
            );
            let entry_id = ClassifierService::submit(book, config, txn)?;
            book.depreciation.push(MonthlyDepreciation {
                asset_id,
                period,
                amount: charge,
                entry_id,
            });
            let asset = book
                .asset_mut(asset_id)
                .ok_or_else(|| CoreError::NotFound(format!("asset {asset_id}")))?;
            asset.accumulated_depreciation += charge;
            if asset.remaining_depreciable().is_zero() {
                asset.status = AssetStatus::FullyDepreciated;
            }
            charged += 1;
        }
        book.touch();
        Ok((charged, skipped))
    }

    fn mark_fully_depreciated(book: &mut Book, asset_id: Uuid) -> Result<()> {
        let asset = book
            .asset_mut(asset_id)
            .ok_or_else(|| CoreError::NotFound(format!("asset {asset_id}")))?;
        asset.status = AssetStatus::FullyDepreciated;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    use crate::category_service::CategoryService;

    fn seeded() -> (Book, Config) {
        let mut book = Book::new("Assets");
        CategoryService::seed(&mut book).unwrap();
        (book, Config::default())
    }

    fn acquired() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 1, 20).unwrap()
    }

    #[test]
    fn register_validates_figures() {
        let (mut book, _) = seeded();
        assert!(matches!(
            DepreciationService::register(&mut book, "Free", dec!(0), acquired(), 12, dec!(0)),
            Err(CoreError::Validation(_))
        ));
        assert!(matches!(
            DepreciationService::register(&mut book, "Bad", dec!(100), acquired(), 0, dec!(0)),
            Err(CoreError::Validation(_))
        ));
        assert!(matches!(
            DepreciationService::register(&mut book, "Worse", dec!(100), acquired(), 12, dec!(150)),
            Err(CoreError::Validation(_))
        ));
    }

    #[test]
    fn even_division_charges_exactly() {
        let (mut book, config) = seeded();
        let asset_id = DepreciationService::register(
            &mut book,
            "Tractor",
            dec!(12000),
            acquired(),
            12,
            dec!(0),
        )
        .unwrap();

        // first three elapsed months
        let report =
            DepreciationService::run(&mut book, &config, Period::new(2024, 4).unwrap()).unwrap();
        assert_eq!(report.charged, 3);
        assert!(report.failures.is_empty());
        let asset = book.asset(asset_id).unwrap();
        assert_eq!(asset.accumulated_depreciation, dec!(3000));
        assert_eq!(asset.net_book_value(), dec!(9000));
        assert_eq!(book.depreciation.len(), 3);
    }

    #[test]
    fn rerun_is_idempotent() {
        let (mut book, config) = seeded();
        DepreciationService::register(&mut book, "Kiosk", dec!(6000), acquired(), 12, dec!(0))
            .unwrap();
        let through = Period::new(2024, 3).unwrap();
        let first = DepreciationService::run(&mut book, &config, through).unwrap();
        assert_eq!(first.charged, 2);
        let second = DepreciationService::run(&mut book, &config, through).unwrap();
        assert_eq!(second.charged, 0);
        assert_eq!(second.skipped, 2);
        assert_eq!(book.depreciation.len(), 2);
    }

    #[test]
    fn full_life_caps_and_flips_status() {
        let (mut book, config) = seeded();
        let asset_id = DepreciationService::register(
            &mut book,
            "Fountain pump",
            dec!(12000),
            acquired(),
            12,
            dec!(0),
        )
        .unwrap();
        // sweep well past the useful life
        let report =
            DepreciationService::run(&mut book, &config, Period::new(2025, 6).unwrap()).unwrap();
        assert_eq!(report.charged, 12);
        let asset = book.asset(asset_id).unwrap();
        assert_eq!(asset.accumulated_depreciation, dec!(12000));
        assert_eq!(asset.status, AssetStatus::FullyDepreciated);

        // a thirteenth run produces nothing new
        let rerun =
            DepreciationService::run(&mut book, &config, Period::new(2025, 7).unwrap()).unwrap();
        assert_eq!(rerun.charged, 0);
        assert_eq!(book.depreciation.len(), 12);
    }

    #[test]
    fn uneven_division_trues_up_final_month() {
        let (mut book, config) = seeded();
        let asset_id = DepreciationService::register(
            &mut book,
            "Playground set",
            dec!(10000),
            acquired(),
            12,
            dec!(0),
        )
        .unwrap();
        DepreciationService::run(&mut book, &config, Period::new(2025, 12).unwrap()).unwrap();
        let asset = book.asset(asset_id).unwrap();
        // 10000 / 12 = 833.33 monthly; the final month carries the remainder
        assert_eq!(asset.accumulated_depreciation, dec!(10000));
        assert_eq!(asset.status, AssetStatus::FullyDepreciated);
        let last = book.depreciation.last().unwrap();
        assert_eq!(last.amount, dec!(833.37));
        assert_eq!(book.depreciation.len(), 12);
    }

    #[test]
    fn residual_value_floors_depreciation() {
        let (mut book, config) = seeded();
        let asset_id = DepreciationService::register(
            &mut book,
            "Truck",
            dec!(15000),
            acquired(),
            12,
            dec!(3000),
        )
        .unwrap();
        DepreciationService::run(&mut book, &config, Period::new(2025, 12).unwrap()).unwrap();
        let asset = book.asset(asset_id).unwrap();
        assert_eq!(asset.accumulated_depreciation, dec!(12000));
        assert_eq!(asset.net_book_value(), dec!(3000));
    }

    #[test]
    fn disposed_assets_are_skipped() {
        let (mut book, config) = seeded();
        let asset_id =
            DepreciationService::register(&mut book, "Bench", dec!(1200), acquired(), 12, dec!(0))
                .unwrap();
        DepreciationService::dispose(&mut book, asset_id).unwrap();
        let report =
            DepreciationService::run(&mut book, &config, Period::new(2024, 6).unwrap()).unwrap();
        assert_eq!(report.charged, 0);
        assert!(book.depreciation.is_empty());
    }

    #[test]
    fn anomalous_asset_fails_alone_and_batch_continues() {
        let (mut book, config) = seeded();
        let broken = DepreciationService::register(
            &mut book,
            "Broken rows",
            dec!(1000),
            acquired(),
            10,
            dec!(0),
        )
        .unwrap();
        // simulate an imported anomaly: accumulated past the base
        book.asset_mut(broken).unwrap().accumulated_depreciation = dec!(2000);
        DepreciationService::register(&mut book, "Healthy", dec!(1200), acquired(), 12, dec!(0))
            .unwrap();

        let report =
            DepreciationService::run(&mut book, &config, Period::new(2024, 3).unwrap()).unwrap();
        assert_eq!(report.failures.len(), 1);
        assert_eq!(report.failures[0].asset_id, broken);
        // the healthy asset still got its two charges
        assert_eq!(report.charged, 2);
    }
}
