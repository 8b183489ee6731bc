//! Domain types for depreciable fixed assets.

use std::fmt;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::common::*;

/// Supported depreciation methods.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
pub enum DepreciationMethod {
    #[default]
    StraightLine,
}

/// Lifecycle state of a fixed asset.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum AssetStatus {
    Active,
    Disposed,
    FullyDepreciated,
}

impl fmt::Display for AssetStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            AssetStatus::Active => "Active",
            AssetStatus::Disposed => "Disposed",
            AssetStatus::FullyDepreciated => "Fully depreciated",
        };
        f.write_str(label)
    }
}

/// A depreciable resource tracked by the parks inventory.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct FixedAsset {
    pub id: Uuid,
    pub name: String,
    pub acquisition_cost: Decimal,
    pub acquired_on: NaiveDate,
    pub useful_life_months: u32,
    pub residual_value: Decimal,
    #[serde(default)]
    pub method: DepreciationMethod,
    pub accumulated_depreciation: Decimal,
    pub status: AssetStatus,
}

impl FixedAsset {
    pub fn new(
        name: impl Into<String>,
        acquisition_cost: Decimal,
        acquired_on: NaiveDate,
        useful_life_months: u32,
        residual_value: Decimal,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            acquisition_cost,
            acquired_on,
            useful_life_months,
            residual_value,
            method: DepreciationMethod::StraightLine,
            accumulated_depreciation: Decimal::ZERO,
            status: AssetStatus::Active,
        }
    }

    /// Always `acquisition_cost - accumulated_depreciation`.
    pub fn net_book_value(&self) -> Decimal {
        self.acquisition_cost - self.accumulated_depreciation
    }

    /// The total amount the asset can ever depreciate.
    pub fn depreciable_base(&self) -> Decimal {
        self.acquisition_cost - self.residual_value
    }

    /// Remaining depreciable amount before hitting the residual floor.
    pub fn remaining_depreciable(&self) -> Decimal {
        self.depreciable_base() - self.accumulated_depreciation
    }

    /// First period eligible for a charge: the month after acquisition.
    pub fn first_depreciation_period(&self) -> Period {
        Period::from_date(self.acquired_on).next()
    }
}

impl Identifiable for FixedAsset {
    fn id(&self) -> Uuid {
        self.id
    }
}

impl Displayable for FixedAsset {
    fn display_label(&self) -> String {
        format!("{} ({})", self.name, self.status)
    }
}

/// One computed depreciation charge for one asset in one period; unique per
/// `(asset_id, period)` and linked to the journal entry it generated.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MonthlyDepreciation {
    pub asset_id: Uuid,
    pub period: Period,
    pub amount: Decimal,
    pub entry_id: Uuid,
}
