//! Shared traits, the calendar-month `Period` bucket, and core enums.

use std::fmt;
use std::str::FromStr;

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Exposes a stable identifier for entities stored in a book.
pub trait Identifiable {
    fn id(&self) -> Uuid;
}

/// Converts an entity into a user-facing display label.
pub trait Displayable {
    fn display_label(&self) -> String;
}

/// Which side of an entry increases a category's balance.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum AccountNature {
    DebitNormal,
    CreditNormal,
}

impl fmt::Display for AccountNature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            AccountNature::DebitNormal => "Debit-normal",
            AccountNature::CreditNormal => "Credit-normal",
        };
        f.write_str(label)
    }
}

/// A calendar-month bucket (`"YYYY-MM"`), the granularity for balances and
/// entry numbering.
#[derive(
    Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash,
)]
#[serde(try_from = "String", into = "String")]
pub struct Period {
    pub year: i32,
    pub month: u32,
}

impl Period {
    pub fn new(year: i32, month: u32) -> Result<Self, PeriodError> {
        if !(1..=12).contains(&month) {
            return Err(PeriodError::MonthOutOfRange(month));
        }
        Ok(Self { year, month })
    }

    /// Buckets a date into its containing period.
    pub fn from_date(date: NaiveDate) -> Self {
        Self {
            year: date.year(),
            month: date.month(),
        }
    }

    pub fn next(self) -> Self {
        if self.month == 12 {
            Self {
                year: self.year + 1,
                month: 1,
            }
        } else {
            Self {
                year: self.year,
                month: self.month + 1,
            }
        }
    }

    pub fn previous(self) -> Self {
        if self.month == 1 {
            Self {
                year: self.year - 1,
                month: 12,
            }
        } else {
            Self {
                year: self.year,
                month: self.month - 1,
            }
        }
    }

    /// Iterates every period from `self` through `end` inclusive.
    pub fn through(self, end: Period) -> impl Iterator<Item = Period> {
        let mut current = self;
        let mut done = self > end;
        std::iter::from_fn(move || {
            if done {
                return None;
            }
            let out = current;
            if current == end {
                done = true;
            } else {
                current = current.next();
            }
            Some(out)
        })
    }
}

impl fmt::Display for Period {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}", self.year, self.month)
    }
}

impl FromStr for Period {
    type Err = PeriodError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let (year, month) = value
            .split_once('-')
            .ok_or_else(|| PeriodError::Malformed(value.to_string()))?;
        let year = year
            .parse::<i32>()
            .map_err(|_| PeriodError::Malformed(value.to_string()))?;
        let month = month
            .parse::<u32>()
            .map_err(|_| PeriodError::Malformed(value.to_string()))?;
        Period::new(year, month)
    }
}

impl TryFrom<String> for Period {
    type Error = PeriodError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Period> for String {
    fn from(period: Period) -> Self {
        period.to_string()
    }
}

/// Errors that can occur when constructing [`Period`] values.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PeriodError {
    Malformed(String),
    MonthOutOfRange(u32),
}

impl fmt::Display for PeriodError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PeriodError::Malformed(value) => write!(f, "malformed period `{value}`"),
            PeriodError::MonthOutOfRange(month) => {
                write!(f, "month {month} outside 1..=12")
            }
        }
    }
}

impl std::error::Error for PeriodError {}
