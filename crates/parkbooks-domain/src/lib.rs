//! parkbooks-domain
//!
//! Pure domain models for the parks accounting engine (Category, JournalEntry,
//! AccountBalance, FixedAsset, etc.). No I/O, no services, no storage.
//! Only data types, core enums, and the `Book` aggregate.

pub mod asset;
pub mod balance;
pub mod book;
pub mod category;
pub mod common;
pub mod journal;
pub mod transaction;

pub use asset::*;
pub use balance::*;
pub use book::*;
pub use category::*;
pub use common::*;
pub use journal::*;
pub use transaction::*;
