//! parkbooks-config
//!
//! Serde configuration model for the accounting engine (entry numbering,
//! classifier mapping table) plus filesystem persistence with atomic saves.

pub mod error;
pub mod manager;
pub mod model;

pub use error::ConfigError;
pub use manager::ConfigManager;
pub use model::{ClassifierRule, Config};
