//! spendwise-config
//!
//! Runtime settings for the Spendwise engine: timezone, rebalance time, data
//! directory and display thresholds. Owns the Config model plus disk persistence.

pub mod error;
pub mod manager;
pub mod model;

pub use error::ConfigError;
pub use manager::ConfigManager;
pub use model::Config;
