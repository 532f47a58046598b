//! spendwise-core
//!
//! Budget engine services for Spendwise: allowance calculation, segment reset
//! detection and the daily rebalance. Depends on spendwise-domain. No terminal
//! I/O and no concrete persistence; stores and notifiers are injected.

pub mod allowance_service;
pub mod budget_service;
pub mod error;
pub mod expense_service;
pub mod notifier;
pub mod rebalance_service;
pub mod reset_service;
pub mod storage;
pub mod time;
pub mod validation;

pub use allowance_service::*;
pub use budget_service::*;
pub use error::CoreError;
pub use expense_service::*;
pub use notifier::Notifier;
pub use rebalance_service::*;
pub use reset_service::*;
pub use storage::{LedgerStore, MemoryLedgerStore};
pub use time::{Clock, FixedClock};
