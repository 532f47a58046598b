//! spendwise-domain
//!
//! Pure domain models (segments, budget state, expenses, ledger, summaries).
//! No I/O, no storage, no clock. Only data types and calendar arithmetic.

pub mod budget;
pub mod expense;
pub mod ledger;
pub mod segment;
pub mod summary;

pub use budget::*;
pub use expense::*;
pub use ledger::*;
pub use segment::*;
pub use summary::*;
