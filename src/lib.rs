#![doc(test(attr(deny(warnings))))]

//! Spendwise splits each month into three fixed segments, tracks a lump budget
//! per segment and re-derives the daily allowance from what is left.

pub mod clock;
pub mod errors;
pub mod manager;
pub mod notifier;
pub mod scheduler;
pub mod utils;

pub use spendwise_config as config;
pub use spendwise_core as engine;
pub use spendwise_domain as domain;
pub use spendwise_storage_json as storage;

pub use clock::SystemClock;
pub use errors::AppError;
pub use manager::{BudgetManager, BudgetOverview};
pub use notifier::LogNotifier;
pub use scheduler::{DailySchedule, Scheduler};

use std::sync::Once;

static INIT_TRACING: Once = Once::new();

/// Initializes global tracing and emits a startup info log.
pub fn init() {
    init_with_filter(None);
}

/// Like [`init`], adding the comma-separated directives in `filter`.
///
/// Only the first of [`init`] and `init_with_filter` takes effect; a filter
/// passed afterwards is reported and ignored.
pub fn init_with_filter(filter: Option<&str>) {
    if INIT_TRACING.is_completed() {
        if let Some(filter) = filter {
            tracing::warn!(filter, "tracing already initialized, ignoring filter");
        }
        return;
    }
    INIT_TRACING.call_once(|| {
        utils::init_tracing(filter);
        tracing::info!("Spendwise tracing initialized.");
    });
}
