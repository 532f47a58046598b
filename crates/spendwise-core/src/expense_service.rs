//! Logging and listing expenses.

use chrono::{Duration, NaiveDate};
use rust_decimal::Decimal;
use spendwise_domain::{Expense, UserId};
use tracing::debug;

use crate::{
    storage::LedgerStore,
    time::Clock,
    validation::{ensure_valid_amount, parse_amount},
    CoreError,
};

/// Look-back window used when listing recent expenses.
pub const DEFAULT_RECENT_DAYS: u32 = 7;

pub struct ExpenseService;

impl ExpenseService {
    /// Records an expense dated `clock.today()` and returns the stored entry.
    pub fn record(
        store: &dyn LedgerStore,
        clock: &dyn Clock,
        user: UserId,
        amount: Decimal,
        description: impl Into<String>,
    ) -> Result<Expense, CoreError> {
        let amount = ensure_valid_amount(amount, &amount.to_string())?;
        let expense = Expense::new(user, amount, clock.today(), description, clock.now());
        store.add_expense(&expense)?;
        debug!(user_id = %user, amount = %amount, date = %expense.date, "expense recorded");
        Ok(expense)
    }

    /// Parses `raw_amount` first; invalid text is rejected with the input preserved.
    pub fn record_text(
        store: &dyn LedgerStore,
        clock: &dyn Clock,
        user: UserId,
        raw_amount: &str,
        description: impl Into<String>,
    ) -> Result<Expense, CoreError> {
        let amount = parse_amount(raw_amount)?;
        Self::record(store, clock, user, amount, description)
    }

    /// Expenses from `days` days before `today` up to `today`, newest first.
    pub fn recent(
        store: &dyn LedgerStore,
        user: UserId,
        today: NaiveDate,
        days: u32,
    ) -> Result<Vec<Expense>, CoreError> {
        let start = today - Duration::days(i64::from(days));
        store.expenses_between(user, start, today)
    }
}
