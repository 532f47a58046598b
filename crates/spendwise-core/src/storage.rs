use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use spendwise_domain::{BudgetState, Expense, Ledger, UserId};

use crate::CoreError;

/// Abstraction over the durable record of budgets and expenses.
///
/// Every read reflects all writes committed before it began. Implementations
/// surface their own failures (timeouts, I/O) as [`CoreError`].
pub trait LedgerStore: Send + Sync {
    /// Sum of expense amounts in `[start, end_inclusive]`; zero when nothing matches.
    fn total_spent(
        &self,
        user: UserId,
        start: NaiveDate,
        end_inclusive: NaiveDate,
    ) -> Result<Decimal, CoreError>;

    fn get_budget(&self, user: UserId) -> Result<Option<BudgetState>, CoreError>;

    /// Full upsert of the declared figures. A stored adjustment is left untouched.
    fn set_budget(
        &self,
        user: UserId,
        target_daily_rate: Decimal,
        segment_total: Decimal,
        updated_at: DateTime<Utc>,
    ) -> Result<BudgetState, CoreError>;

    /// Pins `rate` to `date` for `user`. Does not change `last_updated`.
    fn update_adjusted_daily(
        &self,
        user: UserId,
        rate: Decimal,
        date: NaiveDate,
    ) -> Result<(), CoreError>;

    /// Every user that currently has a budget.
    fn budget_users(&self) -> Result<Vec<UserId>, CoreError>;

    fn add_expense(&self, expense: &Expense) -> Result<(), CoreError>;

    /// Expenses in `[start, end_inclusive]`, newest first.
    fn expenses_between(
        &self,
        user: UserId,
        start: NaiveDate,
        end_inclusive: NaiveDate,
    ) -> Result<Vec<Expense>, CoreError>;
}

/// Process-local store, used by tests and by embedders that persist elsewhere.
#[derive(Debug, Default)]
pub struct MemoryLedgerStore {
    ledger: RwLock<Ledger>,
}

impl MemoryLedgerStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_ledger(ledger: Ledger) -> Self {
        Self {
            ledger: RwLock::new(ledger),
        }
    }

    /// Copy of the current contents.
    pub fn snapshot(&self) -> Result<Ledger, CoreError> {
        Ok(self.read()?.clone())
    }

    fn read(&self) -> Result<RwLockReadGuard<'_, Ledger>, CoreError> {
        self.ledger
            .read()
            .map_err(|_| CoreError::Storage("ledger lock poisoned".into()))
    }

    fn write(&self) -> Result<RwLockWriteGuard<'_, Ledger>, CoreError> {
        self.ledger
            .write()
            .map_err(|_| CoreError::Storage("ledger lock poisoned".into()))
    }
}

impl LedgerStore for MemoryLedgerStore {
    fn total_spent(
        &self,
        user: UserId,
        start: NaiveDate,
        end_inclusive: NaiveDate,
    ) -> Result<Decimal, CoreError> {
        self.read()?
            .total_spent(user, start, end_inclusive)
            .ok_or_else(|| CoreError::total_overflow(user))
    }

    fn get_budget(&self, user: UserId) -> Result<Option<BudgetState>, CoreError> {
        Ok(self.read()?.budget(user).cloned())
    }

    fn set_budget(
        &self,
        user: UserId,
        target_daily_rate: Decimal,
        segment_total: Decimal,
        updated_at: DateTime<Utc>,
    ) -> Result<BudgetState, CoreError> {
        let mut ledger = self.write()?;
        Ok(ledger
            .upsert_budget(user, target_daily_rate, segment_total, updated_at)
            .clone())
    }

    fn update_adjusted_daily(
        &self,
        user: UserId,
        rate: Decimal,
        date: NaiveDate,
    ) -> Result<(), CoreError> {
        let mut ledger = self.write()?;
        let budget = ledger
            .budget_mut(user)
            .ok_or(CoreError::NotConfigured(user))?;
        budget.apply_adjustment(rate, date);
        Ok(())
    }

    fn budget_users(&self) -> Result<Vec<UserId>, CoreError> {
        Ok(self.read()?.budget_users())
    }

    fn add_expense(&self, expense: &Expense) -> Result<(), CoreError> {
        self.write()?.add_expense(expense.clone());
        Ok(())
    }

    fn expenses_between(
        &self,
        user: UserId,
        start: NaiveDate,
        end_inclusive: NaiveDate,
    ) -> Result<Vec<Expense>, CoreError> {
        Ok(self.read()?.expenses_between(user, start, end_inclusive))
    }
}
