//! In-memory aggregate of every budget and expense, shared by store backends.

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::{
    budget::{BudgetState, UserId},
    expense::{sort_newest_first, total_amount, Expense},
};

pub const CURRENT_SCHEMA_VERSION: u8 = 1;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Ledger {
    #[serde(default = "Ledger::default_schema_version")]
    pub schema_version: u8,
    #[serde(default)]
    pub budgets: Vec<BudgetState>,
    #[serde(default)]
    pub expenses: Vec<Expense>,
}

impl Default for Ledger {
    fn default() -> Self {
        Self::new()
    }
}

impl Ledger {
    pub fn new() -> Self {
        Self {
            schema_version: CURRENT_SCHEMA_VERSION,
            budgets: Vec::new(),
            expenses: Vec::new(),
        }
    }

    fn default_schema_version() -> u8 {
        CURRENT_SCHEMA_VERSION
    }

    pub fn budget(&self, user: UserId) -> Option<&BudgetState> {
        self.budgets.iter().find(|budget| budget.user_id == user)
    }

    pub fn budget_mut(&mut self, user: UserId) -> Option<&mut BudgetState> {
        self.budgets.iter_mut().find(|budget| budget.user_id == user)
    }

    /// Creates or overwrites the declared figures for `user`.
    pub fn upsert_budget(
        &mut self,
        user: UserId,
        target_daily_rate: Decimal,
        segment_total: Decimal,
        at: DateTime<Utc>,
    ) -> &BudgetState {
        let position = match self.budgets.iter().position(|b| b.user_id == user) {
            Some(index) => {
                self.budgets[index].redeclare(target_daily_rate, segment_total, at);
                index
            }
            None => {
                self.budgets
                    .push(BudgetState::new(user, target_daily_rate, segment_total, at));
                self.budgets.len() - 1
            }
        };
        &self.budgets[position]
    }

    /// Users that currently have a budget, in ascending id order.
    pub fn budget_users(&self) -> Vec<UserId> {
        let mut users: Vec<UserId> = self.budgets.iter().map(|b| b.user_id).collect();
        users.sort();
        users.dedup();
        users
    }

    pub fn add_expense(&mut self, expense: Expense) {
        self.expenses.push(expense);
    }

    /// `None` when the total exceeds the `Decimal` range.
    pub fn total_spent(&self, user: UserId, start: NaiveDate, end: NaiveDate) -> Option<Decimal> {
        total_amount(
            self.expenses
                .iter()
                .filter(|expense| expense.matches(user, start, end)),
        )
    }

    /// Expenses in `[start, end]`, newest first.
    pub fn expenses_between(&self, user: UserId, start: NaiveDate, end: NaiveDate) -> Vec<Expense> {
        let mut rows: Vec<Expense> = self
            .expenses
            .iter()
            .filter(|expense| expense.matches(user, start, end))
            .cloned()
            .collect();
        sort_newest_first(&mut rows);
        rows
    }
}
