//! Append-only expense entries.

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::budget::UserId;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Expense {
    pub id: Uuid,
    pub user_id: UserId,
    pub amount: Decimal,
    pub date: NaiveDate,
    #[serde(default)]
    pub description: String,
    pub created_at: DateTime<Utc>,
}

impl Expense {
    pub fn new(
        user_id: UserId,
        amount: Decimal,
        date: NaiveDate,
        description: impl Into<String>,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            user_id,
            amount,
            date,
            description: description.into(),
            created_at,
        }
    }

    /// Returns `true` when the expense belongs to `user` and falls in `[start, end]`.
    pub fn matches(&self, user: UserId, start: NaiveDate, end: NaiveDate) -> bool {
        self.user_id == user && self.date >= start && self.date <= end
    }
}

/// Sums the amounts of the supplied expenses; zero for an empty input and
/// `None` when the sum exceeds the `Decimal` range.
pub fn total_amount<'a, I>(expenses: I) -> Option<Decimal>
where
    I: IntoIterator<Item = &'a Expense>,
{
    expenses
        .into_iter()
        .try_fold(Decimal::ZERO, |total, expense| total.checked_add(expense.amount))
}

/// Orders expenses newest first: by date, then by creation time.
pub fn sort_newest_first(expenses: &mut [Expense]) {
    expenses.sort_by(|a, b| {
        b.date
            .cmp(&a.date)
            .then_with(|| b.created_at.cmp(&a.created_at))
    });
}
