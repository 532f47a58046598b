//! Per-user budget declarations and the daily adjustment pinned to them.

use std::fmt;

use chrono::{DateTime, FixedOffset, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Opaque identifier of the person a budget belongs to.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(transparent)]
pub struct UserId(pub i64);

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<i64> for UserId {
    fn from(value: i64) -> Self {
        UserId(value)
    }
}

/// A recomputed daily rate that only applies on `date`.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct DailyAdjustment {
    pub rate: Decimal,
    pub date: NaiveDate,
}

/// The active budget for one user.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct BudgetState {
    pub user_id: UserId,
    pub target_daily_rate: Decimal,
    pub segment_total: Decimal,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub adjustment: Option<DailyAdjustment>,
    pub last_updated: DateTime<Utc>,
}

impl BudgetState {
    pub fn new(
        user_id: UserId,
        target_daily_rate: Decimal,
        segment_total: Decimal,
        last_updated: DateTime<Utc>,
    ) -> Self {
        Self {
            user_id,
            target_daily_rate,
            segment_total,
            adjustment: None,
            last_updated,
        }
    }

    /// Replaces the declared figures. Any stored adjustment is kept.
    pub fn redeclare(
        &mut self,
        target_daily_rate: Decimal,
        segment_total: Decimal,
        at: DateTime<Utc>,
    ) {
        self.target_daily_rate = target_daily_rate;
        self.segment_total = segment_total;
        self.last_updated = at;
    }

    /// Pins `rate` to `date`, overwriting any earlier adjustment.
    pub fn apply_adjustment(&mut self, rate: Decimal, date: NaiveDate) {
        self.adjustment = Some(DailyAdjustment { rate, date });
    }

    pub fn clear_adjustment(&mut self) {
        self.adjustment = None;
    }

    pub fn adjusted_daily_rate(&self) -> Option<Decimal> {
        self.adjustment.map(|adj| adj.rate)
    }

    pub fn adjusted_date(&self) -> Option<NaiveDate> {
        self.adjustment.map(|adj| adj.date)
    }

    /// Adjusted rate for `today`, ignoring stale adjustments.
    pub fn adjustment_for(&self, today: NaiveDate) -> Option<Decimal> {
        self.adjustment
            .filter(|adj| adj.date == today)
            .map(|adj| adj.rate)
    }

    /// Daily allowance in force on `today`.
    pub fn effective_daily_rate(&self, today: NaiveDate) -> Decimal {
        self.adjustment_for(today).unwrap_or(self.target_daily_rate)
    }

    /// Calendar date of the last declaration as seen from `offset`.
    pub fn last_updated_date(&self, offset: &FixedOffset) -> NaiveDate {
        self.last_updated.with_timezone(offset).date_naive()
    }
}
