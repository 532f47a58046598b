//! Derived, read-only views over a user's budget: daily and segment summaries,
//! and the payload produced by the daily rebalance.

use std::{cmp::Ordering, fmt};

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::{budget::UserId, segment::Segment};

/// Default share of the daily allowance below which the day is "running low".
pub const DEFAULT_LOW_ALLOWANCE_PERCENT: u8 = 20;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
/// Coarse classification of how a day is going.
pub enum DailyStatus {
    WithinBudget,
    RunningLow,
    OverBudget,
}

impl fmt::Display for DailyStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            DailyStatus::WithinBudget => "Within budget",
            DailyStatus::RunningLow => "Running low",
            DailyStatus::OverBudget => "Over budget",
        };
        f.write_str(label)
    }
}

/// Spending position for a single day.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DailySummary {
    pub date: NaiveDate,
    pub effective_daily_budget: Decimal,
    pub spent_today: Decimal,
    /// Negative when the day is over budget.
    pub remaining_today: Decimal,
}

impl DailySummary {
    pub fn from_parts(
        date: NaiveDate,
        effective_daily_budget: Decimal,
        spent_today: Decimal,
    ) -> Self {
        Self {
            date,
            effective_daily_budget,
            spent_today,
            remaining_today: effective_daily_budget.saturating_sub(spent_today),
        }
    }

    pub fn is_over_budget(&self) -> bool {
        self.remaining_today < Decimal::ZERO
    }

    /// Classifies the day; `low_allowance_percent` is the threshold share of the
    /// effective budget under which the day counts as running low.
    pub fn status(&self, low_allowance_percent: u8) -> DailyStatus {
        let threshold = self
            .effective_daily_budget
            .saturating_mul(Decimal::from(low_allowance_percent))
            / Decimal::ONE_HUNDRED;
        if self.is_over_budget() {
            DailyStatus::OverBudget
        } else if self.remaining_today < threshold {
            DailyStatus::RunningLow
        } else {
            DailyStatus::WithinBudget
        }
    }
}

/// Spending position for the segment enclosing a reference date.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SegmentSummary {
    pub segment: Segment,
    pub segment_budget: Decimal,
    pub spent_in_segment: Decimal,
    /// Negative when the segment budget is exhausted.
    pub remaining_in_segment: Decimal,
    /// Remaining budget spread over the days strictly after the reference date.
    pub suggested_daily_for_rest: Decimal,
    pub target_daily: Decimal,
}

impl SegmentSummary {
    pub fn from_parts(
        segment: Segment,
        segment_budget: Decimal,
        spent_in_segment: Decimal,
        target_daily: Decimal,
    ) -> Self {
        let remaining_in_segment = segment_budget.saturating_sub(spent_in_segment);
        Self {
            segment,
            segment_budget,
            spent_in_segment,
            remaining_in_segment,
            suggested_daily_for_rest: per_day(
                remaining_in_segment,
                segment.days_remaining_after_reference(),
            ),
            target_daily,
        }
    }

    /// What the segment would have cost so far at exactly the target rate.
    /// Saturates at the `Decimal` bounds.
    pub fn expected_spent(&self) -> Decimal {
        self.target_daily
            .saturating_mul(Decimal::from(self.segment.days_elapsed_inclusive))
    }

    /// Positive when spending runs ahead of the target pace.
    pub fn pace_variance(&self) -> Decimal {
        self.spent_in_segment.saturating_sub(self.expected_spent())
    }

    pub fn is_exceeded(&self) -> bool {
        self.remaining_in_segment < Decimal::ZERO
    }
}

/// Divides `amount` over `days`, yielding zero when there are no days left.
pub fn per_day(amount: Decimal, days: u32) -> Decimal {
    if days == 0 {
        Decimal::ZERO
    } else {
        amount / Decimal::from(days)
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
/// How a rebalanced daily figure compares with the declared target.
pub enum RateComparison {
    Higher,
    Lower,
    Equal,
}

impl RateComparison {
    pub fn between(rate: Decimal, target: Decimal) -> Self {
        match rate.cmp(&target) {
            Ordering::Greater => RateComparison::Higher,
            Ordering::Less => RateComparison::Lower,
            Ordering::Equal => RateComparison::Equal,
        }
    }
}

impl fmt::Display for RateComparison {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            RateComparison::Higher => "Higher",
            RateComparison::Lower => "Lower",
            RateComparison::Equal => "Equal",
        };
        f.write_str(label)
    }
}

/// Unformatted notification payload produced for one user by the daily rebalance.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RebalanceNotice {
    pub user_id: UserId,
    pub date: NaiveDate,
    pub segment: Segment,
    pub is_segment_start: bool,
    pub new_daily_budget: Decimal,
    pub target_daily: Decimal,
    /// Absent on the first day of a segment.
    pub comparison: Option<RateComparison>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct RebalanceFailure {
    pub user_id: UserId,
    pub reason: String,
}

/// Outcome of a rebalance batch across all users.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RebalanceReport {
    pub date: NaiveDate,
    pub adjusted: Vec<RebalanceNotice>,
    pub skipped: Vec<UserId>,
    pub failures: Vec<RebalanceFailure>,
}

impl RebalanceReport {
    pub fn new(date: NaiveDate) -> Self {
        Self {
            date,
            adjusted: Vec::new(),
            skipped: Vec::new(),
            failures: Vec::new(),
        }
    }

    pub fn is_clean(&self) -> bool {
        self.failures.is_empty()
    }

    pub fn processed(&self) -> usize {
        self.adjusted.len() + self.skipped.len() + self.failures.len()
    }

    pub fn notice_for(&self, user: UserId) -> Option<&RebalanceNotice> {
        self.adjusted.iter().find(|notice| notice.user_id == user)
    }
}
