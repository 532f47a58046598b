//! Once-a-day redistribution of the remaining segment budget.

use chrono::{DateTime, Duration, NaiveDate, Utc};
use rust_decimal::Decimal;
use spendwise_domain::{
    is_segment_start, per_day, RateComparison, RebalanceFailure, RebalanceNotice,
    RebalanceReport, SegmentSummary, UserId,
};
use tracing::{error, info, warn};

use crate::{
    allowance_service::AllowanceService, notifier::Notifier, storage::LedgerStore, CoreError,
};

pub struct RebalanceService;

impl RebalanceService {
    /// Today's allowance before any of today's spending: what is left in the
    /// segment divided over the remaining days, today included.
    pub fn daily_budget_for(summary: &SegmentSummary) -> Decimal {
        per_day(
            summary.remaining_in_segment,
            summary.segment.days_remaining_inclusive,
        )
    }

    /// Recomputes and persists today's adjusted rate for one user.
    ///
    /// Returns `Ok(None)` when the user has no budget. Running twice on the
    /// same day with no new expenses stores the same rate.
    pub fn rebalance_user(
        store: &dyn LedgerStore,
        user: UserId,
        today: NaiveDate,
    ) -> Result<Option<RebalanceNotice>, CoreError> {
        let Some(summary) = AllowanceService::segment_summary(store, user, today)? else {
            return Ok(None);
        };
        let new_daily_budget = Self::daily_budget_for(&summary);
        store.update_adjusted_daily(user, new_daily_budget, today)?;

        let is_segment_start = is_segment_start(today);
        let comparison = if is_segment_start {
            None
        } else {
            Some(RateComparison::between(new_daily_budget, summary.target_daily))
        };
        Ok(Some(RebalanceNotice {
            user_id: user,
            date: today,
            segment: summary.segment,
            is_segment_start,
            new_daily_budget,
            target_daily: summary.target_daily,
            comparison,
        }))
    }

    /// Rebalances every user with a budget and hands each notice to `notifier`.
    ///
    /// A failure for one user is logged and recorded in the report; the batch
    /// carries on. Only a failure to enumerate users aborts the run.
    pub fn run_for_all_users(
        store: &dyn LedgerStore,
        notifier: &dyn Notifier,
        today: NaiveDate,
        at: DateTime<Utc>,
    ) -> Result<RebalanceReport, CoreError> {
        let users = store.budget_users()?;
        let yesterday = today - Duration::days(1);
        info!(%today, %yesterday, users = users.len(), "daily rebalance started");

        let mut report = RebalanceReport::new(today);
        for user in users {
            match Self::rebalance_and_notify(store, notifier, user, today, at) {
                Ok(Some(notice)) => report.adjusted.push(notice),
                Ok(None) => {
                    warn!(user_id = %user, "no budget configured, skipping rebalance");
                    report.skipped.push(user);
                }
                Err(err) => {
                    error!(user_id = %user, error = %err, "rebalance failed for user");
                    report.failures.push(RebalanceFailure {
                        user_id: user,
                        reason: err.to_string(),
                    });
                }
            }
        }

        info!(
            %today,
            adjusted = report.adjusted.len(),
            skipped = report.skipped.len(),
            failed = report.failures.len(),
            "daily rebalance finished"
        );
        Ok(report)
    }

    fn rebalance_and_notify(
        store: &dyn LedgerStore,
        notifier: &dyn Notifier,
        user: UserId,
        today: NaiveDate,
        at: DateTime<Utc>,
    ) -> Result<Option<RebalanceNotice>, CoreError> {
        let Some(notice) = Self::rebalance_user(store, user, today)? else {
            return Ok(None);
        };
        notifier.deliver(&notice, at)?;
        Ok(Some(notice))
    }
}
