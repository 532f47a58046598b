//! Daily and segment allowance calculations.

use chrono::NaiveDate;
use spendwise_domain::{segment_of, BudgetState, DailySummary, SegmentSummary, UserId};

use crate::{storage::LedgerStore, CoreError};

/// Combines the segment calendar, stored budget and logged spend.
///
/// `Ok(None)` means the user has no budget configured; it is not an error.
pub struct AllowanceService;

impl AllowanceService {
    pub fn daily_summary(
        store: &dyn LedgerStore,
        user: UserId,
        today: NaiveDate,
    ) -> Result<Option<DailySummary>, CoreError> {
        match store.get_budget(user)? {
            Some(budget) => Self::daily_summary_for(store, &budget, today).map(Some),
            None => Ok(None),
        }
    }

    pub fn daily_summary_for(
        store: &dyn LedgerStore,
        budget: &BudgetState,
        today: NaiveDate,
    ) -> Result<DailySummary, CoreError> {
        let spent_today = store.total_spent(budget.user_id, today, today)?;
        Ok(DailySummary::from_parts(
            today,
            budget.effective_daily_rate(today),
            spent_today,
        ))
    }

    pub fn segment_summary(
        store: &dyn LedgerStore,
        user: UserId,
        today: NaiveDate,
    ) -> Result<Option<SegmentSummary>, CoreError> {
        match store.get_budget(user)? {
            Some(budget) => Self::segment_summary_for(store, &budget, today).map(Some),
            None => Ok(None),
        }
    }

    /// Segment position for an already loaded budget.
    ///
    /// The suggested rate spreads what is left over the days after `today` only;
    /// today's allowance is never reshaped by spending made today.
    pub fn segment_summary_for(
        store: &dyn LedgerStore,
        budget: &BudgetState,
        today: NaiveDate,
    ) -> Result<SegmentSummary, CoreError> {
        let segment = segment_of(today);
        let spent = store.total_spent(budget.user_id, segment.start_date, segment.end_date)?;
        Ok(SegmentSummary::from_parts(
            segment,
            budget.segment_total,
            spent,
            budget.target_daily_rate,
        ))
    }
}
