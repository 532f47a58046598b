//! Explicit user actions on a budget declaration.

use rust_decimal::Decimal;
use spendwise_domain::{BudgetState, UserId};
use tracing::info;

use crate::{storage::LedgerStore, time::Clock, validation::ensure_valid_amount, CoreError};

pub struct BudgetService;

impl BudgetService {
    /// Declares (or re-declares) a user's target daily rate and segment total.
    ///
    /// Both amounts must be positive. `last_updated` is stamped from `clock`;
    /// an adjustment pinned by the rebalancer is left as stored.
    pub fn set_budget(
        store: &dyn LedgerStore,
        clock: &dyn Clock,
        user: UserId,
        target_daily_rate: Decimal,
        segment_total: Decimal,
    ) -> Result<BudgetState, CoreError> {
        ensure_valid_amount(target_daily_rate, &target_daily_rate.to_string())?;
        ensure_valid_amount(segment_total, &segment_total.to_string())?;
        let state = store.set_budget(user, target_daily_rate, segment_total, clock.now())?;
        info!(
            user_id = %user,
            target_daily = %target_daily_rate,
            segment_total = %segment_total,
            "budget declared"
        );
        Ok(state)
    }

    pub fn get(store: &dyn LedgerStore, user: UserId) -> Result<Option<BudgetState>, CoreError> {
        store.get_budget(user)
    }
}
