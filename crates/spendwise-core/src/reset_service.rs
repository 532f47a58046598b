use chrono::{FixedOffset, NaiveDate};
use spendwise_domain::{segment_of, UserId};

use crate::{storage::LedgerStore, CoreError};

/// Days into a fresh segment during which the new-segment banner is shown.
pub const NEW_SEGMENT_BANNER_DAYS: u32 = 2;

/// Detects whether a new segment began since the budget was last declared.
pub struct ResetService;

impl ResetService {
    /// `true` when `today` lies in a different segment than the budget's
    /// `last_updated` date (seen from `offset`). Users without a budget yield `false`.
    pub fn crossed_segment_boundary(
        store: &dyn LedgerStore,
        user: UserId,
        today: NaiveDate,
        offset: &FixedOffset,
    ) -> Result<bool, CoreError> {
        Ok(store
            .get_budget(user)?
            .map(|budget| Self::crossed_between(budget.last_updated_date(offset), today))
            .unwrap_or(false))
    }

    /// Compares full segment keys, so the same index in another month (or
    /// year) still counts as a crossing.
    pub fn crossed_between(last_updated: NaiveDate, today: NaiveDate) -> bool {
        segment_of(today).key() != segment_of(last_updated).key()
    }

    /// Whether to announce the new segment: a crossing happened and `today` is
    /// within the first [`NEW_SEGMENT_BANNER_DAYS`] days of its segment.
    pub fn announce_new_segment(last_updated: NaiveDate, today: NaiveDate) -> bool {
        Self::crossed_between(last_updated, today)
            && segment_of(today).days_elapsed_inclusive <= NEW_SEGMENT_BANNER_DAYS
    }
}
