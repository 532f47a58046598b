//! Notice delivery through the tracing pipeline.

use chrono::{DateTime, Utc};
use spendwise_core::{CoreError, Notifier};
use spendwise_domain::RebalanceNotice;
use tracing::info;

/// Emits every notice as a structured `info` event under the
/// `spendwise::notice` target, with the full payload as JSON.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogNotifier;

impl Notifier for LogNotifier {
    fn deliver(&self, notice: &RebalanceNotice, at: DateTime<Utc>) -> Result<(), CoreError> {
        let payload =
            serde_json::to_string(notice).map_err(|err| CoreError::Serde(err.to_string()))?;
        let comparison = notice
            .comparison
            .map(|c| c.to_string())
            .unwrap_or_else(|| "-".into());
        info!(
            target: "spendwise::notice",
            user_id = %notice.user_id,
            date = %notice.date,
            segment = %notice.segment.key(),
            segment_start = notice.is_segment_start,
            new_daily_budget = %notice.new_daily_budget,
            comparison = %comparison,
            %at,
            %payload,
            "daily budget rebalanced"
        );
        Ok(())
    }
}
