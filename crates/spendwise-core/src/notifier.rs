use chrono::{DateTime, Utc};
use spendwise_domain::RebalanceNotice;

use crate::CoreError;

/// Delivers rebalance notices to users. Formatting and transport belong to the
/// implementation; the engine only hands over the payload and the moment of delivery.
pub trait Notifier: Send + Sync {
    fn deliver(&self, notice: &RebalanceNotice, at: DateTime<Utc>) -> Result<(), CoreError>;
}
