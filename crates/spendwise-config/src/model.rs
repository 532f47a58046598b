use std::path::PathBuf;

use chrono::{FixedOffset, NaiveTime, Offset, Utc};
use serde::{Deserialize, Serialize};

use crate::ConfigError;

const MAX_OFFSET_MINUTES: u32 = 14 * 60;

/// Engine settings persisted as JSON. Missing fields take their defaults.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Offset from UTC, in minutes, of the timezone every calendar day is
    /// reckoned in.
    #[serde(default)]
    pub utc_offset_minutes: i32,
    /// Local wall-clock time of the daily rebalance.
    #[serde(default = "Config::default_rebalance_at")]
    pub rebalance_at: NaiveTime,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    /// Optional custom data directory. Defaults to `<platform data dir>/spendwise`.
    pub data_dir: Option<PathBuf>,
    #[serde(default = "Config::default_low_allowance_percent")]
    pub low_allowance_percent: u8,
    #[serde(default = "Config::default_recent_expense_days")]
    pub recent_expense_days: u32,
    #[serde(default = "Config::default_backup_retention")]
    pub backup_retention: usize,
    /// Minimum minutes between ledger backups; zero backs up on every write.
    #[serde(default = "Config::default_backup_interval_minutes")]
    pub backup_interval_minutes: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub log_filter: Option<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            utc_offset_minutes: 0,
            rebalance_at: Self::default_rebalance_at(),
            data_dir: None,
            low_allowance_percent: Self::default_low_allowance_percent(),
            recent_expense_days: Self::default_recent_expense_days(),
            backup_retention: Self::default_backup_retention(),
            backup_interval_minutes: Self::default_backup_interval_minutes(),
            log_filter: None,
        }
    }
}

impl Config {
    pub fn default_rebalance_at() -> NaiveTime {
        NaiveTime::from_hms_opt(9, 0, 0).unwrap_or_default()
    }

    pub fn default_low_allowance_percent() -> u8 {
        20
    }

    pub fn default_recent_expense_days() -> u32 {
        7
    }

    pub fn default_backup_retention() -> usize {
        5
    }

    pub fn default_backup_interval_minutes() -> u32 {
        15
    }

    /// The configured timezone. Call [`Config::validate`] first; an
    /// out-of-range offset falls back to UTC.
    pub fn offset(&self) -> FixedOffset {
        FixedOffset::east_opt(self.utc_offset_minutes.saturating_mul(60))
            .unwrap_or_else(|| Utc.fix())
    }

    pub fn resolve_data_dir(&self) -> PathBuf {
        if let Some(path) = &self.data_dir {
            return path.clone();
        }

        let base = dirs::data_dir()
            .or_else(dirs::home_dir)
            .unwrap_or_else(|| PathBuf::from("."));

        base.join("spendwise")
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.utc_offset_minutes.unsigned_abs() > MAX_OFFSET_MINUTES {
            return Err(ConfigError::Invalid {
                field: "utc_offset_minutes",
                reason: format!("{} is outside ±{}", self.utc_offset_minutes, MAX_OFFSET_MINUTES),
            });
        }
        if self.low_allowance_percent > 100 {
            return Err(ConfigError::Invalid {
                field: "low_allowance_percent",
                reason: format!("{} is above 100", self.low_allowance_percent),
            });
        }
        Ok(())
    }
}
