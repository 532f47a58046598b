#![allow(dead_code)]

use std::{
    path::PathBuf,
    sync::{Arc, Mutex},
};

use chrono::{DateTime, Duration, FixedOffset, NaiveDate, NaiveTime, Offset, TimeZone, Utc};
use once_cell::sync::Lazy;
use spendwise::{
    config::Config,
    domain::RebalanceNotice,
    engine::{Clock, CoreError, Notifier},
    storage::JsonLedgerStore,
    BudgetManager,
};
use tempfile::TempDir;

/// Holds TempDir guards so temporary folders live for the duration of the test run.
static TEST_DIRS: Lazy<Mutex<Vec<TempDir>>> = Lazy::new(|| Mutex::new(Vec::new()));

pub fn temp_dir() -> PathBuf {
    let temp = TempDir::new().expect("create temp dir");
    let base = temp.path().to_path_buf();
    TEST_DIRS.lock().expect("lock temp dir registry").push(temp);
    base
}

pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

/// Clock that tests move forward by hand.
pub struct ManualClock {
    now: Mutex<DateTime<Utc>>,
    offset: FixedOffset,
}

impl ManualClock {
    pub fn at(now: DateTime<Utc>) -> Self {
        Self {
            now: Mutex::new(now),
            offset: Utc.fix(),
        }
    }

    /// 10:00 local time on `date`, local being UTC.
    pub fn on(date: NaiveDate) -> Self {
        Self::at(Utc.from_utc_datetime(&date.and_time(NaiveTime::from_hms_opt(10, 0, 0).unwrap())))
    }

    pub fn advance_days(&self, days: i64) {
        *self.now.lock().unwrap() += Duration::days(days);
    }
}

impl Clock for ManualClock {
    fn now(&self) -> DateTime<Utc> {
        *self.now.lock().unwrap()
    }

    fn offset(&self) -> FixedOffset {
        self.offset
    }
}

#[derive(Default)]
pub struct RecordingNotifier {
    pub delivered: Mutex<Vec<RebalanceNotice>>,
}

impl RecordingNotifier {
    pub fn dates(&self) -> Vec<NaiveDate> {
        self.delivered.lock().unwrap().iter().map(|n| n.date).collect()
    }
}

impl Notifier for RecordingNotifier {
    fn deliver(&self, notice: &RebalanceNotice, _at: DateTime<Utc>) -> Result<(), CoreError> {
        self.delivered.lock().unwrap().push(notice.clone());
        Ok(())
    }
}

/// Manager over a JSON store in a fresh temp directory.
pub fn setup_manager(
    clock: Arc<dyn Clock>,
) -> (BudgetManager, Arc<RecordingNotifier>, PathBuf) {
    let base = temp_dir();
    let mut config = Config::default();
    config.data_dir = Some(base.join("data"));
    let store = JsonLedgerStore::with_retention(config.resolve_data_dir(), config.backup_retention)
        .expect("open json store")
        .with_backup_interval(Duration::minutes(i64::from(config.backup_interval_minutes)));
    let notifier = Arc::new(RecordingNotifier::default());
    let manager = BudgetManager::new(config, Arc::new(store), clock, notifier.clone());
    (manager, notifier, base)
}
