//! spendwise-storage-json
//!
//! File-backed [`LedgerStore`]: one JSON document per data directory, written
//! atomically, with a rolling set of timestamped backups of earlier versions.
//! At most one backup is taken per backup interval, so a burst of writes such
//! as a rebalance batch does not push older snapshots out of retention.

use std::{
    fs::{self, File},
    io::Write,
    path::{Path, PathBuf},
    sync::{Mutex, MutexGuard},
};

use chrono::{DateTime, Duration, NaiveDate, Utc};
use rust_decimal::Decimal;
use spendwise_core::{CoreError, LedgerStore};
use spendwise_domain::{BudgetState, Expense, Ledger, UserId};

const LEDGER_FILE_NAME: &str = "ledger.json";
const BACKUPS_DIR_NAME: &str = "backups";
const BACKUP_PREFIX: &str = "ledger_";
const BACKUP_EXTENSION: &str = "json";
const BACKUP_TIMESTAMP_FORMAT: &str = "%Y%m%d_%H%M%S_%6f";
const TMP_SUFFIX: &str = "tmp";
pub const DEFAULT_RETENTION: usize = 5;
pub const DEFAULT_BACKUP_INTERVAL_MINUTES: i64 = 15;

/// JSON persistence for the whole ledger.
///
/// The document is cached in memory behind a mutex; every mutation is applied
/// to a copy, written to disk, and only then becomes visible to readers.
#[derive(Debug)]
pub struct JsonLedgerStore {
    ledger_path: PathBuf,
    backups_dir: PathBuf,
    retention: usize,
    backup_interval: Duration,
    ledger: Mutex<Ledger>,
}

impl JsonLedgerStore {
    pub fn open(data_dir: PathBuf) -> Result<Self, CoreError> {
        Self::with_retention(data_dir, DEFAULT_RETENTION)
    }

    /// Opens (or initialises) the store in `data_dir`, keeping at most
    /// `retention` backups; a retention of zero is treated as one.
    pub fn with_retention(data_dir: PathBuf, retention: usize) -> Result<Self, CoreError> {
        fs::create_dir_all(&data_dir)?;
        let backups_dir = data_dir.join(BACKUPS_DIR_NAME);
        fs::create_dir_all(&backups_dir)?;
        let ledger_path = data_dir.join(LEDGER_FILE_NAME);
        let ledger = if ledger_path.exists() {
            load_ledger_from_path(&ledger_path)?
        } else {
            Ledger::new()
        };
        Ok(Self {
            ledger_path,
            backups_dir,
            retention: retention.max(1),
            backup_interval: Duration::minutes(DEFAULT_BACKUP_INTERVAL_MINUTES),
            ledger: Mutex::new(ledger),
        })
    }

    /// Minimum age of the newest backup before a write takes another one.
    /// Zero or negative backs up on every write.
    pub fn with_backup_interval(mut self, interval: Duration) -> Self {
        self.backup_interval = interval;
        self
    }

    pub fn ledger_path(&self) -> &Path {
        &self.ledger_path
    }

    pub fn backups_dir(&self) -> &Path {
        &self.backups_dir
    }

    /// Backup file names, newest first.
    pub fn list_backups(&self) -> Result<Vec<String>, CoreError> {
        if !self.backups_dir.exists() {
            return Ok(Vec::new());
        }
        let mut names = Vec::new();
        for entry in fs::read_dir(&self.backups_dir)? {
            let path = entry?.path();
            if path.extension().and_then(|ext| ext.to_str()) != Some(BACKUP_EXTENSION) {
                continue;
            }
            if let Some(name) = path.file_name().and_then(|name| name.to_str()) {
                if name.starts_with(BACKUP_PREFIX) {
                    names.push(name.to_string());
                }
            }
        }
        // Fixed-width timestamps sort chronologically.
        names.sort_unstable_by(|a, b| b.cmp(a));
        Ok(names)
    }

    fn lock(&self) -> Result<MutexGuard<'_, Ledger>, CoreError> {
        self.ledger
            .lock()
            .map_err(|_| CoreError::Storage("ledger lock poisoned".into()))
    }

    /// Applies `change` to a copy of the ledger and persists it before
    /// publishing the copy.
    fn mutate<T>(
        &self,
        change: impl FnOnce(&mut Ledger) -> Result<T, CoreError>,
    ) -> Result<T, CoreError> {
        let mut guard = self.lock()?;
        let mut next = guard.clone();
        let out = change(&mut next)?;
        self.persist(&next)?;
        *guard = next;
        Ok(out)
    }

    fn persist(&self, ledger: &Ledger) -> Result<(), CoreError> {
        if self.ledger_path.exists() && self.backup_due()? {
            self.backup_existing_file()?;
        }
        save_ledger_to_path(ledger, &self.ledger_path)
    }

    fn backup_due(&self) -> Result<bool, CoreError> {
        if self.backup_interval <= Duration::zero() {
            return Ok(true);
        }
        let Some(newest) = self.list_backups()?.into_iter().next() else {
            return Ok(true);
        };
        let taken: DateTime<Utc> = fs::metadata(self.backups_dir.join(newest))?
            .modified()?
            .into();
        Ok(Utc::now() - taken >= self.backup_interval)
    }

    fn backup_existing_file(&self) -> Result<(), CoreError> {
        fs::create_dir_all(&self.backups_dir)?;
        let timestamp = Utc::now().format(BACKUP_TIMESTAMP_FORMAT).to_string();
        let file_name = format!("{}{}.{}", BACKUP_PREFIX, timestamp, BACKUP_EXTENSION);
        fs::copy(&self.ledger_path, self.backups_dir.join(file_name))?;
        self.prune_backups()
    }

    fn prune_backups(&self) -> Result<(), CoreError> {
        for name in self.list_backups()?.into_iter().skip(self.retention) {
            let _ = fs::remove_file(self.backups_dir.join(name));
        }
        Ok(())
    }
}

impl LedgerStore for JsonLedgerStore {
    fn total_spent(
        &self,
        user: UserId,
        start: NaiveDate,
        end_inclusive: NaiveDate,
    ) -> Result<Decimal, CoreError> {
        self.lock()?
            .total_spent(user, start, end_inclusive)
            .ok_or_else(|| CoreError::total_overflow(user))
    }

    fn get_budget(&self, user: UserId) -> Result<Option<BudgetState>, CoreError> {
        Ok(self.lock()?.budget(user).cloned())
    }

    fn set_budget(
        &self,
        user: UserId,
        target_daily_rate: Decimal,
        segment_total: Decimal,
        updated_at: DateTime<Utc>,
    ) -> Result<BudgetState, CoreError> {
        self.mutate(|ledger| {
            Ok(ledger
                .upsert_budget(user, target_daily_rate, segment_total, updated_at)
                .clone())
        })
    }

    fn update_adjusted_daily(
        &self,
        user: UserId,
        rate: Decimal,
        date: NaiveDate,
    ) -> Result<(), CoreError> {
        self.mutate(|ledger| {
            let budget = ledger
                .budget_mut(user)
                .ok_or(CoreError::NotConfigured(user))?;
            budget.apply_adjustment(rate, date);
            Ok(())
        })
    }

    fn budget_users(&self) -> Result<Vec<UserId>, CoreError> {
        Ok(self.lock()?.budget_users())
    }

    fn add_expense(&self, expense: &Expense) -> Result<(), CoreError> {
        self.mutate(|ledger| {
            ledger.add_expense(expense.clone());
            Ok(())
        })
    }

    fn expenses_between(
        &self,
        user: UserId,
        start: NaiveDate,
        end_inclusive: NaiveDate,
    ) -> Result<Vec<Expense>, CoreError> {
        Ok(self.lock()?.expenses_between(user, start, end_inclusive))
    }
}

/// Saves a ledger to an arbitrary path on disk.
pub fn save_ledger_to_path(ledger: &Ledger, path: &Path) -> Result<(), CoreError> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let json =
        serde_json::to_string_pretty(ledger).map_err(|err| CoreError::Serde(err.to_string()))?;
    let tmp = tmp_path(path);
    write_atomic(&tmp, &json)?;
    fs::rename(&tmp, path)?;
    Ok(())
}

/// Loads a ledger from the provided filesystem path.
pub fn load_ledger_from_path(path: &Path) -> Result<Ledger, CoreError> {
    let data = fs::read_to_string(path)?;
    serde_json::from_str(&data).map_err(|err| CoreError::Serde(err.to_string()))
}

fn tmp_path(path: &Path) -> PathBuf {
    let mut tmp = path.to_path_buf();
    let ext = match path.extension().and_then(|ext| ext.to_str()) {
        Some(existing) => format!("{}.{}", existing, TMP_SUFFIX),
        None => TMP_SUFFIX.to_string(),
    };
    tmp.set_extension(ext);
    tmp
}

fn write_atomic(path: &Path, data: &str) -> Result<(), CoreError> {
    let mut file = File::create(path)?;
    file.write_all(data.as_bytes())?;
    file.sync_all()?;
    Ok(())
}
