use std::sync::Arc;

use chrono::{Duration, NaiveDate};
use rust_decimal::Decimal;
use serde::Serialize;
use spendwise_config::Config;
use spendwise_core::{
    AllowanceService, BudgetService, Clock, ExpenseService, LedgerStore, Notifier,
    RebalanceService, ResetService,
};
use spendwise_domain::{
    BudgetState, DailyStatus, DailySummary, Expense, RebalanceReport, SegmentSummary, UserId,
};
use spendwise_storage_json::JsonLedgerStore;
use tracing::info;

use crate::{
    clock::SystemClock,
    errors::AppError,
    notifier::LogNotifier,
    scheduler::{DailySchedule, Scheduler},
};

/// Everything a status view needs for one user on one day.
#[derive(Debug, Clone, Serialize)]
pub struct BudgetOverview {
    pub daily: DailySummary,
    pub status: DailyStatus,
    pub segment: SegmentSummary,
    /// The last declaration was made in an earlier segment.
    pub new_segment: bool,
    /// `new_segment` and still within the first days of the segment.
    pub show_new_segment_banner: bool,
}

/// Facade binding a ledger store, a clock and a notifier under one config.
///
/// Every date-sensitive call uses `clock.today()`, so the whole engine agrees
/// on the calendar day.
pub struct BudgetManager {
    config: Config,
    store: Arc<dyn LedgerStore>,
    clock: Arc<dyn Clock>,
    notifier: Arc<dyn Notifier>,
}

impl BudgetManager {
    pub fn new(
        config: Config,
        store: Arc<dyn LedgerStore>,
        clock: Arc<dyn Clock>,
        notifier: Arc<dyn Notifier>,
    ) -> Self {
        Self {
            config,
            store,
            clock,
            notifier,
        }
    }

    /// Production wiring: JSON store in the configured data directory, the
    /// system clock in the configured timezone, and [`LogNotifier`].
    pub fn from_config(config: Config) -> Result<Self, AppError> {
        config.validate()?;
        let data_dir = config.resolve_data_dir();
        let store = JsonLedgerStore::with_retention(data_dir.clone(), config.backup_retention)?
            .with_backup_interval(Duration::minutes(i64::from(config.backup_interval_minutes)));
        let clock = SystemClock::new(config.offset());
        info!(data_dir = %data_dir.display(), offset = %config.offset(), "budget manager ready");
        Ok(Self::new(
            config,
            Arc::new(store),
            Arc::new(clock),
            Arc::new(LogNotifier),
        ))
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn store(&self) -> &dyn LedgerStore {
        self.store.as_ref()
    }

    pub fn today(&self) -> NaiveDate {
        self.clock.today()
    }

    pub fn set_budget(
        &self,
        user: UserId,
        target_daily_rate: Decimal,
        segment_total: Decimal,
    ) -> Result<BudgetState, AppError> {
        Ok(BudgetService::set_budget(
            self.store(),
            self.clock.as_ref(),
            user,
            target_daily_rate,
            segment_total,
        )?)
    }

    pub fn budget(&self, user: UserId) -> Result<Option<BudgetState>, AppError> {
        Ok(BudgetService::get(self.store(), user)?)
    }

    pub fn record_expense(
        &self,
        user: UserId,
        amount: Decimal,
        description: &str,
    ) -> Result<Expense, AppError> {
        Ok(ExpenseService::record(
            self.store(),
            self.clock.as_ref(),
            user,
            amount,
            description,
        )?)
    }

    /// Parses `raw_amount` before recording; rejected text is kept in the error.
    pub fn record_expense_text(
        &self,
        user: UserId,
        raw_amount: &str,
        description: &str,
    ) -> Result<Expense, AppError> {
        Ok(ExpenseService::record_text(
            self.store(),
            self.clock.as_ref(),
            user,
            raw_amount,
            description,
        )?)
    }

    /// Expenses within the configured look-back window, newest first.
    pub fn recent_expenses(&self, user: UserId) -> Result<Vec<Expense>, AppError> {
        Ok(ExpenseService::recent(
            self.store(),
            user,
            self.today(),
            self.config.recent_expense_days,
        )?)
    }

    pub fn daily_summary(&self, user: UserId) -> Result<Option<DailySummary>, AppError> {
        Ok(AllowanceService::daily_summary(self.store(), user, self.today())?)
    }

    pub fn segment_summary(&self, user: UserId) -> Result<Option<SegmentSummary>, AppError> {
        Ok(AllowanceService::segment_summary(self.store(), user, self.today())?)
    }

    pub fn crossed_segment_boundary(&self, user: UserId) -> Result<bool, AppError> {
        Ok(ResetService::crossed_segment_boundary(
            self.store(),
            user,
            self.today(),
            &self.clock.offset(),
        )?)
    }

    /// `None` when the user has no budget.
    pub fn overview(&self, user: UserId) -> Result<Option<BudgetOverview>, AppError> {
        let today = self.today();
        let Some(budget) = BudgetService::get(self.store(), user)? else {
            return Ok(None);
        };
        let daily = AllowanceService::daily_summary_for(self.store(), &budget, today)?;
        let segment = AllowanceService::segment_summary_for(self.store(), &budget, today)?;
        let declared = budget.last_updated_date(&self.clock.offset());
        Ok(Some(BudgetOverview {
            status: daily.status(self.config.low_allowance_percent),
            daily,
            segment,
            new_segment: ResetService::crossed_between(declared, today),
            show_new_segment_banner: ResetService::announce_new_segment(declared, today),
        }))
    }

    /// Runs the daily rebalance immediately for `clock.today()`.
    pub fn rebalance_now(&self) -> Result<RebalanceReport, AppError> {
        Ok(RebalanceService::run_for_all_users(
            self.store(),
            self.notifier.as_ref(),
            self.today(),
            self.clock.now(),
        )?)
    }

    /// Scheduler sharing this manager's store, notifier and clock, firing at
    /// the configured local time.
    pub fn scheduler(&self) -> Scheduler {
        Scheduler::new(
            DailySchedule::new(self.config.rebalance_at, self.clock.offset()),
            Arc::clone(&self.store),
            Arc::clone(&self.notifier),
            Arc::clone(&self.clock),
        )
    }
}
