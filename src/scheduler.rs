//! Wall-clock triggering of the daily rebalance.

use std::{future::Future, sync::Arc};

use chrono::{DateTime, Duration, FixedOffset, NaiveDate, NaiveTime, TimeZone, Utc};
use spendwise_core::{Clock, LedgerStore, Notifier, RebalanceService};
use spendwise_domain::RebalanceReport;
use tracing::{error, info, info_span, warn};
use uuid::Uuid;

use crate::errors::AppError;

/// A fixed local time of day in a fixed timezone.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DailySchedule {
    pub at: NaiveTime,
    pub offset: FixedOffset,
}

impl DailySchedule {
    pub fn new(at: NaiveTime, offset: FixedOffset) -> Self {
        Self { at, offset }
    }

    /// First scheduled instant strictly after `now`.
    pub fn next_run_after(&self, now: DateTime<Utc>) -> DateTime<Utc> {
        let local_today = now.with_timezone(&self.offset).date_naive();
        let today_run = self.instant_on(local_today);
        if today_run > now {
            today_run
        } else {
            self.instant_on(local_today + Duration::days(1))
        }
    }

    /// The UTC instant at which the run for local `date` fires.
    pub fn instant_on(&self, date: NaiveDate) -> DateTime<Utc> {
        let local = date.and_time(self.at);
        let shift = Duration::seconds(i64::from(self.offset.local_minus_utc()));
        Utc.from_utc_datetime(&(local - shift))
    }
}

/// Drives [`RebalanceService::run_for_all_users`] once per local calendar day.
pub struct Scheduler {
    schedule: DailySchedule,
    store: Arc<dyn LedgerStore>,
    notifier: Arc<dyn Notifier>,
    clock: Arc<dyn Clock>,
}

impl Scheduler {
    pub fn new(
        schedule: DailySchedule,
        store: Arc<dyn LedgerStore>,
        notifier: Arc<dyn Notifier>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            schedule,
            store,
            notifier,
            clock,
        }
    }

    pub fn schedule(&self) -> DailySchedule {
        self.schedule
    }

    /// Sleeps until each scheduled instant and runs the batch, until `shutdown`
    /// resolves. Returns the number of batches run.
    ///
    /// A failed batch is logged and the loop waits for the next day.
    pub async fn run_until<F>(&self, shutdown: F) -> Result<u64, AppError>
    where
        F: Future<Output = ()>,
    {
        tokio::pin!(shutdown);
        let mut runs = 0u64;
        let mut last_run: Option<NaiveDate> = None;

        loop {
            let now = self.clock.now();
            let next = self.schedule.next_run_after(now);
            let wait = (next - now).to_std().unwrap_or_default();
            info!(next_run = %next, "waiting for next rebalance");

            tokio::select! {
                _ = &mut shutdown => {
                    info!(runs, "scheduler received shutdown signal");
                    return Ok(runs);
                }
                _ = tokio::time::sleep(wait) => {}
            }

            let today = self.clock.today();
            if last_run == Some(today) {
                warn!(%today, "rebalance already ran today, skipping");
                continue;
            }

            match self.run_once(today).await {
                Ok(report) if !report.is_clean() => {
                    warn!(
                        %today,
                        failures = report.failures.len(),
                        "rebalance finished with failures"
                    );
                }
                Ok(_) => {}
                Err(err) => error!(%today, error = %err, "rebalance batch failed"),
            }
            last_run = Some(today);
            runs += 1;
        }
    }

    /// Runs one batch for `today` on a blocking worker.
    pub async fn run_once(&self, today: NaiveDate) -> Result<RebalanceReport, AppError> {
        let store = Arc::clone(&self.store);
        let notifier = Arc::clone(&self.notifier);
        let at = self.clock.now();
        let span = info_span!("rebalance", run_id = %Uuid::new_v4(), %today);

        let report = tokio::task::spawn_blocking(move || {
            span.in_scope(|| {
                RebalanceService::run_for_all_users(store.as_ref(), notifier.as_ref(), today, at)
            })
        })
        .await??;
        Ok(report)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn schedule(hour: u32, offset_hours: i32) -> DailySchedule {
        DailySchedule::new(
            NaiveTime::from_hms_opt(hour, 0, 0).unwrap(),
            FixedOffset::east_opt(offset_hours * 3600).unwrap(),
        )
    }

    fn utc(y: i32, m: u32, d: u32, h: u32, min: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, m, d, h, min, 0).unwrap()
    }

    #[test]
    fn next_run_is_later_today_when_time_not_reached() {
        let next = schedule(9, 0).next_run_after(utc(2025, 3, 4, 7, 30));
        assert_eq!(next, utc(2025, 3, 4, 9, 0));
    }

    #[test]
    fn next_run_rolls_to_tomorrow_at_or_after_run_time() {
        let at_run = schedule(9, 0).next_run_after(utc(2025, 3, 4, 9, 0));
        assert_eq!(at_run, utc(2025, 3, 5, 9, 0));
        let later = schedule(9, 0).next_run_after(utc(2025, 3, 31, 23, 0));
        assert_eq!(later, utc(2025, 4, 1, 9, 0));
    }

    #[test]
    fn local_time_is_converted_through_the_offset() {
        // 09:00 at UTC-5 is 14:00 UTC.
        let next = schedule(9, -5).next_run_after(utc(2025, 3, 4, 12, 0));
        assert_eq!(next, utc(2025, 3, 4, 14, 0));

        // 09:00 at UTC+9 on the 5th is 00:00 UTC on the 5th.
        let east = schedule(9, 9).next_run_after(utc(2025, 3, 4, 12, 0));
        assert_eq!(east, utc(2025, 3, 5, 0, 0));
    }

    #[test]
    fn next_run_is_never_at_or_before_now() {
        let schedule = schedule(0, 3);
        let mut now = utc(2024, 2, 27, 0, 0);
        for _ in 0..200 {
            let next = schedule.next_run_after(now);
            assert!(next > now);
            assert!(next - now <= Duration::days(1));
            now = now + Duration::minutes(37);
        }
    }
}
