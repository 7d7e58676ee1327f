//! DeadlineScheduler processor.
//!
//! Runs two independent sweeps at a fixed rate:
//! - expired voting: `VOTING` gatherings past their deadline are auto-confirmed
//! - stuck tie-break: `TIEBREAK` gatherings past deadline + tie-break window
//!   are resolved automatically
//!
//! A failure on one gathering is logged and the sweep moves on to the next.
//! Missed ticks are skipped, so a slow sweep never triggers a burst.

use crate::auth::{HostTokenVerifier, SecretVerifier};
use crate::config::SchedulerConfig;
use crate::entities::GatheringStatus;
use crate::entities::gathering::Gathering;
use crate::orchestrator::{AutoOutcome, ConfirmError, ConfirmationOrchestrator};
use crate::store::{Store, StoreError};
use crate::utils::clock::now_utc;
use std::fmt;
use tokio::sync::watch;
use tokio::time::MissedTickBehavior;
use tracing::{debug, error, info, warn};

/// Tallies of one sweep.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SweepReport {
    pub processed: usize,
    pub confirmed: usize,
    pub moved_to_tiebreak: usize,
    pub expired: usize,
    pub skipped: usize,
    pub failed: usize,
}

impl SweepReport {
    fn record(&mut self, outcome: &Result<AutoOutcome, ConfirmError>) {
        self.processed += 1;
        match outcome {
            Ok(AutoOutcome::Confirmed(_)) => self.confirmed += 1,
            Ok(AutoOutcome::MovedToTiebreak) => self.moved_to_tiebreak += 1,
            Ok(AutoOutcome::Expired) => self.expired += 1,
            Ok(AutoOutcome::Skipped(_)) => self.skipped += 1,
            Err(_) => self.failed += 1,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Job {
    ExpiredVoting,
    StuckTiebreak,
}

impl fmt::Display for Job {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Job::ExpiredVoting => f.write_str("expired-voting"),
            Job::StuckTiebreak => f.write_str("stuck-tiebreak"),
        }
    }
}

/// Periodic driver of the automatic resolution paths.
pub struct DeadlineScheduler<S, V = HostTokenVerifier> {
    orchestrator: ConfirmationOrchestrator<S, V>,
    config: SchedulerConfig,
}

impl<S: Store, V: SecretVerifier> DeadlineScheduler<S, V> {
    pub fn new(orchestrator: ConfirmationOrchestrator<S, V>, config: SchedulerConfig) -> Self {
        Self {
            orchestrator,
            config,
        }
    }

    /// Run both sweeps until shutdown is signaled.
    pub async fn run(self, shutdown_rx: watch::Receiver<bool>) {
        info!(
            interval_secs = self.config.interval.as_secs(),
            tiebreak_window_hours = self.config.tiebreak_window.whole_hours(),
            "DeadlineScheduler started"
        );

        tokio::join!(
            self.job_loop(Job::ExpiredVoting, shutdown_rx.clone()),
            self.job_loop(Job::StuckTiebreak, shutdown_rx),
        );

        info!("DeadlineScheduler shutdown complete");
    }

    async fn job_loop(&self, job: Job, mut shutdown_rx: watch::Receiver<bool>) {
        let mut ticker = tokio::time::interval(self.config.interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

        loop {
            tokio::select! {
                biased;

                changed = shutdown_rx.changed() => {
                    if changed.is_err() || *shutdown_rx.borrow() {
                        info!(%job, "Sweep received shutdown signal");
                        break;
                    }
                }

                _ = ticker.tick() => {
                    let now = now_utc();
                    let report = match job {
                        Job::ExpiredVoting => self.sweep_expired_voting(now).await,
                        Job::StuckTiebreak => self.sweep_stuck_tiebreaks(now).await,
                    };
                    match report {
                        Ok(report) if report.processed == 0 => {
                            debug!(%job, "Nothing due");
                        }
                        Ok(report) => {
                            info!(
                                %job,
                                processed = report.processed,
                                confirmed = report.confirmed,
                                moved_to_tiebreak = report.moved_to_tiebreak,
                                expired = report.expired,
                                skipped = report.skipped,
                                failed = report.failed,
                                "Sweep finished"
                            );
                        }
                        Err(e) => {
                            error!(%job, error = %e, "Failed to list due gatherings");
                        }
                    }
                }
            }
        }
    }

    /// Auto-confirm every `VOTING` gathering whose deadline is before `now`.
    pub async fn sweep_expired_voting(
        &self,
        now: time::PrimitiveDateTime,
    ) -> Result<SweepReport, StoreError> {
        let due = self
            .orchestrator
            .store()
            .list_due(GatheringStatus::Voting, now)
            .await?;
        let mut report = SweepReport::default();
        for gathering in &due {
            let outcome = self.orchestrator.auto_confirm(gathering, now).await;
            log_failure(Job::ExpiredVoting, gathering, &outcome);
            report.record(&outcome);
        }
        Ok(report)
    }

    /// Resolve every `TIEBREAK` gathering whose deadline plus the tie-break
    /// window is before `now`.
    pub async fn sweep_stuck_tiebreaks(
        &self,
        now: time::PrimitiveDateTime,
    ) -> Result<SweepReport, StoreError> {
        let Some(cutoff) = now.checked_sub(self.config.tiebreak_window) else {
            // The window reaches before the representable range, so nothing is due.
            warn!(
                tiebreak_window_hours = self.config.tiebreak_window.whole_hours(),
                "Tie-break window exceeds the calendar, skipping sweep"
            );
            return Ok(SweepReport::default());
        };
        let due = self
            .orchestrator
            .store()
            .list_due(GatheringStatus::Tiebreak, cutoff)
            .await?;
        let mut report = SweepReport::default();
        for gathering in &due {
            let outcome = self.orchestrator.auto_resolve_tiebreak(gathering, now).await;
            log_failure(Job::StuckTiebreak, gathering, &outcome);
            report.record(&outcome);
        }
        Ok(report)
    }
}

fn log_failure(job: Job, gathering: &Gathering, outcome: &Result<AutoOutcome, ConfirmError>) {
    if let Err(e) = outcome {
        warn!(
            %job,
            gathering_id = gathering.id,
            share_code = %gathering.share_code,
            error = %e,
            "Failed to resolve gathering, continuing with the next one"
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::{CandidateKind, GatheringKind};
    use crate::store::memory::{MemoryStore, gathering};
    use std::sync::Arc;
    use std::time::Duration;
    use time::macros::datetime;

    fn scheduler(store: &Arc<MemoryStore>) -> DeadlineScheduler<MemoryStore> {
        DeadlineScheduler::new(
            ConfirmationOrchestrator::new(store.clone()),
            SchedulerConfig::default(),
        )
    }

    /// TIME_ONLY gathering with one candidate and one vote for it.
    fn seed(store: &MemoryStore, id: i64, status: GatheringStatus) {
        let share_code = format!("g{id}");
        store.insert_gathering(gathering(id, &share_code, GatheringKind::TimeOnly, status));
        store.add_time_candidate(id, 100 + id, 0);
        store.set_participants(id, 1);
        store.vote(id, 1, 100 + id, CandidateKind::Time);
    }

    #[tokio::test]
    async fn test_sweep_isolates_failures() {
        let store = Arc::new(MemoryStore::default());
        seed(&store, 1, GatheringStatus::Voting);
        seed(&store, 2, GatheringStatus::Voting);
        seed(&store, 3, GatheringStatus::Voting);
        store.fail_on(2);

        let report = scheduler(&store)
            .sweep_expired_voting(datetime!(2026-01-10 12:01))
            .await
            .unwrap();
        assert_eq!(report.processed, 3);
        assert_eq!(report.confirmed, 2);
        assert_eq!(report.failed, 1);
        assert_eq!(store.status_of(1), Some(GatheringStatus::Confirmed));
        assert_eq!(store.status_of(2), Some(GatheringStatus::Voting));
        assert_eq!(store.status_of(3), Some(GatheringStatus::Confirmed));
    }

    #[tokio::test]
    async fn test_sweep_expired_voting_respects_deadline() {
        let store = Arc::new(MemoryStore::default());
        seed(&store, 1, GatheringStatus::Voting);
        let scheduler = scheduler(&store);

        // Deadline is exactly 12:00; a gathering is due only strictly after it.
        let report = scheduler
            .sweep_expired_voting(datetime!(2026-01-10 12:00))
            .await
            .unwrap();
        assert_eq!(report, SweepReport::default());

        let report = scheduler
            .sweep_expired_voting(datetime!(2026-01-10 12:00:01))
            .await
            .unwrap();
        assert_eq!(report.confirmed, 1);
    }

    #[tokio::test]
    async fn test_sweep_counts_outcomes() {
        let store = Arc::new(MemoryStore::default());
        seed(&store, 1, GatheringStatus::Voting);
        // No participants: expires.
        store.insert_gathering(gathering(2, "g2", GatheringKind::TimeOnly, GatheringStatus::Voting));
        store.add_time_candidate(2, 200, 0);
        // Tied: moves to tie-break.
        store.insert_gathering(gathering(3, "g3", GatheringKind::TimeOnly, GatheringStatus::Voting));
        store.add_time_candidate(3, 300, 0);
        store.add_time_candidate(3, 301, 1);
        store.set_participants(3, 2);
        store.vote(3, 1, 300, CandidateKind::Time);
        store.vote(3, 2, 301, CandidateKind::Time);

        let report = scheduler(&store)
            .sweep_expired_voting(datetime!(2026-01-11 00:00))
            .await
            .unwrap();
        assert_eq!(
            report,
            SweepReport {
                processed: 3,
                confirmed: 1,
                moved_to_tiebreak: 1,
                expired: 1,
                skipped: 0,
                failed: 0,
            }
        );
    }

    #[tokio::test]
    async fn test_sweep_stuck_tiebreaks_waits_for_window() {
        let store = Arc::new(MemoryStore::default());
        seed(&store, 1, GatheringStatus::Tiebreak);
        let scheduler = scheduler(&store);

        let report = scheduler
            .sweep_stuck_tiebreaks(datetime!(2026-01-11 11:59))
            .await
            .unwrap();
        assert_eq!(report.processed, 0);
        assert_eq!(store.status_of(1), Some(GatheringStatus::Tiebreak));

        let report = scheduler
            .sweep_stuck_tiebreaks(datetime!(2026-01-11 12:01))
            .await
            .unwrap();
        assert_eq!(report.confirmed, 1);
        assert_eq!(store.status_of(1), Some(GatheringStatus::Confirmed));
    }

    #[tokio::test]
    async fn test_sweep_stuck_tiebreaks_isolates_failures() {
        let store = Arc::new(MemoryStore::default());
        seed(&store, 1, GatheringStatus::Tiebreak);
        seed(&store, 2, GatheringStatus::Tiebreak);
        seed(&store, 3, GatheringStatus::Tiebreak);
        store.fail_on(2);

        let report = scheduler(&store)
            .sweep_stuck_tiebreaks(datetime!(2026-01-11 12:01))
            .await
            .unwrap();
        assert_eq!(report.processed, 3);
        assert_eq!(report.confirmed, 2);
        assert_eq!(report.failed, 1);
        assert_eq!(store.status_of(1), Some(GatheringStatus::Confirmed));
        assert_eq!(store.status_of(2), Some(GatheringStatus::Tiebreak));
        assert_eq!(store.status_of(3), Some(GatheringStatus::Confirmed));
        assert!(store.result_of(2).is_none());
    }

    #[tokio::test]
    async fn test_sweep_stuck_tiebreaks_with_oversized_window() {
        let store = Arc::new(MemoryStore::default());
        seed(&store, 1, GatheringStatus::Tiebreak);
        let scheduler = DeadlineScheduler::new(
            ConfirmationOrchestrator::new(store.clone()),
            SchedulerConfig {
                interval: Duration::from_secs(60),
                tiebreak_window: time::Duration::hours(200_000_000),
            },
        );

        let report = scheduler
            .sweep_stuck_tiebreaks(datetime!(2026-01-11 12:01))
            .await
            .unwrap();
        assert_eq!(report, SweepReport::default());
        assert_eq!(store.status_of(1), Some(GatheringStatus::Tiebreak));
    }

    #[tokio::test(start_paused = true)]
    async fn test_run_sweeps_and_stops_on_shutdown() {
        let store = Arc::new(MemoryStore::default());
        // Fixture deadlines are in the past relative to the wall clock.
        seed(&store, 1, GatheringStatus::Voting);
        let (shutdown_tx, shutdown_rx) = watch::channel(false);

        let handle = tokio::spawn(scheduler(&store).run(shutdown_rx));
        tokio::time::sleep(Duration::from_secs(1)).await;
        assert_eq!(store.status_of(1), Some(GatheringStatus::Confirmed));

        shutdown_tx.send(true).unwrap();
        handle.await.unwrap();
    }
}
