//! Periodic removal of expired short URLs.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::watch;
use tokio::time::{Instant, MissedTickBehavior};

use crate::application::services::UrlService;
use crate::domain::repositories::UrlRepository;

/// Sweep schedule.
#[derive(Debug, Clone, Copy)]
pub struct CleanupSchedule {
    /// Time between runs. The first run happens one interval after start.
    pub interval: Duration,
    /// Upper bound for a single run.
    pub timeout: Duration,
}

impl Default for CleanupSchedule {
    fn default() -> Self {
        Self {
            interval: Duration::from_secs(3600),
            timeout: Duration::from_secs(30),
        }
    }
}

/// Outcome of one sweep run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SweepOutcome {
    Deleted(u64),
    Failed,
    TimedOut,
}

/// Runs one bounded sweep and logs its outcome.
///
/// Failures are logged and reported, never retried within the run.
pub async fn sweep_once<R: UrlRepository>(
    service: &UrlService<R>,
    timeout: Duration,
) -> SweepOutcome {
    match tokio::time::timeout(timeout, service.cleanup_expired()).await {
        Ok(Ok(0)) => {
            tracing::debug!("cleanup found no expired urls");
            SweepOutcome::Deleted(0)
        }
        Ok(Ok(deleted)) => {
            tracing::info!(deleted, "cleanup completed");
            SweepOutcome::Deleted(deleted)
        }
        Ok(Err(e)) => {
            tracing::error!(error = %e, "cleanup failed");
            SweepOutcome::Failed
        }
        Err(_) => {
            tracing::error!(timeout_secs = timeout.as_secs(), "cleanup timed out");
            SweepOutcome::TimedOut
        }
    }
}

/// Sweeps expired records on a fixed interval until `shutdown` flips to `true`.
///
/// Shutdown is observed between ticks only. A run in progress is a single
/// delete statement and is allowed to finish.
pub async fn run_cleanup_worker<R: UrlRepository>(
    service: Arc<UrlService<R>>,
    schedule: CleanupSchedule,
    mut shutdown: watch::Receiver<bool>,
) {
    let mut ticker = tokio::time::interval_at(Instant::now() + schedule.interval, schedule.interval);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    tracing::info!(
        interval_secs = schedule.interval.as_secs(),
        "cleanup worker started"
    );

    loop {
        if *shutdown.borrow() {
            break;
        }

        tokio::select! {
            changed = shutdown.changed() => {
                if changed.is_err() || *shutdown.borrow() {
                    break;
                }
            }
            _ = ticker.tick() => {
                sweep_once(&service, schedule.timeout).await;
            }
        }
    }

    tracing::info!("cleanup worker stopped");
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::services::ShortenerSettings;
    use crate::domain::repositories::MockUrlRepository;
    use crate::error::AppError;
    use crate::utils::code_generator::CodeGenerator;

    fn service(repo: MockUrlRepository) -> Arc<UrlService<MockUrlRepository>> {
        Arc::new(UrlService::new(
            Arc::new(repo),
            CodeGenerator::with_os_random(7),
            ShortenerSettings {
                base_url: "http://localhost:3000".to_string(),
                default_ttl: None,
            },
        ))
    }

    fn hourly() -> CleanupSchedule {
        CleanupSchedule {
            interval: Duration::from_secs(3600),
            timeout: Duration::from_secs(30),
        }
    }

    #[tokio::test]
    async fn test_sweep_once_reports_count() {
        let mut repo = MockUrlRepository::new();
        repo.expect_delete_expired().times(1).returning(|_| Ok(5));

        let outcome = sweep_once(&service(repo), Duration::from_secs(1)).await;

        assert_eq!(outcome, SweepOutcome::Deleted(5));
    }

    #[tokio::test]
    async fn test_sweep_once_zero_is_not_failure() {
        let mut repo = MockUrlRepository::new();
        repo.expect_delete_expired().times(1).returning(|_| Ok(0));

        let outcome = sweep_once(&service(repo), Duration::from_secs(1)).await;

        assert_eq!(outcome, SweepOutcome::Deleted(0));
    }

    #[tokio::test]
    async fn test_sweep_once_reports_failure() {
        let mut repo = MockUrlRepository::new();
        repo.expect_delete_expired()
            .times(1)
            .returning(|_| Err(AppError::Unavailable));

        let outcome = sweep_once(&service(repo), Duration::from_secs(1)).await;

        assert_eq!(outcome, SweepOutcome::Failed);
    }

    #[tokio::test(start_paused = true)]
    async fn test_worker_runs_once_per_interval() {
        let mut repo = MockUrlRepository::new();
        repo.expect_delete_expired().times(3).returning(|_| Ok(1));

        let (tx, rx) = watch::channel(false);
        let handle = tokio::spawn(run_cleanup_worker(service(repo), hourly(), rx));

        tokio::time::sleep(Duration::from_secs(3 * 3600 + 60)).await;
        tx.send(true).unwrap();
        handle.await.unwrap();
    }

    #[tokio::test(start_paused = true)]
    async fn test_worker_survives_failed_runs() {
        let mut repo = MockUrlRepository::new();
        repo.expect_delete_expired()
            .times(2)
            .returning(|_| Err(AppError::Unavailable));

        let (tx, rx) = watch::channel(false);
        let handle = tokio::spawn(run_cleanup_worker(service(repo), hourly(), rx));

        tokio::time::sleep(Duration::from_secs(2 * 3600 + 60)).await;
        tx.send(true).unwrap();
        handle.await.unwrap();
    }

    #[tokio::test(start_paused = true)]
    async fn test_worker_stops_before_first_tick() {
        let mut repo = MockUrlRepository::new();
        repo.expect_delete_expired().times(0);

        let (tx, rx) = watch::channel(false);
        let handle = tokio::spawn(run_cleanup_worker(service(repo), hourly(), rx));

        tokio::time::sleep(Duration::from_secs(60)).await;
        tx.send(true).unwrap();
        handle.await.unwrap();
    }

    #[tokio::test(start_paused = true)]
    async fn test_worker_stops_when_sender_dropped() {
        let repo = MockUrlRepository::new();

        let (tx, rx) = watch::channel(false);
        let handle = tokio::spawn(run_cleanup_worker(service(repo), hourly(), rx));

        drop(tx);
        handle.await.unwrap();
    }
}
