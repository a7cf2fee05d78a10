//! Refresh scheduler
//!
//! Re-fetches and re-reconciles the job sources on two timers: one for the
//! job table and a slower one for the analytics figures. Each cycle publishes
//! a complete snapshot over a `watch` channel, replacing the previous one
//! wholesale. A failed cycle republishes the last good data with an error
//! attached instead of clearing the view.
//!
//! Cycles run one at a time on a single task. Ticks that come due while a
//! cycle is still in flight are skipped, not queued.

use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use jobdeck_client::JobSource;
use jobdeck_core::domain::job::Job;
use tokio::sync::{mpsc, watch};
use tokio::time::{self, MissedTickBehavior};
use tokio_util::task::AbortOnDropHandle;
use tracing::{debug, info, warn};

use crate::config::DashboardConfig;
use crate::error::ReconciliationError;
use crate::reconcile::reconcile;
use crate::stats::JobStats;

/// Job table data as of the last refresh cycle
#[derive(Debug, Clone, Default)]
pub struct JobsSnapshot {
    /// Reconciled job set, newest first
    pub jobs: Arc<Vec<Job>>,
    /// Aggregates recomputed alongside `jobs`
    pub stats: JobStats,
    /// When `jobs` was last replaced
    pub refreshed_at: Option<DateTime<Utc>>,
    /// Error from the most recent cycle, if it failed
    pub error: Option<String>,
    /// Whether any cycle has finished yet
    pub loaded: bool,
}

impl JobsSnapshot {
    /// Snapshot after a successful cycle
    pub fn succeeded(jobs: Vec<Job>, now: DateTime<Utc>, window: Duration) -> Self {
        let stats = JobStats::compute(&jobs, now, window);
        Self {
            jobs: Arc::new(jobs),
            stats,
            refreshed_at: Some(now),
            error: None,
            loaded: true,
        }
    }

    /// Snapshot after a failed cycle: same data, error flagged
    pub fn failed(&self, error: &ReconciliationError) -> Self {
        Self {
            jobs: Arc::clone(&self.jobs),
            stats: self.stats.clone(),
            refreshed_at: self.refreshed_at,
            error: Some(error.to_string()),
            loaded: true,
        }
    }

    pub fn is_loading(&self) -> bool {
        !self.loaded
    }
}

/// Analytics figures as of the last analytics cycle
#[derive(Debug, Clone, Default)]
pub struct StatsSnapshot {
    /// `None` until the first successful cycle
    pub stats: Option<JobStats>,
    pub refreshed_at: Option<DateTime<Utc>>,
    pub error: Option<String>,
}

impl StatsSnapshot {
    pub fn succeeded(jobs: &[Job], now: DateTime<Utc>, window: Duration) -> Self {
        Self {
            stats: Some(JobStats::compute(jobs, now, window)),
            refreshed_at: Some(now),
            error: None,
        }
    }

    pub fn failed(&self, error: &ReconciliationError) -> Self {
        Self {
            stats: self.stats.clone(),
            refreshed_at: self.refreshed_at,
            error: Some(error.to_string()),
        }
    }
}

/// Requests from the owning view to the scheduler task
#[derive(Debug)]
enum RefreshCommand {
    RefreshNow,
    SetCompletionWindow(Duration),
}

/// Background refresh loop for one dashboard view
pub struct RefreshScheduler {
    source: Arc<dyn JobSource>,
    job_interval: Duration,
    analytics_interval: Duration,
    completion_window: Duration,
    jobs_tx: watch::Sender<JobsSnapshot>,
    stats_tx: watch::Sender<StatsSnapshot>,
}

impl RefreshScheduler {
    /// Arm the timers and start refreshing
    ///
    /// The first job and analytics cycles run immediately. The returned handle
    /// owns the task: dropping it stops all refreshing.
    pub fn spawn(source: Arc<dyn JobSource>, config: &DashboardConfig) -> RefreshHandle {
        let (jobs_tx, jobs_rx) = watch::channel(JobsSnapshot::default());
        let (stats_tx, stats_rx) = watch::channel(StatsSnapshot::default());
        let (commands_tx, commands_rx) = mpsc::unbounded_channel();

        let scheduler = Self {
            source,
            job_interval: config.job_refresh_interval,
            analytics_interval: config.analytics_refresh_interval,
            completion_window: config.completion_window,
            jobs_tx,
            stats_tx,
        };

        info!(
            "Starting refresh scheduler (jobs: {:?}, analytics: {:?})",
            config.job_refresh_interval, config.analytics_refresh_interval
        );

        let task = AbortOnDropHandle::new(tokio::spawn(scheduler.run(commands_rx)));

        RefreshHandle {
            jobs: jobs_rx,
            stats: stats_rx,
            commands: commands_tx,
            task,
        }
    }

    async fn run(mut self, mut commands: mpsc::UnboundedReceiver<RefreshCommand>) {
        let mut job_ticker = time::interval(self.job_interval);
        job_ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
        let mut analytics_ticker = time::interval(self.analytics_interval);
        analytics_ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

        loop {
            tokio::select! {
                _ = job_ticker.tick() => self.refresh_jobs().await,
                _ = analytics_ticker.tick() => self.refresh_stats().await,
                command = commands.recv() => match command {
                    Some(RefreshCommand::RefreshNow) => {
                        self.refresh_jobs().await;
                        job_ticker.reset();
                    }
                    Some(RefreshCommand::SetCompletionWindow(window)) => {
                        debug!("Completion window set to {:?}", window);
                        self.completion_window = window;
                    }
                    None => break,
                },
            }

            if self.jobs_tx.is_closed() && self.stats_tx.is_closed() {
                break;
            }
        }

        info!("Refresh scheduler stopped");
    }

    /// One job table cycle
    async fn refresh_jobs(&mut self) {
        let result = reconcile(self.source.as_ref()).await;

        if self.jobs_tx.is_closed() {
            debug!("Job view is gone, discarding refresh result");
            return;
        }

        let next = match result {
            Ok(jobs) => {
                debug!("Job refresh produced {} job(s)", jobs.len());
                JobsSnapshot::succeeded(jobs, Utc::now(), self.completion_window)
            }
            Err(e) => {
                warn!("Job refresh failed, keeping last known jobs: {}", e);
                self.jobs_tx.borrow().failed(&e)
            }
        };

        self.jobs_tx.send_replace(next);
    }

    /// One analytics cycle
    async fn refresh_stats(&mut self) {
        let result = reconcile(self.source.as_ref()).await;

        if self.stats_tx.is_closed() {
            debug!("Analytics view is gone, discarding refresh result");
            return;
        }

        let next = match result {
            Ok(jobs) => StatsSnapshot::succeeded(&jobs, Utc::now(), self.completion_window),
            Err(e) => {
                warn!("Analytics refresh failed, keeping last figures: {}", e);
                self.stats_tx.borrow().failed(&e)
            }
        };

        self.stats_tx.send_replace(next);
    }
}

/// Owner's side of a running [`RefreshScheduler`]
///
/// Dropping the handle aborts the refresh task, including a cycle that is
/// still waiting on the network.
pub struct RefreshHandle {
    jobs: watch::Receiver<JobsSnapshot>,
    stats: watch::Receiver<StatsSnapshot>,
    commands: mpsc::UnboundedSender<RefreshCommand>,
    task: AbortOnDropHandle<()>,
}

impl RefreshHandle {
    /// Subscribe to job table snapshots
    pub fn jobs(&self) -> watch::Receiver<JobsSnapshot> {
        self.jobs.clone()
    }

    /// Subscribe to analytics snapshots
    pub fn stats(&self) -> watch::Receiver<StatsSnapshot> {
        self.stats.clone()
    }

    /// Latest job table snapshot
    pub fn latest_jobs(&self) -> JobsSnapshot {
        self.jobs.borrow().clone()
    }

    /// Latest analytics snapshot
    pub fn latest_stats(&self) -> StatsSnapshot {
        self.stats.borrow().clone()
    }

    /// Run a job table cycle now instead of waiting for the next tick
    pub fn refresh_now(&self) {
        if self.commands.send(RefreshCommand::RefreshNow).is_err() {
            debug!("Refresh requested after scheduler stopped");
        }
    }

    /// Change the window used for the average completion time
    pub fn set_completion_window(&self, window: Duration) {
        if self
            .commands
            .send(RefreshCommand::SetCompletionWindow(window))
            .is_err()
        {
            debug!("Window change requested after scheduler stopped");
        }
    }

    pub fn is_running(&self) -> bool {
        !self.task.is_finished()
    }

    /// Disarm the timers and wait for the task to finish
    pub async fn shutdown(self) {
        self.task.abort();
        match self.task.await {
            Err(e) if !e.is_cancelled() => warn!("Refresh task ended abnormally: {}", e),
            _ => info!("Refresh scheduler shut down"),
        }
    }
}
