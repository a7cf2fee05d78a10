//! Aggregate statistics over the reconciled job set

use std::time::Duration;

use chrono::{DateTime, Utc};
use jobdeck_core::domain::job::{Job, JobStatus};

/// Summary figures shown on the stat cards
#[derive(Debug, Clone, Default, PartialEq)]
pub struct JobStats {
    pub total: usize,
    pub pending: usize,
    pub running: usize,
    pub completed: usize,
    pub failed: usize,
    /// Sum of thread demand over every job
    pub total_thread_demand: u64,
    /// Sum of thread demand over running jobs only
    pub active_thread_demand: u64,
    /// Mean start-to-completion time of recently completed jobs, in milliseconds
    ///
    /// `None` when no completed job falls inside the window.
    pub average_completion_ms: Option<f64>,
}

impl JobStats {
    /// Compute statistics for a job set
    ///
    /// Only `Completed` jobs whose `completed_at` lies within `window` before
    /// `now` count toward the average; jobs with missing or inverted
    /// timestamps are left out of it.
    pub fn compute(jobs: &[Job], now: DateTime<Utc>, window: Duration) -> Self {
        let mut stats = JobStats {
            total: jobs.len(),
            ..Default::default()
        };

        let window = chrono::Duration::from_std(window).unwrap_or(chrono::Duration::MAX);
        let cutoff = now.checked_sub_signed(window).unwrap_or(DateTime::<Utc>::MIN_UTC);
        let mut completion_total_ms = 0f64;
        let mut completion_samples = 0usize;

        for job in jobs {
            stats.total_thread_demand += u64::from(job.thread_demand);

            match job.status {
                JobStatus::Pending => stats.pending += 1,
                JobStatus::Running => {
                    stats.running += 1;
                    stats.active_thread_demand += u64::from(job.thread_demand);
                }
                JobStatus::Completed => {
                    stats.completed += 1;
                    let in_window = job
                        .completed_at
                        .is_some_and(|done| done >= cutoff && done <= now);
                    if let (true, Some(duration)) = (in_window, job.duration()) {
                        completion_total_ms += duration.num_milliseconds() as f64;
                        completion_samples += 1;
                    }
                }
                JobStatus::Failed => stats.failed += 1,
            }
        }

        if completion_samples > 0 {
            stats.average_completion_ms = Some(completion_total_ms / completion_samples as f64);
        }

        stats
    }

    /// Number of jobs in a status
    pub fn count(&self, status: JobStatus) -> usize {
        match status {
            JobStatus::Pending => self.pending,
            JobStatus::Running => self.running,
            JobStatus::Completed => self.completed,
            JobStatus::Failed => self.failed,
        }
    }

    /// Jobs not yet finished (pending or running)
    pub fn in_flight(&self) -> usize {
        self.pending + self.running
    }

    /// Share of all jobs in a status, as a percentage
    ///
    /// The denominator is clamped to 1, so an empty set yields 0 rather than NaN.
    pub fn percentage(&self, status: JobStatus) -> f64 {
        self.count(status) as f64 * 100.0 / self.total.max(1) as f64
    }

    /// Completed share of finished jobs, as a percentage
    pub fn success_rate(&self) -> f64 {
        self.completed as f64 * 100.0 / (self.completed + self.failed).max(1) as f64
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use jobdeck_core::domain::job::JobType;

    fn now() -> DateTime<Utc> {
        "2025-03-01T12:00:00Z".parse().unwrap()
    }

    fn job(id: &str, status: JobStatus, thread_demand: u32) -> Job {
        Job {
            id: id.to_string(),
            kind: JobType::LargeArraySum,
            status,
            priority: 1,
            thread_demand,
            payload: None,
            result: None,
            created_at: now() - chrono::Duration::hours(2),
            started_at: None,
            completed_at: None,
        }
    }

    fn completed(id: &str, minutes_ago: i64, took_ms: i64) -> Job {
        let mut job = job(id, JobStatus::Completed, 1);
        let done = now() - chrono::Duration::minutes(minutes_ago);
        job.completed_at = Some(done);
        job.started_at = Some(done - chrono::Duration::milliseconds(took_ms));
        job
    }

    const HOUR: Duration = Duration::from_secs(3600);

    #[test]
    fn test_active_thread_demand_counts_running_only() {
        let jobs = vec![job("p", JobStatus::Pending, 4), job("r", JobStatus::Running, 2)];

        let stats = JobStats::compute(&jobs, now(), HOUR);

        assert_eq!(stats.active_thread_demand, 2);
        assert_eq!(stats.total_thread_demand, 6);
    }

    #[test]
    fn test_counts_per_status() {
        let jobs = vec![
            job("1", JobStatus::Pending, 1),
            job("2", JobStatus::Running, 1),
            job("3", JobStatus::Running, 1),
            job("4", JobStatus::Failed, 1),
            completed("5", 5, 100),
        ];

        let stats = JobStats::compute(&jobs, now(), HOUR);

        assert_eq!(stats.total, 5);
        assert_eq!(stats.pending, 1);
        assert_eq!(stats.running, 2);
        assert_eq!(stats.completed, 1);
        assert_eq!(stats.failed, 1);
        assert_eq!(stats.in_flight(), 3);
        assert_eq!(stats.percentage(JobStatus::Running), 40.0);
        assert_eq!(stats.success_rate(), 50.0);
    }

    #[test]
    fn test_average_completion_respects_window() {
        let jobs = vec![
            completed("recent-a", 10, 1_000),
            completed("recent-b", 20, 3_000),
            completed("old", 180, 60_000),
        ];

        let stats = JobStats::compute(&jobs, now(), HOUR);

        assert_eq!(stats.average_completion_ms, Some(2_000.0));
    }

    #[test]
    fn test_average_completion_skips_bad_timestamps() {
        let mut missing_start = completed("a", 5, 500);
        missing_start.started_at = None;
        let mut inverted = completed("b", 5, 500);
        inverted.started_at = inverted.completed_at.map(|t| t + chrono::Duration::seconds(5));
        let failed = {
            let mut j = completed("c", 5, 500);
            j.status = JobStatus::Failed;
            j
        };

        let stats = JobStats::compute(&[missing_start, inverted, failed], now(), HOUR);

        assert_eq!(stats.average_completion_ms, None);
    }

    #[test]
    fn test_empty_set_has_no_nan() {
        let stats = JobStats::compute(&[], now(), HOUR);

        assert_eq!(stats.total, 0);
        assert_eq!(stats.percentage(JobStatus::Completed), 0.0);
        assert_eq!(stats.success_rate(), 0.0);
        assert!(stats.average_completion_ms.is_none());
    }
}
