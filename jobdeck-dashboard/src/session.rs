//! One operator's dashboard: view state plus the latest refreshed data
//!
//! Refreshes replace the data wholesale and never touch the view state, so
//! search text, filters, sort order and the current page survive every cycle.

use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use jobdeck_core::domain::job::Job;
use tracing::debug;

use crate::config::DashboardConfig;
use crate::error::Result;
use crate::refresh::JobsSnapshot;
use crate::view::{RenderMode, TableView, ViewState, export, project};

#[derive(Debug, Clone)]
pub struct DashboardSession {
    state: ViewState,
    snapshot: JobsSnapshot,
}

impl DashboardSession {
    pub fn new(config: &DashboardConfig) -> Self {
        Self {
            state: ViewState::new(config),
            snapshot: JobsSnapshot::default(),
        }
    }

    pub fn state(&self) -> &ViewState {
        &self.state
    }

    pub fn state_mut(&mut self) -> &mut ViewState {
        &mut self.state
    }

    pub fn snapshot(&self) -> &JobsSnapshot {
        &self.snapshot
    }

    /// Swap in freshly refreshed data
    pub fn apply_snapshot(&mut self, snapshot: JobsSnapshot) {
        debug!(
            "Applying snapshot with {} job(s), error: {}",
            snapshot.jobs.len(),
            snapshot.error.is_some()
        );
        self.snapshot = snapshot;
        self.normalize_page();
    }

    /// Filter, sort and window the current data
    pub fn render(&self) -> TableView<'_> {
        project(&self.snapshot.jobs, &self.state)
    }

    /// Pull the page back into range after the match count shrank
    pub fn normalize_page(&mut self) {
        let total_pages = match self.render().mode {
            RenderMode::Paginated(page) => page.total_pages,
            RenderMode::Virtualized(_) => return,
        };
        self.state.clamp_page(total_pages);
    }

    /// Write every job matching the current filter and search to `dir`
    ///
    /// Exports the full sorted match list, not just the visible page.
    pub fn export(&self, dir: &Path, now: DateTime<Utc>) -> Result<PathBuf> {
        let view = self.render();
        export::write_csv(dir, view.matches.iter().copied(), now)
    }

    /// Look up a job in the current data by id
    pub fn job(&self, id: &str) -> Option<&Job> {
        self.snapshot.jobs.iter().find(|job| job.id == id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::view::{SortColumn, StatusFilter};
    use chrono::Duration as ChronoDuration;
    use jobdeck_core::domain::job::{JobStatus, JobType};
    use std::time::{Duration, Instant};

    fn jobs(count: usize, status: JobStatus) -> Vec<Job> {
        let base: DateTime<Utc> = "2025-03-01T10:00:00Z".parse().unwrap();
        (0..count)
            .map(|i| Job {
                id: format!("job-{i}"),
                kind: JobType::AddNumbers,
                status,
                priority: i as i64,
                thread_demand: 1,
                payload: None,
                result: None,
                created_at: base + ChronoDuration::seconds(i as i64),
                started_at: None,
                completed_at: None,
            })
            .collect()
    }

    fn snapshot(jobs: Vec<Job>) -> JobsSnapshot {
        JobsSnapshot::succeeded(jobs, Utc::now(), Duration::from_secs(3600))
    }

    #[test]
    fn test_view_state_survives_refresh() {
        let config = DashboardConfig::default();
        let mut session = DashboardSession::new(&config);
        session.apply_snapshot(snapshot(jobs(30, JobStatus::Running)));

        session.state_mut().set_status_filter(StatusFilter::Only(JobStatus::Running));
        session.state_mut().sort_by(SortColumn::Priority);
        session.state_mut().set_search_input("job", Instant::now());
        session.state_mut().flush_search();
        session.state_mut().set_page(2);

        session.apply_snapshot(snapshot(jobs(30, JobStatus::Running)));

        assert_eq!(session.state().page(), 2);
        assert_eq!(session.state().search(), "job");
        assert_eq!(session.state().sort().0, SortColumn::Priority);
        assert_eq!(
            session.state().status_filter(),
            StatusFilter::Only(JobStatus::Running)
        );
        assert_eq!(session.render().rows()[0].id, "job-10");
    }

    #[test]
    fn test_page_clamped_when_data_shrinks() {
        let config = DashboardConfig::default();
        let mut session = DashboardSession::new(&config);
        session.apply_snapshot(snapshot(jobs(25, JobStatus::Pending)));
        session.state_mut().set_page(3);

        session.apply_snapshot(snapshot(jobs(12, JobStatus::Pending)));

        assert_eq!(session.state().page(), 2);
        assert_eq!(session.render().rows().len(), 2);
    }

    #[test]
    fn test_export_writes_all_filtered_matches_in_view_order() {
        let config = DashboardConfig::default();
        let mut session = DashboardSession::new(&config);
        let mixed: Vec<Job> = jobs(25, JobStatus::Completed)
            .into_iter()
            .enumerate()
            .map(|(i, mut job)| {
                if i % 2 == 0 {
                    job.status = JobStatus::Failed;
                }
                job
            })
            .collect();
        session.apply_snapshot(snapshot(mixed));

        session.state_mut().set_status_filter(StatusFilter::Only(JobStatus::Failed));
        session.state_mut().sort_by(SortColumn::Priority);
        session.state_mut().sort_by(SortColumn::Priority);
        session.state_mut().set_page(2);
        assert_eq!(session.render().rows().len(), 3);

        let dir = std::env::temp_dir().join(format!("jobdeck-session-export-{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        let path = session.export(&dir, Utc::now()).unwrap();
        let written = std::fs::read_to_string(&path).unwrap();
        std::fs::remove_dir_all(&dir).unwrap();

        let lines: Vec<&str> = written.lines().collect();
        assert!(lines[0].starts_with("\"id\",\"type\",\"status\""));
        let ids: Vec<String> = lines[1..]
            .iter()
            .map(|line| line.split(',').next().unwrap().trim_matches('"').to_string())
            .collect();
        let expected: Vec<String> = (0..25).rev().step_by(2).map(|i| format!("job-{i}")).collect();
        assert_eq!(ids, expected);
        assert!(lines[1..].iter().all(|line| line.contains("\"Failed\"")));
    }

    #[test]
    fn test_job_lookup() {
        let config = DashboardConfig::default();
        let mut session = DashboardSession::new(&config);
        session.apply_snapshot(snapshot(jobs(3, JobStatus::Failed)));

        assert!(session.job("job-1").is_some());
        assert!(session.job("missing").is_none());
    }
}
