//! Dashboard event loop
//!
//! Multiplexes operator input, refreshed job and analytics snapshots, and the
//! search debounce deadline on one task. View state only ever changes here.

use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, Result};
use chrono::Utc;
use jobdeck_client::JobSource;
use jobdeck_dashboard::{
    DashboardConfig, DashboardSession, JobsSnapshot, RefreshHandle, RefreshScheduler,
    StatsSnapshot, submit_job,
};
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::time::{Instant, sleep_until};
use tracing::{debug, info};

use crate::commands::Command;
use crate::render::{self, Output};

/// What the loop should do after handling an input line
#[derive(Debug, PartialEq)]
enum Flow {
    Redraw,
    Quit,
}

pub struct App {
    config: DashboardConfig,
    source: Arc<dyn JobSource>,
    session: DashboardSession,
    analytics: StatsSnapshot,
    refresh: RefreshHandle,
    /// Shown under the table until the next command
    output: Option<Output>,
}

impl App {
    /// Mount the dashboard and start refreshing
    pub fn new(config: DashboardConfig, source: Arc<dyn JobSource>) -> Self {
        let refresh = RefreshScheduler::spawn(Arc::clone(&source), &config);
        let session = DashboardSession::new(&config);

        Self {
            config,
            source,
            session,
            analytics: StatsSnapshot::default(),
            refresh,
            output: None,
        }
    }

    /// Run until the operator quits or stdin closes
    pub async fn run(mut self) -> Result<()> {
        let mut jobs_rx = self.refresh.jobs();
        let mut stats_rx = self.refresh.stats();
        let mut lines = BufReader::new(tokio::io::stdin()).lines();

        self.output = Some(Output::Help);
        self.draw();

        loop {
            let deadline = self.session.state().next_deadline();

            tokio::select! {
                line = lines.next_line() => {
                    let Some(line) = line.context("Failed to read input")? else {
                        debug!("Input closed");
                        break;
                    };
                    if line.trim().is_empty() {
                        continue;
                    }
                    match self.handle_line(&line).await {
                        Flow::Quit => break,
                        Flow::Redraw => self.draw(),
                    }
                }
                changed = jobs_rx.changed() => {
                    if changed.is_err() {
                        break;
                    }
                    let snapshot = jobs_rx.borrow_and_update().clone();
                    self.apply_jobs(snapshot);
                    self.draw();
                }
                changed = stats_rx.changed() => {
                    if changed.is_err() {
                        break;
                    }
                    self.analytics = stats_rx.borrow_and_update().clone();
                    self.draw();
                }
                _ = sleep_until(deadline.map(Instant::from_std).unwrap_or_else(Instant::now)), if deadline.is_some() => {
                    if self.session.state_mut().settle(std::time::Instant::now()) {
                        self.draw();
                    }
                }
            }
        }

        info!("Shutting down");
        self.refresh.shutdown().await;
        Ok(())
    }

    fn draw(&self) {
        render::draw(
            &self.session,
            &self.analytics,
            &self.config.api_url,
            self.output.as_ref(),
        );
    }

    /// Swap in refreshed jobs; the last command's output stays
    fn apply_jobs(&mut self, snapshot: JobsSnapshot) {
        self.session.apply_snapshot(snapshot);
    }

    /// Run one operator command, replacing the previous command's output
    async fn handle_line(&mut self, line: &str) -> Flow {
        self.output = None;
        match line.parse::<Command>() {
            Ok(command) => self.execute(command).await,
            Err(e) => {
                self.output = Some(Output::Error(e));
                Flow::Redraw
            }
        }
    }

    async fn execute(&mut self, command: Command) -> Flow {
        match command {
            Command::Search(text) => {
                self.session.state_mut().set_search_input(text, std::time::Instant::now());
                Flow::Redraw
            }
            Command::Filter(filter) => {
                self.session.state_mut().set_status_filter(filter);
                Flow::Redraw
            }
            Command::Sort(column) => {
                self.session.state_mut().sort_by(column);
                Flow::Redraw
            }
            Command::Page(page) => {
                self.session.state_mut().set_page(page);
                self.session.normalize_page();
                Flow::Redraw
            }
            Command::Next => {
                self.session.state_mut().next_page();
                self.session.normalize_page();
                Flow::Redraw
            }
            Command::Prev => {
                self.session.state_mut().prev_page();
                Flow::Redraw
            }
            Command::Size(size) => {
                self.session.state_mut().set_page_size(size);
                Flow::Redraw
            }
            Command::Expand(id) => {
                if self.session.render().is_virtualized() {
                    self.output = Some(Output::Notice(
                        "Row details are not available in virtualized mode".to_string(),
                    ));
                } else {
                    self.session.state_mut().toggle_expanded(&id);
                }
                Flow::Redraw
            }
            Command::Compact => {
                self.session.state_mut().toggle_compact();
                Flow::Redraw
            }
            Command::Scroll(offset) => {
                if self.session.render().is_virtualized() {
                    self.session.state_mut().scroll_to(offset);
                } else {
                    self.output = Some(Output::Notice(
                        "Scrolling only applies to the virtualized table".to_string(),
                    ));
                }
                Flow::Redraw
            }
            Command::Copy(id) => {
                self.output = Some(self.copy_id(&id));
                Flow::Redraw
            }
            Command::Show(id) => {
                self.output = Some(match self.source.fetch_job(&id).await {
                    Ok(job) => Output::Details(Box::new(job)),
                    Err(e) => Output::Error(format!("Failed to fetch job {}: {}", id, e)),
                });
                Flow::Redraw
            }
            Command::Submit(form) => {
                self.output = Some(match submit_job(self.source.as_ref(), form).await {
                    Ok(job) => {
                        self.refresh.refresh_now();
                        Output::Success(format!("Submitted {} job {}", job.kind, job.id))
                    }
                    Err(e) => Output::Error(e.to_string()),
                });
                Flow::Redraw
            }
            Command::Window(window) => {
                self.refresh.set_completion_window(window);
                self.output = Some(Output::Notice(format!(
                    "Average completion window set to {} minute(s)",
                    window.as_secs() / 60
                )));
                Flow::Redraw
            }
            Command::Export(dir) => {
                let dir = dir.unwrap_or_else(|| Path::new(".").to_path_buf());
                self.output = Some(match self.session.export(&dir, Utc::now()) {
                    Ok(path) => Output::Success(format!("Exported to {}", path.display())),
                    Err(e) => Output::Error(e.to_string()),
                });
                Flow::Redraw
            }
            Command::Refresh => {
                self.refresh.refresh_now();
                Flow::Redraw
            }
            Command::Help => {
                self.output = Some(Output::Help);
                Flow::Redraw
            }
            Command::Quit => Flow::Quit,
        }
    }

    /// A row's id on its own line for the terminal's selection
    fn copy_id(&self, id: &str) -> Output {
        let view = self.session.render();
        if !view.allows_copy() {
            Output::Notice("Copy is not available in virtualized mode".to_string())
        } else if view.rows().iter().any(|job| job.id == id) {
            Output::Text(id.to_string())
        } else {
            Output::Error(format!("Job {} is not on the current page", id))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use jobdeck_client::TransportError;
    use jobdeck_core::domain::job::{Job, JobStatus, JobType};
    use jobdeck_core::dto::job::JobSpec;
    use std::time::Duration;

    fn job(id: &str) -> Job {
        Job {
            id: id.to_string(),
            kind: JobType::AddNumbers,
            status: JobStatus::Running,
            priority: 1,
            thread_demand: 1,
            payload: None,
            result: None,
            created_at: "2025-03-01T10:00:00Z".parse().unwrap(),
            started_at: None,
            completed_at: None,
        }
    }

    /// Backend that lists one job and rejects every submission
    struct RejectingSource;

    #[async_trait]
    impl JobSource for RejectingSource {
        async fn fetch_live_jobs(&self) -> jobdeck_client::Result<Vec<Job>> {
            Ok(vec![job("job-1")])
        }

        async fn fetch_historical_jobs(&self) -> jobdeck_client::Result<Vec<Job>> {
            Ok(Vec::new())
        }

        async fn fetch_job(&self, id: &str) -> jobdeck_client::Result<Job> {
            Ok(job(id))
        }

        async fn submit_job(&self, _spec: &JobSpec) -> jobdeck_client::Result<Job> {
            Err(TransportError::api_error(400, "Bad Request: priority"))
        }
    }

    fn app() -> App {
        App::new(DashboardConfig::default(), Arc::new(RejectingSource))
    }

    #[tokio::test]
    async fn test_submission_error_survives_refresh() {
        let mut app = app();

        assert_eq!(app.handle_line("submit add_numbers 3").await, Flow::Redraw);
        let Some(Output::Error(message)) = app.output.clone() else {
            panic!("expected an error, got {:?}", app.output);
        };
        assert!(message.contains("400"));

        app.apply_jobs(JobsSnapshot::succeeded(
            vec![job("job-1")],
            Utc::now(),
            Duration::from_secs(3600),
        ));
        assert_eq!(app.output, Some(Output::Error(message)));

        app.handle_line("refresh").await;
        assert_eq!(app.output, None);
    }

    #[tokio::test]
    async fn test_next_command_replaces_output() {
        let mut app = app();

        app.handle_line("launch").await;
        assert!(matches!(&app.output, Some(Output::Error(e)) if e.contains("unknown command")));

        app.handle_line("show job-7").await;
        assert!(matches!(&app.output, Some(Output::Details(job)) if job.id == "job-7"));

        app.apply_jobs(JobsSnapshot::succeeded(
            vec![job("job-1")],
            Utc::now(),
            Duration::from_secs(3600),
        ));
        app.handle_line("copy job-1").await;
        assert_eq!(app.output, Some(Output::Text("job-1".to_string())));

        assert_eq!(app.handle_line("quit").await, Flow::Quit);
    }
}
