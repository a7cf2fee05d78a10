//! Terminal rendering of the dashboard

use chrono::{DateTime, Utc};
use colored::*;
use jobdeck_core::domain::job::{Job, JobStatus};
use jobdeck_dashboard::view::RenderMode;
use jobdeck_dashboard::{DashboardSession, JobStats, StatsSnapshot};

use crate::commands::HELP;

const RULE_WIDTH: usize = 96;

/// Colorize job status for display
pub fn colorize_status(status: JobStatus) -> ColoredString {
    paint_status(status, status.as_str().to_string())
}

fn paint_status(status: JobStatus, status_str: String) -> ColoredString {
    match status {
        JobStatus::Pending => status_str.yellow(),
        JobStatus::Running => status_str.cyan(),
        JobStatus::Completed => status_str.green(),
        JobStatus::Failed => status_str.red(),
    }
}

fn format_time(ts: Option<DateTime<Utc>>) -> String {
    ts.map(|ts| ts.format("%Y-%m-%d %H:%M:%S").to_string())
        .unwrap_or_else(|| "-".to_string())
}

/// Average completion time, or `N/A` when nothing completed in the window
pub fn format_average(average_ms: Option<f64>) -> String {
    match average_ms {
        None => "N/A".to_string(),
        Some(ms) if ms < 1000.0 => format!("{:.0}ms", ms),
        Some(ms) => format!("{:.2}s", ms / 1000.0),
    }
}

fn rule() {
    println!("{}", "─".repeat(RULE_WIDTH).dimmed());
}

/// Result of the operator's last command
///
/// Kept across redraws so a refresh does not wipe it off the screen.
#[derive(Debug, Clone, PartialEq)]
pub enum Output {
    /// Red blocking alert
    Error(String),
    Success(String),
    Notice(String),
    /// Plain text on its own line
    Text(String),
    Details(Box<Job>),
    Help,
}

impl Output {
    pub fn print(&self) {
        match self {
            Output::Error(message) => println!("{} {}", "✗".red().bold(), message.red()),
            Output::Success(message) => println!("{} {}", "✓".green().bold(), message),
            Output::Notice(message) => println!("{}", message.yellow()),
            Output::Text(text) => println!("{}", text),
            Output::Details(job) => print_job_details(job),
            Output::Help => print_help(),
        }
    }
}

/// Redraw the whole dashboard, then the last command's output
pub fn draw(
    session: &DashboardSession,
    analytics: &StatsSnapshot,
    api_url: &str,
    output: Option<&Output>,
) {
    draw_dashboard(session, analytics, api_url);

    if let Some(output) = output {
        rule();
        output.print();
    }
}

fn draw_dashboard(session: &DashboardSession, analytics: &StatsSnapshot, api_url: &str) {
    // Clear screen and home the cursor
    print!("\x1B[2J\x1B[H");

    println!(
        "{}  {}",
        "Jobdeck".bold(),
        format!("backend: {}", api_url).dimmed()
    );
    rule();
    draw_stats(analytics);
    rule();

    let snapshot = session.snapshot();
    if let Some(error) = &snapshot.error {
        println!("{} {}", "✗ Refresh failed:".red().bold(), error.red());
    }

    if snapshot.is_loading() {
        println!("{}", "Loading jobs...".yellow());
        return;
    }

    draw_table(session);

    if let Some(refreshed_at) = snapshot.refreshed_at {
        println!(
            "{}",
            format!("Last refreshed {}", refreshed_at.format("%H:%M:%S")).dimmed()
        );
    }
}

fn draw_stats(analytics: &StatsSnapshot) {
    let Some(stats) = &analytics.stats else {
        match &analytics.error {
            Some(error) => println!("{} {}", "Analytics unavailable:".red(), error),
            None => println!("{}", "Loading analytics...".yellow()),
        }
        return;
    };

    println!("{}", stat_cards(stats));

    if let Some(error) = &analytics.error {
        println!("{} {}", "Analytics refresh failed:".yellow(), error);
    }
}

fn stat_cards(stats: &JobStats) -> String {
    let per_status: Vec<String> = JobStatus::ALL
        .iter()
        .map(|&status| {
            format!(
                "{} {} ({:.1}%)",
                colorize_status(status),
                stats.count(status),
                stats.percentage(status)
            )
        })
        .collect();

    format!(
        "Total {}  {}\nThreads: {} active / {} total   Avg completion: {}   Success rate: {:.1}%",
        stats.total.to_string().bold(),
        per_status.join("  "),
        stats.active_thread_demand,
        stats.total_thread_demand,
        format_average(stats.average_completion_ms).bold(),
        stats.success_rate()
    )
}

fn draw_table(session: &DashboardSession) {
    let state = session.state();
    let view = session.render();

    let (column, direction) = state.sort();
    println!(
        "{}",
        format!(
            "filter: {}  search: '{}'  sort: {} {:?}",
            state.status_filter(),
            state.search(),
            column,
            direction
        )
        .dimmed()
    );
    if state.search_input() != state.search() {
        println!("{}", format!("(typing: '{}')", state.search_input()).dimmed());
    }

    if view.total_matches() == 0 {
        println!("{}", "No jobs found.".yellow());
        return;
    }

    println!(
        "{}",
        format!(
            "  {:<38} {:<16} {:<9} {:>8} {:>7}  {:<19}",
            "ID", "TYPE", "STATUS", "PRIORITY", "THREADS", "CREATED"
        )
        .bold()
    );

    for job in view.rows() {
        print_row(job, state.is_compact(), view.expanded().is_some_and(|e| e.id == job.id));
    }

    match &view.mode {
        RenderMode::Paginated(page) => println!(
            "{}",
            format!(
                "Page {} of {} ({} job(s), {} per page)",
                page.number,
                page.total_pages,
                view.total_matches(),
                page.size
            )
            .dimmed()
        ),
        RenderMode::Virtualized(window) => println!(
            "{}",
            format!(
                "Rows {}-{} of {} (scrolled {}px of {}px; expand and copy disabled)",
                window.start + 1,
                window.end,
                view.total_matches(),
                window.scroll_offset,
                window.content_height
            )
            .dimmed()
        ),
    }

    if let Some(job) = view.expanded() {
        println!();
        print_job_details(job);
    }
}

fn print_row(job: &Job, compact: bool, expanded: bool) {
    let marker = if expanded { "▾".cyan() } else { "▸".cyan() };
    println!(
        "{} {:<38} {:<16} {} {:>8} {:>7}  {}",
        marker,
        job.id,
        job.kind.as_str(),
        paint_status(job.status, format!("{:<9}", job.status.as_str())),
        job.priority,
        job.thread_demand,
        format_time(Some(job.created_at)).dimmed()
    );

    if !compact {
        let mut detail = format!(
            "started {}  completed {}",
            format_time(job.started_at),
            format_time(job.completed_at)
        );
        if let Some(result) = job.result_text() {
            detail.push_str(&format!("  result {}", result));
        }
        println!("  {}", detail.dimmed());
    }
}

/// Print detailed job information
fn print_job_details(job: &Job) {
    println!("{}", "Job Details:".bold());
    println!("  ID:          {}", job.id.cyan());
    println!("  Type:        {}", job.kind);
    println!("  Status:      {}", colorize_status(job.status));
    println!("  Priority:    {}", job.priority);
    println!("  Threads:     {}", job.thread_demand);
    println!("  Created:     {}", format_time(Some(job.created_at)));
    println!("  Started:     {}", format_time(job.started_at));
    println!("  Completed:   {}", format_time(job.completed_at));

    if let Some(duration) = job.duration() {
        println!("  Duration:    {}ms", duration.num_milliseconds());
    }

    match (job.typed_payload(), &job.payload) {
        (Some(Ok(typed)), _) => {
            println!("\n{}", "Payload:".bold());
            println!("  {:?}", typed);
        }
        (_, Some(raw)) => {
            println!("\n{}", "Payload:".bold());
            match serde_json::to_string_pretty(raw) {
                Ok(pretty) => println!("{}", pretty),
                Err(_) => println!("{:?}", raw),
            }
        }
        (_, None) => {}
    }

    if let Some(output) = job.typed_result() {
        println!("\n{}", "Result:".bold());
        println!("{}", output);
    }
}

fn print_help() {
    println!("{}", "Commands:".bold());
    for (usage, description) in HELP {
        println!("  {} {}", format!("{:<44}", usage).cyan(), description);
    }
}
