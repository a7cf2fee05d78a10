//! CSV export of the filtered job list

use std::path::{Path, PathBuf};

use chrono::{DateTime, SecondsFormat, Utc};
use jobdeck_core::domain::job::Job;
use tracing::info;

use crate::error::Result;

/// Column order of the export
pub const EXPORT_COLUMNS: [&str; 8] = [
    "id",
    "type",
    "status",
    "priority",
    "thread_demand",
    "created_at",
    "started_at",
    "completed_at",
];

/// Quote a field, doubling any quotes inside it
fn quote(field: &str) -> String {
    format!("\"{}\"", field.replace('"', "\"\""))
}

fn timestamp(ts: Option<DateTime<Utc>>) -> String {
    ts.map(|ts| ts.to_rfc3339_opts(SecondsFormat::Secs, true))
        .unwrap_or_default()
}

fn push_row<'f>(output: &mut String, fields: impl IntoIterator<Item = &'f str>) {
    let row: Vec<String> = fields.into_iter().map(quote).collect();
    output.push_str(&row.join(","));
    output.push('\n');
}

/// Serialize jobs as CSV: a header row, then one fully quoted row per job
pub fn to_csv<'a>(jobs: impl IntoIterator<Item = &'a Job>) -> String {
    let mut output = String::new();
    push_row(&mut output, EXPORT_COLUMNS);

    for job in jobs {
        let priority = job.priority.to_string();
        let thread_demand = job.thread_demand.to_string();
        let created_at = timestamp(Some(job.created_at));
        let started_at = timestamp(job.started_at);
        let completed_at = timestamp(job.completed_at);

        push_row(
            &mut output,
            [
                job.id.as_str(),
                job.kind.as_str(),
                job.status.as_str(),
                priority.as_str(),
                thread_demand.as_str(),
                created_at.as_str(),
                started_at.as_str(),
                completed_at.as_str(),
            ],
        );
    }

    output
}

/// Download file name, stamped with the export time
pub fn export_file_name(now: DateTime<Utc>) -> String {
    format!("jobs-export-{}.csv", now.format("%Y%m%d-%H%M%S"))
}

/// Write the export into `dir` and return the file's path
pub fn write_csv<'a>(
    dir: &Path,
    jobs: impl IntoIterator<Item = &'a Job>,
    now: DateTime<Utc>,
) -> Result<PathBuf> {
    let path = dir.join(export_file_name(now));
    let csv = to_csv(jobs);
    std::fs::write(&path, &csv)?;

    info!("Exported {} byte(s) to {}", csv.len(), path.display());
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use jobdeck_core::domain::job::{JobStatus, JobType};

    fn job(id: &str, kind: JobType) -> Job {
        Job {
            id: id.to_string(),
            kind,
            status: JobStatus::Completed,
            priority: 2,
            thread_demand: 4,
            payload: None,
            result: None,
            created_at: "2025-03-01T10:00:00Z".parse().unwrap(),
            started_at: Some("2025-03-01T10:00:01Z".parse().unwrap()),
            completed_at: None,
        }
    }

    #[test]
    fn test_header_and_row_layout() {
        let csv = to_csv(&[job("a1", JobType::AddNumbers)]);
        let lines: Vec<&str> = csv.lines().collect();

        assert_eq!(
            lines[0],
            "\"id\",\"type\",\"status\",\"priority\",\"thread_demand\",\"created_at\",\"started_at\",\"completed_at\""
        );
        assert_eq!(
            lines[1],
            "\"a1\",\"add_numbers\",\"Completed\",\"2\",\"4\",\"2025-03-01T10:00:00Z\",\"2025-03-01T10:00:01Z\",\"\""
        );
        assert_eq!(lines.len(), 2);
    }

    #[test]
    fn test_quotes_are_doubled() {
        let jobs = vec![
            job("q1", JobType::Other("say \"hi\"".to_string())),
            job("q2", JobType::Other("\"quoted\"".to_string())),
        ];

        let csv = to_csv(&jobs);
        let lines: Vec<&str> = csv.lines().collect();

        assert!(lines[1].starts_with("\"q1\",\"say \"\"hi\"\"\","));
        assert!(lines[2].starts_with("\"q2\",\"\"\"quoted\"\"\","));
    }

    #[test]
    fn test_file_name_embeds_timestamp() {
        let now: DateTime<Utc> = "2025-03-01T09:05:07Z".parse().unwrap();
        assert_eq!(export_file_name(now), "jobs-export-20250301-090507.csv");
    }

    #[test]
    fn test_write_csv_creates_file() {
        let dir = std::env::temp_dir().join(format!("jobdeck-export-{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        let now: DateTime<Utc> = "2025-03-01T09:05:07Z".parse().unwrap();

        let path = write_csv(&dir, &[job("w1", JobType::ResizeImage)], now).unwrap();

        let written = std::fs::read_to_string(&path).unwrap();
        assert!(written.contains("\"w1\",\"resize_image\""));
        std::fs::remove_dir_all(&dir).unwrap();
    }
}
