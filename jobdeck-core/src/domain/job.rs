//! Job domain types

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Datelike, Utc};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::Value as JsonValue;

use crate::domain::payload::{JobOutput, JobPayload};

/// Job record
///
/// Structure shared between the live source (in-memory, not yet archived)
/// and the historical source (persisted archive).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Job {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: JobType,
    pub status: JobStatus,
    #[serde(default)]
    pub priority: i64,
    #[serde(default = "default_thread_demand")]
    pub thread_demand: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub payload: Option<JsonValue>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub result: Option<JsonValue>,
    pub created_at: DateTime<Utc>,
    #[serde(
        default,
        deserialize_with = "zero_time_as_none",
        skip_serializing_if = "Option::is_none"
    )]
    pub started_at: Option<DateTime<Utc>>,
    #[serde(
        default,
        deserialize_with = "zero_time_as_none",
        skip_serializing_if = "Option::is_none"
    )]
    pub completed_at: Option<DateTime<Utc>>,
}

fn default_thread_demand() -> u32 {
    1
}

/// The backend encodes "never set" timestamps as `null` or as Go's zero time
/// (`0001-01-01T00:00:00Z`). Both mean absent.
fn zero_time_as_none<'de, D>(deserializer: D) -> Result<Option<DateTime<Utc>>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<DateTime<Utc>>::deserialize(deserializer)?;
    Ok(value.filter(|ts| ts.year() > 1))
}

impl Job {
    /// Wall time between start and completion
    ///
    /// Returns `None` when either timestamp is missing or when the backend
    /// reported them out of order.
    pub fn duration(&self) -> Option<chrono::Duration> {
        let started = self.started_at?;
        let completed = self.completed_at?;
        let duration = completed.signed_duration_since(started);
        (duration >= chrono::Duration::zero()).then_some(duration)
    }

    /// Interpret the opaque payload through the tagged union for this job's type
    ///
    /// Returns `None` when the backend did not echo a payload.
    pub fn typed_payload(&self) -> Option<Result<JobPayload, serde_json::Error>> {
        self.payload
            .as_ref()
            .map(|value| JobPayload::from_parts(&self.kind, value.clone()))
    }

    /// Interpret the opaque result for this job's type
    pub fn typed_result(&self) -> Option<JobOutput> {
        self.result
            .as_ref()
            .map(|value| JobOutput::from_parts(&self.kind, value))
    }

    /// The result serialized back to JSON text, as used by search
    pub fn result_text(&self) -> Option<String> {
        self.result.as_ref().map(|value| value.to_string())
    }
}

/// Job lifecycle status
///
/// Exactly these four states exist; any other value from the backend is a
/// decoding error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum JobStatus {
    Pending,
    Running,
    Completed,
    Failed,
}

impl JobStatus {
    pub const ALL: [JobStatus; 4] = [
        JobStatus::Pending,
        JobStatus::Running,
        JobStatus::Completed,
        JobStatus::Failed,
    ];

    /// Raw wire name
    pub fn as_str(&self) -> &'static str {
        match self {
            JobStatus::Pending => "Pending",
            JobStatus::Running => "Running",
            JobStatus::Completed => "Completed",
            JobStatus::Failed => "Failed",
        }
    }
}

impl fmt::Display for JobStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for JobStatus {
    type Err = String;

    /// Case-insensitive parse, for operator input
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        JobStatus::ALL
            .into_iter()
            .find(|status| status.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| format!("unknown job status '{}'", s))
    }
}

/// Kind of work a job performs
///
/// The backend uses snake_case names on the wire. Kinds this build does not
/// know about are kept verbatim so one unexpected job does not fail a whole
/// listing.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum JobType {
    AddNumbers,
    ReverseString,
    ResizeImage,
    LargeArraySum,
    Other(String),
}

impl JobType {
    pub const KNOWN: [JobType; 4] = [
        JobType::AddNumbers,
        JobType::ReverseString,
        JobType::ResizeImage,
        JobType::LargeArraySum,
    ];

    /// Raw wire name, used for display, sorting, search and export
    pub fn as_str(&self) -> &str {
        match self {
            JobType::AddNumbers => "add_numbers",
            JobType::ReverseString => "reverse_string",
            JobType::ResizeImage => "resize_image",
            JobType::LargeArraySum => "large_array_sum",
            JobType::Other(raw) => raw,
        }
    }

    /// Parse a wire name, accepting the PascalCase spelling as well
    pub fn from_wire(raw: &str) -> Self {
        match raw {
            "add_numbers" | "AddNumbers" => JobType::AddNumbers,
            "reverse_string" | "ReverseString" => JobType::ReverseString,
            "resize_image" | "ResizeImage" => JobType::ResizeImage,
            "large_array_sum" | "LargeArraySum" => JobType::LargeArraySum,
            other => JobType::Other(other.to_string()),
        }
    }

    pub fn is_known(&self) -> bool {
        !matches!(self, JobType::Other(_))
    }
}

impl fmt::Display for JobType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<&str> for JobType {
    fn from(raw: &str) -> Self {
        JobType::from_wire(raw)
    }
}

impl Serialize for JobType {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for JobType {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Ok(JobType::from_wire(&raw))
    }
}
