//! Typed payload and result shapes
//!
//! The backend carries payloads and results as free-form JSON whose shape
//! depends on the job type. These enums give each type its own shape.

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;

use crate::domain::job::JobType;

/// Input for a job, keyed by job type
///
/// Serialized adjacently tagged, which is the `{type, payload}` pair of the
/// submission body.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "payload", rename_all = "snake_case")]
pub enum JobPayload {
    AddNumbers {
        #[serde(alias = "X")]
        x: i64,
        #[serde(alias = "Y")]
        y: i64,
    },
    ReverseString {
        #[serde(alias = "Text")]
        text: String,
    },
    ResizeImage {
        #[serde(alias = "URL", alias = "Url")]
        url: String,
        #[serde(alias = "Width")]
        width: u32,
        #[serde(alias = "Height")]
        height: u32,
    },
    LargeArraySum {
        #[serde(alias = "Array")]
        array: Vec<i64>,
    },
}

impl JobPayload {
    /// The job type this payload belongs to
    pub fn kind(&self) -> JobType {
        match self {
            JobPayload::AddNumbers { .. } => JobType::AddNumbers,
            JobPayload::ReverseString { .. } => JobType::ReverseString,
            JobPayload::ResizeImage { .. } => JobType::ResizeImage,
            JobPayload::LargeArraySum { .. } => JobType::LargeArraySum,
        }
    }

    /// Starting values of the submission form for a job type
    pub fn default_for(kind: &JobType) -> Option<Self> {
        match kind {
            JobType::AddNumbers => Some(JobPayload::AddNumbers { x: 0, y: 0 }),
            JobType::ReverseString => Some(JobPayload::ReverseString {
                text: String::new(),
            }),
            JobType::ResizeImage => Some(JobPayload::ResizeImage {
                url: String::new(),
                width: 800,
                height: 600,
            }),
            JobType::LargeArraySum => Some(JobPayload::LargeArraySum {
                array: vec![1, 2, 3, 4, 5],
            }),
            JobType::Other(_) => None,
        }
    }

    /// Decode a raw payload value for the given job type
    pub fn from_parts(kind: &JobType, payload: JsonValue) -> Result<Self, serde_json::Error> {
        serde_json::from_value(serde_json::json!({
            "type": kind.as_str(),
            "payload": payload,
        }))
    }
}

/// Output of a finished job, interpreted by job type
#[derive(Debug, Clone, PartialEq)]
pub enum JobOutput {
    /// Integer sum (add_numbers, large_array_sum)
    Sum(i64),
    /// Transformed text (reverse_string)
    Text(String),
    /// Anything this build cannot interpret
    Raw(JsonValue),
}

impl JobOutput {
    pub fn from_parts(kind: &JobType, value: &JsonValue) -> Self {
        let interpreted = match kind {
            JobType::AddNumbers => value.as_i64().map(JobOutput::Sum),
            JobType::LargeArraySum => value
                .as_i64()
                .or_else(|| value.get("Sum").and_then(JsonValue::as_i64))
                .or_else(|| value.get("sum").and_then(JsonValue::as_i64))
                .map(JobOutput::Sum),
            JobType::ReverseString => value.as_str().map(|s| JobOutput::Text(s.to_string())),
            JobType::ResizeImage | JobType::Other(_) => None,
        };
        interpreted.unwrap_or_else(|| JobOutput::Raw(value.clone()))
    }
}

impl fmt::Display for JobOutput {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            JobOutput::Sum(sum) => write!(f, "{}", sum),
            JobOutput::Text(text) => f.write_str(text),
            JobOutput::Raw(value) => write!(f, "{}", value),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_payload_serializes_as_type_and_payload() {
        let payload = JobPayload::ResizeImage {
            url: "https://example.com/a.png".to_string(),
            width: 640,
            height: 480,
        };
        let value = serde_json::to_value(&payload).unwrap();
        assert_eq!(value["type"], "resize_image");
        assert_eq!(value["payload"]["width"], 640);
    }

    #[test]
    fn test_payload_accepts_capitalized_fields() {
        let payload = JobPayload::from_parts(&JobType::AddNumbers, json!({"X": 2, "Y": 5})).unwrap();
        assert_eq!(payload, JobPayload::AddNumbers { x: 2, y: 5 });
    }

    #[test]
    fn test_payload_rejects_wrong_shape() {
        assert!(JobPayload::from_parts(&JobType::ReverseString, json!({"x": 1})).is_err());
        assert!(JobPayload::from_parts(&JobType::Other("zip".into()), json!({})).is_err());
    }

    #[test]
    fn test_default_payloads() {
        for kind in JobType::KNOWN {
            let payload = JobPayload::default_for(&kind).unwrap();
            assert_eq!(payload.kind(), kind);
        }
        assert!(JobPayload::default_for(&JobType::Other("zip".into())).is_none());
    }

    #[test]
    fn test_output_interpretation() {
        assert_eq!(
            JobOutput::from_parts(&JobType::AddNumbers, &json!(9)),
            JobOutput::Sum(9)
        );
        assert_eq!(
            JobOutput::from_parts(&JobType::LargeArraySum, &json!({"Sum": 15})),
            JobOutput::Sum(15)
        );
        assert_eq!(
            JobOutput::from_parts(&JobType::ReverseString, &json!("cba")),
            JobOutput::Text("cba".to_string())
        );
        assert_eq!(
            JobOutput::from_parts(&JobType::ResizeImage, &json!({"ok": true})).to_string(),
            "{\"ok\":true}"
        );
    }
}
