//! Job DTOs sent to the backend

use serde::{Deserialize, Serialize};

use crate::domain::job::JobType;
use crate::domain::payload::JobPayload;

/// Request to submit a new job
///
/// Serializes to `{type, priority, thread_demand, payload}`. The backend
/// answers with the created job, echoing its assigned id.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JobSpec {
    #[serde(flatten)]
    pub payload: JobPayload,
    pub priority: i64,
    pub thread_demand: u32,
}

impl JobSpec {
    /// Creates a submission with the form defaults (priority 1, one thread)
    pub fn new(payload: JobPayload) -> Self {
        Self {
            payload,
            priority: 1,
            thread_demand: 1,
        }
    }

    pub fn with_priority(mut self, priority: i64) -> Self {
        self.priority = priority;
        self
    }

    pub fn with_thread_demand(mut self, thread_demand: u32) -> Self {
        self.thread_demand = thread_demand;
        self
    }

    pub fn kind(&self) -> JobType {
        self.payload.kind()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_job_spec_wire_shape() {
        let spec = JobSpec::new(JobPayload::AddNumbers { x: 3, y: 4 })
            .with_priority(5)
            .with_thread_demand(2);

        let value = serde_json::to_value(&spec).unwrap();
        assert_eq!(
            value,
            serde_json::json!({
                "type": "add_numbers",
                "payload": {"x": 3, "y": 4},
                "priority": 5,
                "thread_demand": 2
            })
        );
    }

    #[test]
    fn test_job_spec_defaults() {
        let spec = JobSpec::new(JobPayload::ReverseString {
            text: "abc".to_string(),
        });
        assert_eq!(spec.priority, 1);
        assert_eq!(spec.thread_demand, 1);
        assert_eq!(spec.kind(), JobType::ReverseString);
    }
}
