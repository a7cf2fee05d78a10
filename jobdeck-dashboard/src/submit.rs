//! Job submission
//!
//! A passthrough: whatever the operator enters is sent as-is once it decodes
//! into the payload shape of the chosen job type. No range checks are
//! applied; the backend is the authority on what it accepts.

use jobdeck_client::JobSource;
use jobdeck_core::domain::job::{Job, JobType};
use jobdeck_core::domain::payload::JobPayload;
use jobdeck_core::dto::job::JobSpec;
use serde_json::Value as JsonValue;
use tracing::info;

use crate::error::{DashboardError, Result};

/// Values entered in the submission form
#[derive(Debug, Clone, PartialEq)]
pub struct JobForm {
    pub kind: JobType,
    pub priority: i64,
    pub thread_demand: u32,
    /// Raw payload; `None` submits the form's default payload for `kind`
    pub payload: Option<JsonValue>,
}

impl JobForm {
    pub fn new(kind: JobType) -> Self {
        Self {
            kind,
            priority: 1,
            thread_demand: 1,
            payload: None,
        }
    }

    /// Decode the form into a submission request
    pub fn into_spec(self) -> Result<JobSpec> {
        let payload = match self.payload {
            Some(raw) => JobPayload::from_parts(&self.kind, raw).map_err(|e| {
                DashboardError::Validation(format!("payload for {}: {}", self.kind, e))
            })?,
            None => JobPayload::default_for(&self.kind).ok_or_else(|| {
                DashboardError::Validation(format!("unknown job type '{}'", self.kind))
            })?,
        };

        Ok(JobSpec::new(payload)
            .with_priority(self.priority)
            .with_thread_demand(self.thread_demand))
    }
}

/// Submit a job and return the created record
///
/// The caller only learns whether the backend accepted the job; the job
/// shows up in the table whenever the next refresh picks it up.
pub async fn submit_job(source: &dyn JobSource, form: JobForm) -> Result<Job> {
    let spec = form.into_spec()?;
    let job = source
        .submit_job(&spec)
        .await
        .map_err(DashboardError::Submission)?;

    info!("Submitted {} job {}", job.kind, job.id);
    Ok(job)
}
