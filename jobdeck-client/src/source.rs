//! Job source abstraction
//!
//! The dashboard only needs four calls from the backend. Putting them behind a
//! trait lets the reconciliation and refresh logic be driven by in-memory
//! sources in tests.

use async_trait::async_trait;
use jobdeck_core::domain::job::Job;
use jobdeck_core::dto::job::JobSpec;

use crate::BackendClient;
use crate::error::Result;

/// Where the dashboard gets its jobs from
#[async_trait]
pub trait JobSource: Send + Sync {
    /// Jobs in the backend's live set
    async fn fetch_live_jobs(&self) -> Result<Vec<Job>>;

    /// Jobs in the backend's persisted archive
    async fn fetch_historical_jobs(&self) -> Result<Vec<Job>>;

    /// A single job by id
    async fn fetch_job(&self, id: &str) -> Result<Job>;

    /// Submit a new job, returning the created record
    async fn submit_job(&self, spec: &JobSpec) -> Result<Job>;
}

#[async_trait]
impl JobSource for BackendClient {
    async fn fetch_live_jobs(&self) -> Result<Vec<Job>> {
        self.list_live_jobs().await
    }

    async fn fetch_historical_jobs(&self) -> Result<Vec<Job>> {
        self.list_historical_jobs().await
    }

    async fn fetch_job(&self, id: &str) -> Result<Job> {
        self.get_job(id).await
    }

    async fn submit_job(&self, spec: &JobSpec) -> Result<Job> {
        BackendClient::submit_job(self, spec).await
    }
}
