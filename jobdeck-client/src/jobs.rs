//! Job-related API endpoints

use jobdeck_core::domain::job::Job;
use jobdeck_core::dto::job::JobSpec;
use reqwest::header::ACCEPT;
use tracing::debug;

use crate::BackendClient;
use crate::error::Result;

impl BackendClient {
    // =============================================================================
    // Job Listing
    // =============================================================================

    /// List jobs held in the backend's live (in-memory) set
    ///
    /// # Returns
    /// The live jobs, in backend order
    pub async fn list_live_jobs(&self) -> Result<Vec<Job>> {
        let url = format!("{}/jobs", self.base_url);
        self.get_job_list(&url).await
    }

    /// List jobs from the backend's persisted archive
    ///
    /// # Returns
    /// The historical jobs, in backend order
    pub async fn list_historical_jobs(&self) -> Result<Vec<Job>> {
        let url = format!("{}/db/jobs", self.base_url);
        self.get_job_list(&url).await
    }

    /// Get a single job by ID
    ///
    /// # Arguments
    /// * `job_id` - The opaque job identifier
    ///
    /// # Returns
    /// The job, or a 404 [`TransportError::Api`](crate::TransportError::Api)
    pub async fn get_job(&self, job_id: &str) -> Result<Job> {
        let url = format!("{}/jobs/{}", self.base_url, job_id);
        debug!("GET {}", url);
        let response = self.client.get(&url).header(ACCEPT, "application/json").send().await?;

        self.handle_response(response).await
    }

    // =============================================================================
    // Job Submission
    // =============================================================================

    /// Submit a new job
    ///
    /// # Arguments
    /// * `spec` - Type, priority, thread demand and payload of the job
    ///
    /// # Returns
    /// The created job as echoed by the backend (assigned id, `Pending`)
    ///
    /// # Example
    /// ```no_run
    /// # use jobdeck_client::BackendClient;
    /// # use jobdeck_core::domain::payload::JobPayload;
    /// # use jobdeck_core::dto::job::JobSpec;
    /// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
    /// let client = BackendClient::new("http://localhost:8080");
    /// let job = client
    ///     .submit_job(&JobSpec::new(JobPayload::AddNumbers { x: 1, y: 2 }))
    ///     .await?;
    /// println!("submitted {}", job.id);
    /// # Ok(())
    /// # }
    /// ```
    pub async fn submit_job(&self, spec: &JobSpec) -> Result<Job> {
        let url = format!("{}/jobs", self.base_url);
        debug!("POST {} ({})", url, spec.kind());
        let response = self
            .client
            .post(&url)
            .header(ACCEPT, "application/json")
            .json(spec)
            .send()
            .await?;

        self.handle_response(response).await
    }

    /// Fetch a job list endpoint
    ///
    /// The backend encodes an empty archive as JSON `null`; that is an empty list.
    async fn get_job_list(&self, url: &str) -> Result<Vec<Job>> {
        debug!("GET {}", url);
        let response = self.client.get(url).header(ACCEPT, "application/json").send().await?;

        let jobs: Option<Vec<Job>> = self.handle_response(response).await?;
        let jobs = jobs.unwrap_or_default();
        debug!("GET {} returned {} job(s)", url, jobs.len());
        Ok(jobs)
    }
}
