//! Dashboard configuration
//!
//! Refresh cadence, interaction timings and table geometry. Only the backend
//! address comes from the environment; everything else is a default that can
//! be overridden with the `with_*` builders.

use std::time::Duration;

use crate::error::{DashboardError, Result};

/// Environment variable holding the backend base address
pub const API_URL_ENV: &str = "JOBDECK_API_URL";

/// Default backend base address
pub const DEFAULT_API_URL: &str = "http://localhost:8080";

/// Dashboard configuration
#[derive(Debug, Clone)]
pub struct DashboardConfig {
    /// Backend base URL (e.g., "http://localhost:8080")
    pub api_url: String,

    /// How often the job table re-fetches and re-reconciles
    pub job_refresh_interval: Duration,

    /// How often the analytics aggregates are recomputed from a fresh fetch
    pub analytics_refresh_interval: Duration,

    /// Quiet period after the last keystroke before search text is applied
    pub search_debounce: Duration,

    /// Filtered result size above which the table switches to virtualized rendering
    pub virtualize_threshold: usize,

    /// Rows per page in paginated mode
    pub default_page_size: usize,

    /// Row height in normal mode, in pixels
    pub row_height: u32,

    /// Row height in compact mode, in pixels
    pub compact_row_height: u32,

    /// Height of the scrollable table area in virtualized mode, in pixels
    pub viewport_height: u32,

    /// Rows rendered above and below the visible window
    pub overscan: usize,

    /// Window of completions that count toward the average completion time
    pub completion_window: Duration,
}

impl DashboardConfig {
    /// Creates a new configuration with defaults
    pub fn new(api_url: impl Into<String>) -> Self {
        Self {
            api_url: api_url.into(),
            job_refresh_interval: Duration::from_secs(5),
            analytics_refresh_interval: Duration::from_secs(10),
            search_debounce: Duration::from_millis(300),
            virtualize_threshold: 200,
            default_page_size: 10,
            row_height: 48,
            compact_row_height: 32,
            viewport_height: 600,
            overscan: 2,
            completion_window: Duration::from_secs(60 * 60),
        }
    }

    pub fn with_job_refresh_interval(mut self, interval: Duration) -> Self {
        self.job_refresh_interval = interval;
        self
    }

    pub fn with_analytics_refresh_interval(mut self, interval: Duration) -> Self {
        self.analytics_refresh_interval = interval;
        self
    }

    pub fn with_completion_window(mut self, window: Duration) -> Self {
        self.completion_window = window;
        self
    }

    pub fn with_viewport_height(mut self, height: u32) -> Self {
        self.viewport_height = height;
        self
    }

    /// Validates the configuration
    pub fn validate(&self) -> Result<()> {
        if self.api_url.is_empty() {
            return Err(DashboardError::Config("api_url cannot be empty".into()));
        }

        if !self.api_url.starts_with("http://") && !self.api_url.starts_with("https://") {
            return Err(DashboardError::Config(
                "api_url must start with http:// or https://".into(),
            ));
        }

        if self.job_refresh_interval.is_zero() {
            return Err(DashboardError::Config(
                "job_refresh_interval must be greater than 0".into(),
            ));
        }

        if self.analytics_refresh_interval.is_zero() {
            return Err(DashboardError::Config(
                "analytics_refresh_interval must be greater than 0".into(),
            ));
        }

        if self.default_page_size == 0 {
            return Err(DashboardError::Config(
                "default_page_size must be greater than 0".into(),
            ));
        }

        if self.row_height == 0 || self.compact_row_height == 0 {
            return Err(DashboardError::Config(
                "row heights must be greater than 0".into(),
            ));
        }

        Ok(())
    }
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self::new(DEFAULT_API_URL)
    }
}
