//! Error types for the dashboard engine

use std::fmt;

use jobdeck_client::TransportError;
use thiserror::Error;

/// Result type alias for dashboard operations
pub type Result<T> = std::result::Result<T, DashboardError>;

/// Which backend collection a fetch targeted
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceKind {
    Live,
    Historical,
}

impl fmt::Display for SourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SourceKind::Live => f.write_str("live"),
            SourceKind::Historical => f.write_str("historical"),
        }
    }
}

/// A reconciliation cycle failed because one of its fetches failed
///
/// No partial merge is ever produced alongside this error.
#[derive(Debug, Error)]
#[error("failed to fetch {source_kind} jobs: {source}")]
pub struct ReconciliationError {
    pub source_kind: SourceKind,
    #[source]
    pub source: TransportError,
}

impl ReconciliationError {
    pub fn new(source_kind: SourceKind, source: TransportError) -> Self {
        Self {
            source_kind,
            source,
        }
    }
}

/// Errors surfaced by the dashboard engine
#[derive(Debug, Error)]
pub enum DashboardError {
    #[error(transparent)]
    Reconciliation(#[from] ReconciliationError),

    #[error("Job submission failed: {0}")]
    Submission(#[source] TransportError),

    /// Submission input that does not decode into a typed payload
    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("Export failed: {0}")]
    Export(#[from] std::io::Error),

    #[error("Invalid configuration: {0}")]
    Config(String),
}
