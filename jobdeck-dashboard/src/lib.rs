//! Jobdeck Dashboard Engine
//!
//! The client-side half of the job dashboard:
//!
//! - [`reconcile`]: merges the live and historical job lists into one set,
//!   newest first, live records winning on id collisions
//! - [`stats`]: counts, thread demand and average completion time
//! - [`view`]: status filter, debounced search, sorting, pagination,
//!   virtualized rendering and CSV export
//! - [`refresh`]: timers that keep the job table and analytics up to date
//! - [`session`]: one operator's view state bound to the latest data
//! - [`submit`]: the job submission form
//!
//! Everything talks to the backend through [`jobdeck_client::JobSource`].

pub mod config;
pub mod error;
pub mod reconcile;
pub mod refresh;
pub mod session;
pub mod stats;
pub mod submit;
pub mod view;

pub use config::DashboardConfig;
pub use error::{DashboardError, ReconciliationError, Result, SourceKind};
pub use refresh::{JobsSnapshot, RefreshHandle, RefreshScheduler, StatsSnapshot};
pub use session::DashboardSession;
pub use stats::JobStats;
pub use submit::{JobForm, submit_job};
