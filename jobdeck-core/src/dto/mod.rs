//! Data Transfer Objects
//!
//! Request bodies sent from the dashboard to the backend.

pub mod job;
