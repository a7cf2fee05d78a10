//! Core domain types
//!
//! These types describe jobs exactly as the backend reports them. The live
//! source and the historical source share the same shape, which is what lets
//! the dashboard merge them by id.

pub mod job;
pub mod payload;
