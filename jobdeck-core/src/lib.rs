//! Jobdeck Core
//!
//! Core types shared by the Jobdeck dashboard crates.
//!
//! This crate contains:
//! - Domain types: the job record as reported by the backend, its lifecycle
//!   states and the typed payload/result shapes keyed by job type
//! - DTOs: request bodies sent to the backend

pub mod domain;
pub mod dto;
