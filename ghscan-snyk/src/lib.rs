//! ghscan-snyk library interface
//!
//! Bulk-imports dependency manifests found by the GitHub scanner into Snyk,
//! one repository per worker, and records the latest import status of every
//! (repository, file) pair in `snyk_imports`.

pub mod config;
pub mod db;
pub mod error;
pub mod models;
pub mod services;
pub mod workflow;

pub use crate::error::{ImporterError, ImporterResult};
pub use crate::workflow::Pipeline;
