//! Data models for ghscan-snyk
//!
//! Repository snapshots and candidate files are read from the scan store.
//! Import outcomes flow from workers to the result writer. The run summary
//! aggregates both sides of the pipeline.

pub mod import_outcome;
pub mod repository;
pub mod run_summary;

pub use import_outcome::{ImportOutcome, ImportRecord};
pub use repository::{CandidateFile, Repository};
pub use run_summary::{RunSummary, WorkerReport};
