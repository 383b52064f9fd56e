//! Store access for ghscan-snyk
//!
//! The scan database is an external collaborator. The pipeline sees it
//! through three narrow traits so that workers and the writer do not care
//! whether they talk to PostgreSQL or to an in-memory stand-in.

pub mod imports;
pub mod repositories;
pub mod scan_results;
pub mod schema;
pub mod store;

pub use store::PgImportStore;

use crate::models::{CandidateFile, ImportOutcome, Repository};
use async_trait::async_trait;

/// Read side: active repositories (`repositories WHERE active = true`)
#[async_trait]
pub trait RepositoryInventory: Send + Sync {
    async fn active_repositories(&self) -> sqlx::Result<Vec<Repository>>;
}

/// Read side: manifests found by the scanner for one repository
#[async_trait]
pub trait ScanResultSource: Send + Sync {
    async fn candidate_files(&self, owner: &str, name: &str) -> sqlx::Result<Vec<CandidateFile>>;
}

/// Write side: latest-status table keyed by (owner, name, file_path)
#[async_trait]
pub trait ImportRecordStore: Send + Sync {
    /// Insert, or overwrite `success`, `error_message` and `imported_at` of
    /// the existing record for the same key
    async fn upsert_import(&self, outcome: &ImportOutcome) -> sqlx::Result<()>;
}
