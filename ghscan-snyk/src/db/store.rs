//! PostgreSQL-backed store shared by workers and the result writer

use super::{imports, repositories, scan_results, schema};
use super::{ImportRecordStore, RepositoryInventory, ScanResultSource};
use crate::models::{CandidateFile, ImportOutcome, ImportRecord, Repository};
use async_trait::async_trait;
use sqlx::PgPool;

/// All three store roles over one connection pool
///
/// Cloning is cheap; clones share the pool.
#[derive(Clone)]
pub struct PgImportStore {
    pool: PgPool,
}

impl PgImportStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    pub async fn ensure_schema(&self) -> sqlx::Result<()> {
        schema::ensure_schema(&self.pool).await
    }

    pub async fn load_import(
        &self,
        owner: &str,
        name: &str,
        file_path: &str,
    ) -> sqlx::Result<Option<ImportRecord>> {
        imports::load_import(&self.pool, owner, name, file_path).await
    }

    pub async fn count_imports(&self, owner: &str, name: &str) -> sqlx::Result<i64> {
        imports::count_imports(&self.pool, owner, name).await
    }
}

#[async_trait]
impl RepositoryInventory for PgImportStore {
    async fn active_repositories(&self) -> sqlx::Result<Vec<Repository>> {
        repositories::load_active_repositories(&self.pool).await
    }
}

#[async_trait]
impl ScanResultSource for PgImportStore {
    async fn candidate_files(&self, owner: &str, name: &str) -> sqlx::Result<Vec<CandidateFile>> {
        scan_results::load_candidate_files(&self.pool, owner, name).await
    }
}

#[async_trait]
impl ImportRecordStore for PgImportStore {
    async fn upsert_import(&self, outcome: &ImportOutcome) -> sqlx::Result<()> {
        imports::upsert_import(&self.pool, outcome).await
    }
}
