//! `snyk_imports` persistence
//!
//! Latest-status table: one row per (repo_owner, repo_name, file_path).
//! Re-running an import overwrites the status of the existing row.

use crate::models::{ImportOutcome, ImportRecord};
use chrono::NaiveDateTime;
use sqlx::{PgPool, Row};

/// Insert the outcome, or overwrite the status of the row with the same key
pub async fn upsert_import(pool: &PgPool, outcome: &ImportOutcome) -> sqlx::Result<()> {
    sqlx::query(
        r#"
        INSERT INTO snyk_imports
            (repo_id, repo_owner, repo_name, file_path, success, error_message, imported_at)
        VALUES ($1, $2, $3, $4, $5, $6, $7)
        ON CONFLICT (repo_owner, repo_name, file_path) DO UPDATE SET
            success = EXCLUDED.success,
            error_message = EXCLUDED.error_message,
            imported_at = EXCLUDED.imported_at
        "#,
    )
    .bind(outcome.repo_id)
    .bind(&outcome.owner)
    .bind(&outcome.name)
    .bind(&outcome.file_path)
    .bind(outcome.success)
    .bind(outcome.error_message.as_deref())
    .bind(outcome.imported_at.naive_utc())
    .execute(pool)
    .await?;

    Ok(())
}

/// Load the record for one key
pub async fn load_import(
    pool: &PgPool,
    owner: &str,
    name: &str,
    file_path: &str,
) -> sqlx::Result<Option<ImportRecord>> {
    let row = sqlx::query(
        r#"
        SELECT id, repo_id, repo_owner, repo_name, file_path, success, error_message, imported_at
        FROM snyk_imports
        WHERE repo_owner = $1 AND repo_name = $2 AND file_path = $3
        "#,
    )
    .bind(owner)
    .bind(name)
    .bind(file_path)
    .fetch_optional(pool)
    .await?;

    match row {
        Some(row) => {
            let imported_at: NaiveDateTime = row.try_get("imported_at")?;
            Ok(Some(ImportRecord {
                id: row.try_get("id")?,
                repo_id: row.try_get("repo_id")?,
                repo_owner: row.try_get("repo_owner")?,
                repo_name: row.try_get("repo_name")?,
                file_path: row.try_get("file_path")?,
                success: row.try_get("success")?,
                error_message: row.try_get("error_message")?,
                imported_at: imported_at.and_utc(),
            }))
        }
        None => Ok(None),
    }
}

/// Number of records for `owner/name`
pub async fn count_imports(pool: &PgPool, owner: &str, name: &str) -> sqlx::Result<i64> {
    let (count,): (i64,) = sqlx::query_as(
        "SELECT COUNT(*) FROM snyk_imports WHERE repo_owner = $1 AND repo_name = $2",
    )
    .bind(owner)
    .bind(name)
    .fetch_one(pool)
    .await?;

    Ok(count)
}
