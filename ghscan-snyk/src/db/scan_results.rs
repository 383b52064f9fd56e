//! Scan result queries

use crate::models::CandidateFile;
use sqlx::postgres::PgRow;
use sqlx::{PgPool, Row};

/// Candidate manifests recorded for `owner/name`
///
/// Rows that fail to decode (e.g. a NULL column) are skipped with a warning;
/// the rest of the repository's files are still returned.
pub async fn load_candidate_files(
    pool: &PgPool,
    owner: &str,
    name: &str,
) -> sqlx::Result<Vec<CandidateFile>> {
    let rows = sqlx::query(
        r#"
        SELECT file_path, file_type
        FROM scan_results
        WHERE repo_owner = $1 AND repo_name = $2
        "#,
    )
    .bind(owner)
    .bind(name)
    .fetch_all(pool)
    .await?;

    let mut files = Vec::with_capacity(rows.len());
    for row in &rows {
        match decode_row(row) {
            Ok(file) => files.push(file),
            Err(e) => {
                tracing::warn!(owner, name, error = %e, "Skipping undecodable scan result row");
            }
        }
    }

    Ok(files)
}

fn decode_row(row: &PgRow) -> sqlx::Result<CandidateFile> {
    Ok(CandidateFile::new(
        row.try_get::<String, _>("file_path")?,
        row.try_get::<String, _>("file_type")?,
    ))
}
