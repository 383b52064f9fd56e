//! `snyk_imports` provisioning

use sqlx::PgPool;

/// Create the import results table if it does not exist
///
/// Idempotent; safe to run at every startup and from overlapping runs.
pub async fn ensure_schema(pool: &PgPool) -> sqlx::Result<()> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS snyk_imports (
            id SERIAL PRIMARY KEY,
            repo_id INTEGER NOT NULL,
            repo_owner TEXT NOT NULL,
            repo_name TEXT NOT NULL,
            file_path TEXT NOT NULL,
            success BOOLEAN NOT NULL,
            error_message TEXT,
            imported_at TIMESTAMP NOT NULL,
            UNIQUE(repo_owner, repo_name, file_path)
        )
        "#,
    )
    .execute(pool)
    .await?;

    tracing::info!("Database table initialized (snyk_imports)");

    Ok(())
}
